use anyhow::{Context, Result, anyhow, bail};
use schemars::{Schema, schema_for};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Number,
    Boolean,
}

/// One prompt-able field of a choice's `params` object.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub title: String,
    pub description: Option<String>,
    pub required: bool,
    pub kind: FieldKind,
    pub default: Option<Value>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Set for `format: path` strings; lists accepted extensions (may be empty).
    pub path_extensions: Option<Vec<String>>,
}

impl FieldSpec {
    pub fn is_path(&self) -> bool {
        self.path_extensions.is_some()
    }
}

// Return the whole tagged-enum schema for T
pub fn schema_for<T: schemars::JsonSchema>() -> Schema {
    schema_for!(T)
}

pub fn specs_for_kind(root: &Schema, kind_key: &str) -> Result<Vec<FieldSpec>> {
    let root_obj = root.as_object().context("root schema is not an object")?;

    let alts = root_obj
        .get("oneOf")
        .or_else(|| root_obj.get("anyOf"))
        .and_then(|v| v.as_array())
        .context("missing oneOf/anyOf")?;

    for branch in alts {
        let bobj = branch.as_object().context("branch is not object")?;
        let Some(props) = bobj.get("properties").and_then(|v| v.as_object()) else {
            continue;
        };

        if !discriminant_matches(props, kind_key) {
            continue;
        }

        let Some(params_obj) = props
            .get("params")
            .and_then(|v| v.as_object())
            .and_then(|o| resolve_ref_obj(root_obj, o))
        else {
            return Ok(vec![]);
        };

        let Some(params_props) = params_obj.get("properties").and_then(|v| v.as_object()) else {
            return Ok(vec![]);
        };

        let required: Vec<&str> = params_obj
            .get("required")
            .and_then(|v| v.as_array())
            .map(|a| a.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default();

        let mut out = Vec::new();
        for (name, field_schema) in params_props {
            let mut fs_obj = field_schema
                .as_object()
                .context("field schema not object")?;

            if fs_obj.get("$ref").is_some() {
                fs_obj = resolve_ref_obj(root_obj, fs_obj)
                    .ok_or_else(|| anyhow!("failed to resolve field $ref for '{name}'"))?;
            }

            let Some(kind) = detect_field_kind(fs_obj.get("type")) else {
                continue;
            };

            let title = fs_obj
                .get("title")
                .and_then(|v| v.as_str())
                .unwrap_or(name)
                .to_string();

            let description = fs_obj
                .get("description")
                .and_then(|v| v.as_str())
                .map(str::to_string);

            let min = fs_obj
                .get("minimum")
                .or_else(|| fs_obj.get("exclusiveMinimum"))
                .and_then(|v| v.as_f64());

            let max = fs_obj
                .get("maximum")
                .or_else(|| fs_obj.get("exclusiveMaximum"))
                .and_then(|v| v.as_f64());

            out.push(FieldSpec {
                name: name.clone(),
                title,
                description,
                required: required.contains(&name.as_str()),
                kind,
                default: fs_obj.get("default").cloned(),
                min,
                max,
                path_extensions: path_extensions(fs_obj),
            });
        }

        return Ok(out);
    }

    bail!("no branch found for type={kind_key}");
}

fn path_extensions(field: &Map<String, Value>) -> Option<Vec<String>> {
    if field.get("format").and_then(|v| v.as_str()) != Some("path") {
        return None;
    }
    Some(
        field
            .get("x-extensions")
            .and_then(|v| v.as_array())
            .map(|a| {
                a.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default(),
    )
}

fn discriminant_matches(props: &Map<String, Value>, kind_key: &str) -> bool {
    let Some(tobj) = props.get("type").and_then(|v| v.as_object()) else {
        return false;
    };

    if tobj.get("const").and_then(|v| v.as_str()) == Some(kind_key) {
        return true;
    }
    matches!(
        tobj.get("enum").and_then(|v| v.as_array()).map(Vec::as_slice),
        Some([only]) if only.as_str() == Some(kind_key)
    )
}

/// Resolve a local $ref like "#/$defs/SalesGeneratorParameters" against the root object.
/// Returns the referenced object map, or None if it can't be resolved.
fn resolve_ref_obj<'a>(
    root_obj: &'a Map<String, Value>,
    obj: &'a Map<String, Value>,
) -> Option<&'a Map<String, Value>> {
    match obj.get("$ref") {
        Some(Value::String(r)) => {
            let path = r.strip_prefix("#/")?;
            let mut cur: &Map<String, Value> = root_obj;
            for raw_seg in path.split('/') {
                // JSON Pointer unescape (~1 => /, ~0 => ~)
                let seg = raw_seg.replace("~1", "/").replace("~0", "~");
                cur = cur.get(&seg)?.as_object()?;
            }
            Some(cur)
        }
        _ => Some(obj),
    }
}

fn kind_of(s: &str) -> Option<FieldKind> {
    match s {
        "string" => Some(FieldKind::String),
        "integer" => Some(FieldKind::Integer),
        "number" => Some(FieldKind::Number),
        "boolean" => Some(FieldKind::Boolean),
        _ => None,
    }
}

fn detect_field_kind(ty: Option<&Value>) -> Option<FieldKind> {
    match ty {
        Some(Value::String(s)) => kind_of(s),
        // unions like ["integer","null"] for Option<T>
        Some(Value::Array(arr)) => arr.iter().filter_map(|v| v.as_str()).find_map(kind_of),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn root() -> Schema {
        serde_json::from_value(json!({
            "oneOf": [
                {
                    "type": "object",
                    "properties": {
                        "type": { "type": "string", "const": "csv-file" },
                        "params": { "$ref": "#/$defs/Csv" }
                    }
                },
                {
                    "type": "object",
                    "properties": {
                        "type": { "type": "string", "enum": ["gen"] },
                        "params": {
                            "type": "object",
                            "properties": {
                                "rows": { "type": ["integer", "null"], "minimum": 1 },
                                "nested": { "type": "object" }
                            }
                        }
                    }
                }
            ],
            "$defs": {
                "Csv": {
                    "type": "object",
                    "required": ["path"],
                    "properties": {
                        "path": {
                            "type": "string",
                            "title": "CSV Path",
                            "format": "path",
                            "x-extensions": ["csv"]
                        }
                    }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn resolves_ref_and_path_hints() {
        let specs = specs_for_kind(&root(), "csv-file").unwrap();
        assert_eq!(specs.len(), 1);
        let path = &specs[0];
        assert_eq!(path.title, "CSV Path");
        assert!(path.required);
        assert!(path.is_path());
        assert_eq!(path.path_extensions.as_deref(), Some(&["csv".to_string()][..]));
    }

    #[test]
    fn enum_discriminant_and_nullable_types() {
        let specs = specs_for_kind(&root(), "gen").unwrap();
        assert_eq!(specs.len(), 1, "object field is not prompt-able");
        assert_eq!(specs[0].kind, FieldKind::Integer);
        assert!(!specs[0].required);
        assert_eq!(specs[0].min, Some(1.0));
        assert!(!specs[0].is_path());
    }

    #[test]
    fn unknown_kind_is_an_error() {
        assert!(specs_for_kind(&root(), "nope").is_err());
    }
}
