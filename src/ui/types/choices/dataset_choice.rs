use crate::ui::types::choices::UIChoice;
use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

const DEFAULT_SEED: u64 = 42;
fn default_seed() -> u64 {
    DEFAULT_SEED
}
fn default_num_shops() -> u32 {
    60
}
fn default_num_items() -> u32 {
    2_000
}
fn default_rows() -> u64 {
    100_000
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
pub struct CsvFileParameters {
    #[schemars(
        with = "String",
        title = "CSV Path",
        description = "Path to a .csv file whose first line names the columns",
        extend(
            "format" = "path",
            "x-file" = true,
            "x-must-exist" = true,
            "x-extensions" = ["csv"]
        )
    )]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SalesGeneratorParameters {
    #[serde(default = "default_num_shops")]
    #[schemars(
        title = "Shops",
        description = "Number of distinct shop ids",
        range(min = 1),
        default = "default_num_shops"
    )]
    pub num_shops: u32,

    #[serde(default = "default_num_items")]
    #[schemars(
        title = "Items",
        description = "Number of distinct item ids",
        range(min = 1),
        default = "default_num_items"
    )]
    pub num_items: u32,

    #[serde(default = "default_rows")]
    #[schemars(
        title = "Rows",
        description = "Rows to generate",
        range(min = 1),
        default = "default_rows"
    )]
    pub rows: u64,

    #[serde(default = "default_seed")]
    #[schemars(title = "Seed", description = "PRNG seed", default = "default_seed")]
    pub seed: u64,
}

impl Default for SalesGeneratorParameters {
    fn default() -> Self {
        Self {
            num_shops: default_num_shops(),
            num_items: default_num_items(),
            rows: default_rows(),
            seed: default_seed(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants, PartialEq)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(DatasetKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum DatasetChoice {
    #[strum_discriminants(strum(
        message = "Sales Generator",
        detailed_message = "Synthetic daily shop sales."
    ))]
    SalesGenerator(SalesGeneratorParameters),

    #[strum_discriminants(strum(
        message = "CSV File",
        detailed_message = "A table read from a comma separated file."
    ))]
    CsvFile(CsvFileParameters),
}

impl Default for DatasetChoice {
    fn default() -> Self {
        Self::SalesGenerator(SalesGeneratorParameters::default())
    }
}

impl UIChoice for DatasetChoice {
    type Kind = DatasetKind;

    fn schema() -> Schema {
        schema_for!(DatasetChoice)
    }

    fn prompt_label() -> &'static str {
        "Choose a dataset:"
    }

    fn default_params(kind: Self::Kind) -> Value {
        let v = match kind {
            DatasetKind::CsvFile => serde_json::to_value(CsvFileParameters::default()),
            DatasetKind::SalesGenerator => {
                serde_json::to_value(SalesGeneratorParameters::default())
            }
        };
        v.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::types::choices::{FieldKind, specs_for_kind};
    use serde_json::json;

    #[test]
    fn csv_choice_deserializes_path() {
        let c: DatasetChoice = serde_json::from_value(json!({
            "type": "csv-file",
            "params": { "path": "data/sales.csv" }
        }))
        .unwrap();
        assert_eq!(
            c,
            DatasetChoice::CsvFile(CsvFileParameters {
                path: PathBuf::from("data/sales.csv")
            })
        );
    }

    #[test]
    fn generator_defaults_apply() {
        let c: DatasetChoice =
            serde_json::from_value(json!({ "type": "sales-generator", "params": { "rows": 10 } }))
                .unwrap();
        let DatasetChoice::SalesGenerator(p) = c else {
            panic!("expected generator");
        };
        assert_eq!(p.rows, 10);
        assert_eq!(p.seed, 42);
        assert_eq!(p.num_shops, 60);
    }

    #[test]
    fn csv_path_is_a_string_field() {
        let schema = <DatasetChoice as UIChoice>::schema();
        let specs = specs_for_kind(&schema, "csv-file").unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].name, "path");
        assert_eq!(specs[0].kind, FieldKind::String);
        assert!(specs[0].required);
        assert!(specs[0].is_path());
    }
}
