use crate::core::Value;

#[inline]
pub fn strip_surrounding_quotes(s: &str) -> &str {
    let b = s.as_bytes();
    if b.len() >= 2 {
        let first = b[0];
        let last = b[b.len() - 1];
        if (first == b'\'' && last == b'\'') || (first == b'"' && last == b'"') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

#[inline]
fn is_quoted(s: &str) -> bool {
    strip_surrounding_quotes(s).len() != s.len()
}

/// Types a field whose quoting has already been removed: empty is null,
/// otherwise a number when it parses as a finite one, otherwise text.
pub fn parse_field(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    match raw.parse::<f64>() {
        Ok(x) if x.is_finite() => Value::Number(x),
        _ => Value::Text(raw.to_string()),
    }
}

/// Types a hand-written value: like [`parse_field`], except that a value
/// wrapped in quotes is always text.
pub fn parse_cell(raw: &str) -> Value {
    if is_quoted(raw) {
        return Value::Text(strip_surrounding_quotes(raw).to_string());
    }
    parse_field(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_quotes_works() {
        assert_eq!(strip_surrounding_quotes("'a,b'"), "a,b");
        assert_eq!(strip_surrounding_quotes(r#""x""#), "x");
        assert_eq!(strip_surrounding_quotes("nq"), "nq");
        assert_eq!(strip_surrounding_quotes("Children's"), "Children's");
    }

    #[test]
    fn fields_are_typed_verbatim() {
        assert_eq!(parse_field(""), Value::Null);
        assert_eq!(parse_field("7"), Value::Number(7.0));
        assert_eq!(parse_field("'x'"), Value::Text("'x'".into()));
        assert_eq!(parse_field("inf"), Value::Text("inf".into()));
    }

    #[test]
    fn cells_are_typed() {
        assert_eq!(parse_cell(""), Value::Null);
        assert_eq!(parse_cell("12.5"), Value::Number(12.5));
        assert_eq!(parse_cell("-3"), Value::Number(-3.0));
        assert_eq!(parse_cell("\"12\""), Value::Text("12".into()));
        assert_eq!(parse_cell("abc"), Value::Text("abc".into()));
        assert_eq!(parse_cell("NaN"), Value::Text("NaN".into()));
    }
}
