use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result};

/// A single cell of a dataset row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
    Null,
}

impl Value {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null) || matches!(self, Value::Number(x) if x.is_nan())
    }

    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(x) => Some(*x),
            _ => None,
        }
    }

    /// Equality used by filters: numbers compare numerically, text exactly,
    /// and a null cell never matches anything.
    pub fn matches(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }

    /// Key used by grouped estimators; `None` for null cells.
    pub fn group_key(&self) -> Option<GroupKey> {
        if self.is_null() {
            return None;
        }
        match self {
            Value::Number(x) => Some(GroupKey::Number(OrderedFloat(*x))),
            Value::Text(s) => Some(GroupKey::Text(s.clone())),
            Value::Null => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Value::Number(x) => write!(f, "{x}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Null => Ok(()),
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Number(x)
    }
}

impl From<i64> for Value {
    fn from(x: i64) -> Self {
        Value::Number(x as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Hashable, totally ordered group identifier.
///
/// Numbers sort before text so a column mixing both still yields a stable order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupKey {
    Number(OrderedFloat<f64>),
    Text(String),
}

impl Display for GroupKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            GroupKey::Number(x) => write!(f, "{}", x.0),
            GroupKey::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for GroupKey {
    fn from(x: f64) -> Self {
        GroupKey::Number(OrderedFloat(x))
    }
}

impl From<&str> for GroupKey {
    fn from(s: &str) -> Self {
        GroupKey::Text(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_and_nan_are_null() {
        assert!(Value::Null.is_null());
        assert!(Value::Number(f64::NAN).is_null());
        assert!(!Value::Number(0.0).is_null());
        assert!(!Value::Text(String::new()).is_null());
    }

    #[test]
    fn filter_matching_is_type_aware() {
        assert!(Value::from(3.0).matches(&Value::from(3i64)));
        assert!(Value::from("a").matches(&Value::from("a")));
        assert!(!Value::from("3").matches(&Value::from(3.0)));
        assert!(!Value::Null.matches(&Value::Null));
    }

    #[test]
    fn group_keys_order_numbers_before_text() {
        let mut keys = vec![
            GroupKey::from("b"),
            GroupKey::from(10.0),
            GroupKey::from("a"),
            GroupKey::from(2.0),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                GroupKey::from(2.0),
                GroupKey::from(10.0),
                GroupKey::from("a"),
                GroupKey::from("b"),
            ]
        );
        assert!(Value::Null.group_key().is_none());
    }

    #[test]
    fn display_renders_integers_without_fraction() {
        assert_eq!(GroupKey::from(31.0).to_string(), "31");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::Null.to_string(), "");
    }
}
