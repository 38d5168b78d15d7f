use crate::core::GroupKey;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result};

/// The externally visible output of an estimator after a slice.
#[derive(Debug, Clone, PartialEq)]
pub enum Estimate {
    /// No qualifying row has been observed yet. Distinct from a numeric zero.
    NoData,
    Scalar(f64),
    /// Per-group values, ordered by key. Only groups seen so far are present.
    Grouped(BTreeMap<GroupKey, f64>),
}

impl Estimate {
    #[inline]
    pub fn is_no_data(&self) -> bool {
        matches!(self, Estimate::NoData)
    }

    pub fn scalar(&self) -> Option<f64> {
        match self {
            Estimate::Scalar(x) => Some(*x),
            _ => None,
        }
    }

    pub fn groups(&self) -> Option<&BTreeMap<GroupKey, f64>> {
        match self {
            Estimate::Grouped(g) => Some(g),
            _ => None,
        }
    }

    pub fn group(&self, key: &GroupKey) -> Option<f64> {
        self.groups().and_then(|g| g.get(key).copied())
    }

    /// Flattens into the `(labels, values)` pair a chart expects. Scalars use the
    /// single empty label; the no-data sentinel becomes one `None` bar.
    pub fn labels_and_values(&self) -> (Vec<String>, Vec<Option<f64>>) {
        match self {
            Estimate::NoData => (vec![String::new()], vec![None]),
            Estimate::Scalar(x) => (vec![String::new()], vec![Some(*x)]),
            Estimate::Grouped(g) => g
                .iter()
                .map(|(k, v)| (k.to_string(), Some(*v)))
                .unzip(),
        }
    }
}

impl Display for Estimate {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Estimate::NoData => write!(f, "no data yet"),
            Estimate::Scalar(x) => write!(f, "{x:.6}"),
            Estimate::Grouped(g) => write!(f, "{} groups", g.len()),
        }
    }
}
