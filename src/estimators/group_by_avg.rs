use crate::accumulators::{Accumulator, MeanAccumulator};
use crate::core::{GroupKey, Slice, numeric_cell};
use crate::error::OlaError;
use crate::estimators::shared::{group_cell, publish};
use crate::estimators::{Estimate, OlaEstimator};
use crate::sinks::PresentationSink;
use std::collections::HashMap;

/// Running per-group mean of `mean_col`, grouped by `groupby_col`.
///
/// Groups are discovered as rows arrive and are never dropped. A group only
/// shows up in the estimate once it has at least one non-null value.
pub struct GroupByAvgOla<S: PresentationSink> {
    sink: S,
    groupby_col: String,
    mean_col: String,
    groups: HashMap<GroupKey, MeanAccumulator>,
    rows_seen: u64,
    slices_seen: u64,
}

impl<S: PresentationSink> GroupByAvgOla<S> {
    pub fn new<G: Into<String>, C: Into<String>>(sink: S, groupby_col: G, mean_col: C) -> Self {
        Self {
            sink,
            groupby_col: groupby_col.into(),
            mean_col: mean_col.into(),
            groups: HashMap::new(),
            rows_seen: 0,
            slices_seen: 0,
        }
    }

    pub fn groupby_col(&self) -> &str {
        &self.groupby_col
    }

    pub fn mean_col(&self) -> &str {
        &self.mean_col
    }

    /// Number of group keys discovered so far.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Running `(sum, count)` for one group.
    pub fn group_state(&self, key: &GroupKey) -> Option<(f64, u64)> {
        self.groups.get(key).map(|m| (m.sum(), m.len()))
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<S: PresentationSink> OlaEstimator for GroupByAvgOla<S> {
    fn name(&self) -> &'static str {
        "group-by-avg"
    }

    fn process_slice(&mut self, slice: &Slice<'_>) -> Result<(), OlaError> {
        let group_idx = slice.require_column(&self.groupby_col)?;
        let mean_idx = slice.require_column(&self.mean_col)?;

        let mut delta: HashMap<GroupKey, MeanAccumulator> = HashMap::new();
        for row in slice.rows() {
            let Some(key) = group_cell(row, group_idx, &self.groupby_col)? else {
                continue;
            };
            let value = numeric_cell(row, mean_idx, &self.mean_col)?;
            let acc = delta.entry(key).or_default();
            if let Some(v) = value {
                acc.add(v);
            }
        }

        for (key, part) in delta {
            self.groups.entry(key).or_default().merge(&part);
        }
        self.rows_seen += slice.len() as u64;
        self.slices_seen += 1;

        let estimate = self.estimate();
        let name = self.name();
        publish(&mut self.sink, name, self.slices_seen, self.rows_seen, &estimate);
        Ok(())
    }

    fn estimate(&self) -> Estimate {
        Estimate::Grouped(
            self.groups
                .iter()
                .filter_map(|(k, m)| m.estimation().map(|mean| (k.clone(), mean)))
                .collect(),
        )
    }

    fn rows_seen(&self) -> u64 {
        self.rows_seen
    }

    fn slices_seen(&self) -> u64 {
        self.slices_seen
    }
}
