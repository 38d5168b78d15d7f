use crate::core::{GroupKey, Slice, cell};
use crate::error::OlaError;
use crate::estimators::shared::{group_cell, publish};
use crate::estimators::{Estimate, OlaEstimator, extrapolation_factor};
use crate::sinks::PresentationSink;
use std::collections::HashMap;

/// Projected per-group count of non-null `count_col` cells over the whole dataset.
///
/// Same shape as [`GroupBySumOla`](crate::estimators::GroupBySumOla), counting
/// rows instead of summing a value column.
pub struct GroupByCountOla<S: PresentationSink> {
    sink: S,
    total_rows: u64,
    groupby_col: String,
    count_col: String,
    counts: HashMap<GroupKey, u64>,
    rows_seen: u64,
    slices_seen: u64,
}

impl<S: PresentationSink> GroupByCountOla<S> {
    pub fn new<G: Into<String>, C: Into<String>>(
        sink: S,
        total_rows: u64,
        groupby_col: G,
        count_col: C,
    ) -> Self {
        Self {
            sink,
            total_rows,
            groupby_col: groupby_col.into(),
            count_col: count_col.into(),
            counts: HashMap::new(),
            rows_seen: 0,
            slices_seen: 0,
        }
    }

    pub fn total_rows(&self) -> u64 {
        self.total_rows
    }

    pub fn groupby_col(&self) -> &str {
        &self.groupby_col
    }

    pub fn count_col(&self) -> &str {
        &self.count_col
    }

    /// Unscaled running count for one group.
    pub fn raw_count(&self, key: &GroupKey) -> Option<u64> {
        self.counts.get(key).copied()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<S: PresentationSink> OlaEstimator for GroupByCountOla<S> {
    fn name(&self) -> &'static str {
        "group-by-count"
    }

    fn process_slice(&mut self, slice: &Slice<'_>) -> Result<(), OlaError> {
        let group_idx = slice.require_column(&self.groupby_col)?;
        let count_idx = slice.require_column(&self.count_col)?;

        let mut delta: HashMap<GroupKey, u64> = HashMap::new();
        for row in slice.rows() {
            let Some(key) = group_cell(row, group_idx, &self.groupby_col)? else {
                continue;
            };
            let counted = !cell(row, count_idx, &self.count_col)?.is_null();
            *delta.entry(key).or_default() += u64::from(counted);
        }

        for (key, n) in delta {
            *self.counts.entry(key).or_default() += n;
        }
        self.rows_seen += slice.len() as u64;
        self.slices_seen += 1;

        let estimate = self.estimate();
        let name = self.name();
        publish(&mut self.sink, name, self.slices_seen, self.rows_seen, &estimate);
        Ok(())
    }

    fn estimate(&self) -> Estimate {
        let Some(factor) = extrapolation_factor(self.total_rows, self.rows_seen) else {
            return Estimate::Grouped(Default::default());
        };
        Estimate::Grouped(
            self.counts
                .iter()
                .map(|(k, &n)| (k.clone(), n as f64 * factor))
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
