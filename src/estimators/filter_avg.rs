use crate::accumulators::{Accumulator, MeanAccumulator};
use crate::core::{Slice, Value, numeric_cell};
use crate::error::OlaError;
use crate::estimators::shared::{RowFilter, publish};
use crate::estimators::{Estimate, OlaEstimator};
use crate::sinks::PresentationSink;

/// Running mean of `mean_col` over rows where `filter_col == filter_value`.
///
/// Rows failing the filter never touch the running state, and their
/// `mean_col` cell is not inspected.
pub struct FilterAvgOla<S: PresentationSink> {
    sink: S,
    filter: RowFilter,
    mean_col: String,
    mean: MeanAccumulator,
    rows_seen: u64,
    slices_seen: u64,
}

impl<S: PresentationSink> FilterAvgOla<S> {
    pub fn new<F, V, C>(sink: S, filter_col: F, filter_value: V, mean_col: C) -> Self
    where
        F: Into<String>,
        V: Into<Value>,
        C: Into<String>,
    {
        Self {
            sink,
            filter: RowFilter::new(filter_col.into(), filter_value.into()),
            mean_col: mean_col.into(),
            mean: MeanAccumulator::default(),
            rows_seen: 0,
            slices_seen: 0,
        }
    }

    pub fn filter_col(&self) -> &str {
        &self.filter.column
    }

    pub fn filter_value(&self) -> &Value {
        &self.filter.value
    }

    pub fn mean_col(&self) -> &str {
        &self.mean_col
    }

    /// Running `(sum, count)` over matching rows.
    pub fn running_state(&self) -> (f64, u64) {
        (self.mean.sum(), self.mean.len())
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<S: PresentationSink> OlaEstimator for FilterAvgOla<S> {
    fn name(&self) -> &'static str {
        "filter-avg"
    }

    fn process_slice(&mut self, slice: &Slice<'_>) -> Result<(), OlaError> {
        let filter_idx = self.filter.resolve(slice)?;
        let mean_idx = slice.require_column(&self.mean_col)?;

        let mut delta = MeanAccumulator::default();
        for row in slice.rows() {
            if !self.filter.accepts(row, filter_idx)? {
                continue;
            }
            if let Some(v) = numeric_cell(row, mean_idx, &self.mean_col)? {
                delta.add(v);
            }
        }

        self.mean.merge(&delta);
        self.rows_seen += slice.len() as u64;
        self.slices_seen += 1;

        let estimate = self.estimate();
        let name = self.name();
        publish(&mut self.sink, name, self.slices_seen, self.rows_seen, &estimate);
        Ok(())
    }

    fn estimate(&self) -> Estimate {
        self.mean
            .estimation()
            .map_or(Estimate::NoData, Estimate::Scalar)
    }

    fn rows_seen(&self) -> u64 {
        self.rows_seen
    }

    fn slices_seen(&self) -> u64 {
        self.slices_seen
    }
}
