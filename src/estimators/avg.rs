use crate::accumulators::{Accumulator, MeanAccumulator};
use crate::core::{Slice, numeric_cell};
use crate::error::OlaError;
use crate::estimators::shared::publish;
use crate::estimators::{Estimate, OlaEstimator};
use crate::sinks::PresentationSink;

/// Running mean of `mean_col` over every row seen.
///
/// Needs no extrapolation: a mean is scale-invariant under uniform sampling.
pub struct AvgOla<S: PresentationSink> {
    sink: S,
    mean_col: String,
    mean: MeanAccumulator,
    rows_seen: u64,
    slices_seen: u64,
}

impl<S: PresentationSink> AvgOla<S> {
    pub fn new<C: Into<String>>(sink: S, mean_col: C) -> Self {
        Self {
            sink,
            mean_col: mean_col.into(),
            mean: MeanAccumulator::default(),
            rows_seen: 0,
            slices_seen: 0,
        }
    }

    pub fn mean_col(&self) -> &str {
        &self.mean_col
    }

    /// Running `(sum, count)` of non-null values.
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

impl<S: PresentationSink> OlaEstimator for AvgOla<S> {
    fn name(&self) -> &'static str {
        "avg"
    }

    fn process_slice(&mut self, slice: &Slice<'_>) -> Result<(), OlaError> {
        let idx = slice.require_column(&self.mean_col)?;

        let mut delta = MeanAccumulator::default();
        for row in slice.rows() {
            if let Some(v) = numeric_cell(row, idx, &self.mean_col)? {
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
