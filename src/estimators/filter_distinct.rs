use crate::core::{Slice, Value, cell};
use crate::error::OlaError;
use crate::estimators::shared::{RowFilter, publish};
use crate::estimators::{Estimate, OlaEstimator, extrapolation_factor};
use crate::sinks::PresentationSink;
use crate::sketches::HyperLogLog;
use std::collections::HashSet;

const SKETCH_SEED: u64 = 123_456_789;

/// How distinct values are remembered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistinctBackend {
    /// Every distinct value kept in a hash set.
    #[default]
    Exact,
    /// HyperLogLog with `2^precision` registers; bounded memory.
    ///
    /// Precision is held to 4..=16. Below 4 the register array is too small
    /// for the bias constants and the error grows past any useful bound, so
    /// the 4-register (`p = 2`) layout is intentionally not offered.
    Sketch { precision: u8 },
}

#[derive(Debug, Clone)]
enum DistinctState {
    Exact(HashSet<String>),
    Sketch(HyperLogLog),
}

impl DistinctState {
    fn cardinality(&self) -> f64 {
        match self {
            DistinctState::Exact(set) => set.len() as f64,
            DistinctState::Sketch(hll) => hll.cardinality(),
        }
    }

    fn empty_like(&self) -> Self {
        match self {
            DistinctState::Exact(_) => DistinctState::Exact(HashSet::new()),
            DistinctState::Sketch(hll) => DistinctState::Sketch(hll.empty_like()),
        }
    }

    fn absorb(&mut self, delta: DistinctState) -> Result<(), OlaError> {
        match (self, delta) {
            (DistinctState::Exact(set), DistinctState::Exact(more)) => {
                set.extend(more);
                Ok(())
            }
            (DistinctState::Sketch(hll), DistinctState::Sketch(more)) => hll.merge(&more),
            _ => Err(OlaError::InvalidParameter(
                "cannot mix exact and sketched distinct state".into(),
            )),
        }
    }

    fn insert(&mut self, item: String) {
        match self {
            DistinctState::Exact(set) => {
                set.insert(item);
            }
            DistinctState::Sketch(hll) => hll.insert(&item),
        }
    }
}

/// Projected number of distinct `distinct_col` values among rows where
/// `filter_col == filter_value`.
///
/// Estimate is `distinct_seen * total_rows / rows_seen`. Distinct counts do not
/// grow linearly with the number of rows, so this projection is a known biased
/// approximation and is deliberately left uncorrected. Consumers should read
/// it as a rough indicator, not a bound.
pub struct FilterDistinctOla<S: PresentationSink> {
    sink: S,
    total_rows: u64,
    filter: RowFilter,
    distinct_col: String,
    distinct: DistinctState,
    matched_rows: u64,
    rows_seen: u64,
    slices_seen: u64,
}

impl<S: PresentationSink> FilterDistinctOla<S> {
    pub fn new<F, V, C>(sink: S, total_rows: u64, filter_col: F, filter_value: V, distinct_col: C) -> Self
    where
        F: Into<String>,
        V: Into<Value>,
        C: Into<String>,
    {
        Self {
            sink,
            total_rows,
            filter: RowFilter::new(filter_col.into(), filter_value.into()),
            distinct_col: distinct_col.into(),
            distinct: DistinctState::Exact(HashSet::new()),
            matched_rows: 0,
            rows_seen: 0,
            slices_seen: 0,
        }
    }

    /// Same as [`new`](Self::new) with an explicit backend. Fails on an
    /// out-of-range sketch precision.
    pub fn with_backend<F, V, C>(
        sink: S,
        total_rows: u64,
        filter_col: F,
        filter_value: V,
        distinct_col: C,
        backend: DistinctBackend,
    ) -> Result<Self, OlaError>
    where
        F: Into<String>,
        V: Into<Value>,
        C: Into<String>,
    {
        let mut ola = Self::new(sink, total_rows, filter_col, filter_value, distinct_col);
        if let DistinctBackend::Sketch { precision } = backend {
            ola.distinct = DistinctState::Sketch(HyperLogLog::new(precision, SKETCH_SEED)?);
        }
        Ok(ola)
    }

    pub fn backend(&self) -> DistinctBackend {
        match &self.distinct {
            DistinctState::Exact(_) => DistinctBackend::Exact,
            DistinctState::Sketch(h) => DistinctBackend::Sketch {
                precision: h.precision(),
            },
        }
    }

    pub fn total_rows(&self) -> u64 {
        self.total_rows
    }

    pub fn filter_col(&self) -> &str {
        &self.filter.column
    }

    pub fn filter_value(&self) -> &Value {
        &self.filter.value
    }

    pub fn distinct_col(&self) -> &str {
        &self.distinct_col
    }

    /// Unscaled number of distinct values observed among matching rows.
    pub fn distinct_seen(&self) -> f64 {
        self.distinct.cardinality()
    }

    pub fn matched_rows(&self) -> u64 {
        self.matched_rows
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<S: PresentationSink> OlaEstimator for FilterDistinctOla<S> {
    fn name(&self) -> &'static str {
        "filter-distinct"
    }

    fn process_slice(&mut self, slice: &Slice<'_>) -> Result<(), OlaError> {
        let filter_idx = self.filter.resolve(slice)?;
        let distinct_idx = slice.require_column(&self.distinct_col)?;

        let mut matched = 0u64;
        let mut delta = self.distinct.empty_like();
        for row in slice.rows() {
            if !self.filter.accepts(row, filter_idx)? {
                continue;
            }
            matched += 1;
            let v = cell(row, distinct_idx, &self.distinct_col)?;
            if !v.is_null() {
                delta.insert(v.to_string());
            }
        }

        self.distinct.absorb(delta)?;
        self.matched_rows += matched;
        self.rows_seen += slice.len() as u64;
        self.slices_seen += 1;

        let estimate = self.estimate();
        let name = self.name();
        publish(&mut self.sink, name, self.slices_seen, self.rows_seen, &estimate);
        Ok(())
    }

    fn estimate(&self) -> Estimate {
        if self.matched_rows == 0 {
            return Estimate::NoData;
        }
        match extrapolation_factor(self.total_rows, self.rows_seen) {
            Some(factor) => Estimate::Scalar(self.distinct.cardinality() * factor),
            None => Estimate::NoData,
        }
    }

    fn rows_seen(&self) -> u64 {
        self.rows_seen
    }

    fn slices_seen(&self) -> u64 {
        self.slices_seen
    }
}
