use crate::core::{GroupKey, Row, Slice, Value, cell};
use crate::error::OlaError;
use crate::estimators::Estimate;
use crate::sinks::{EstimateFrame, PresentationSink};
use tracing::debug;

/// `filter_col == filter_value`, bound once at construction.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RowFilter {
    pub(crate) column: String,
    pub(crate) value: Value,
}

impl RowFilter {
    pub(crate) fn new(column: String, value: Value) -> Self {
        Self { column, value }
    }

    pub(crate) fn resolve(&self, slice: &Slice<'_>) -> Result<usize, OlaError> {
        slice.require_column(&self.column)
    }

    #[inline]
    pub(crate) fn accepts(&self, row: &Row, index: usize) -> Result<bool, OlaError> {
        Ok(cell(row, index, &self.column)?.matches(&self.value))
    }
}

/// Group key of a row; `None` when the cell is null, which drops the row from
/// every group.
#[inline]
pub(crate) fn group_cell(row: &Row, index: usize, column: &str) -> Result<Option<GroupKey>, OlaError> {
    Ok(cell(row, index, column)?.group_key())
}

pub(crate) fn publish<S: PresentationSink>(
    sink: &mut S,
    name: &str,
    slices_seen: u64,
    rows_seen: u64,
    estimate: &Estimate,
) {
    debug!(estimator = name, slices_seen, rows_seen, %estimate, "slice folded");
    sink.update(&EstimateFrame::new(slices_seen, rows_seen, estimate));
}
