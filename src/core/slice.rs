use crate::core::dataset::{DatasetHeader, Row};
use crate::core::value::Value;
use crate::error::OlaError;
use std::sync::Arc;

/// An ordered batch of rows fed to an estimator in one call.
///
/// Rows are borrowed from the dataset they were sampled from; a slice never
/// owns or mutates them.
#[derive(Debug, Clone)]
pub struct Slice<'a> {
    header: Arc<DatasetHeader>,
    rows: Vec<&'a Row>,
}

impl<'a> Slice<'a> {
    pub fn new(header: Arc<DatasetHeader>, rows: Vec<&'a Row>) -> Slice<'a> {
        Slice { header, rows }
    }

    pub fn from_rows(header: Arc<DatasetHeader>, rows: &'a [Row]) -> Slice<'a> {
        Slice {
            header,
            rows: rows.iter().collect(),
        }
    }

    pub fn header(&self) -> &DatasetHeader {
        &self.header
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a Row> + '_ {
        self.rows.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Resolves a column name to its index, failing if the slice's header lacks it.
    pub fn require_column(&self, name: &str) -> Result<usize, OlaError> {
        self.header
            .index_of_column(name)
            .ok_or_else(|| OlaError::schema(name, "column not present in slice"))
    }
}

/// Reads the cell at `index`, failing when the row is too short to hold it.
#[inline]
pub(crate) fn cell<'r>(row: &'r Row, index: usize, column: &str) -> Result<&'r Value, OlaError> {
    row.value_at_index(index)
        .ok_or_else(|| OlaError::schema(column, "row is missing the column"))
}

/// Reads a numeric cell: `Ok(None)` for nulls, an error for text.
#[inline]
pub(crate) fn numeric_cell(row: &Row, index: usize, column: &str) -> Result<Option<f64>, OlaError> {
    let v = cell(row, index, column)?;
    if v.is_null() {
        return Ok(None);
    }
    match v {
        Value::Number(x) => Ok(Some(*x)),
        other => Err(OlaError::schema(
            column,
            format!("expected a numeric value, found '{other}'"),
        )),
    }
}
