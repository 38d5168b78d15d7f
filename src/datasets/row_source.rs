use crate::core::{Dataset, DatasetHeader, Row};
use std::io::Error;
use std::sync::Arc;

/// Pull-based producer of dataset rows (a file, a generator).
///
/// Every row yielded by [`next_row`](RowSource::next_row) is aligned with the
/// same immutable [`DatasetHeader`] for the lifetime of the source.
pub trait RowSource {
    fn header(&self) -> &Arc<DatasetHeader>;

    /// Whether the source *may* produce more rows. Once `false`,
    /// [`next_row`](RowSource::next_row) must return `None`.
    fn has_more_rows(&self) -> bool;

    /// Produces the next row, or `None` once exhausted. Malformed records
    /// may be skipped.
    fn next_row(&mut self) -> Option<Row>;

    /// Rewinds to the first row.
    fn restart(&mut self) -> Result<(), Error>;
}

/// Drains a finite source into an in-memory dataset.
///
/// The source must be bounded; an endless generator never returns.
pub fn collect_dataset<S: RowSource + ?Sized>(source: &mut S) -> Dataset {
    let mut rows = Vec::new();
    while source.has_more_rows() {
        let Some(row) = source.next_row() else {
            break;
        };
        rows.push(row);
    }
    Dataset::new(Arc::clone(source.header()), rows)
}
