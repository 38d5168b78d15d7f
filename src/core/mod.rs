mod dataset;
mod slice;
mod value;

pub use dataset::{Dataset, DatasetHeader, Row};
pub use slice::Slice;
pub(crate) use slice::{cell, numeric_cell};
pub use value::{GroupKey, Value};
