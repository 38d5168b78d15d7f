mod csv_file;
mod row_source;
mod sales_generator;

pub use csv_file::CsvFileDataset;
pub use row_source::{RowSource, collect_dataset};
pub use sales_generator::SalesGenerator;
