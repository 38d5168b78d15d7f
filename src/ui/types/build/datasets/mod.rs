use crate::datasets::{CsvFileDataset, RowSource, SalesGenerator};
use crate::ui::types::build::BuildError;
use crate::ui::types::choices::DatasetChoice;

mod csv_file;
mod sales_generator;

pub fn build_dataset(choice: DatasetChoice) -> Result<Box<dyn RowSource>, BuildError> {
    match choice {
        DatasetChoice::SalesGenerator(p) => {
            let s = SalesGenerator::try_from(p)?;
            Ok(Box::new(s))
        }
        DatasetChoice::CsvFile(p) => {
            let s = CsvFileDataset::try_from(p)?;
            Ok(Box::new(s))
        }
    }
}
