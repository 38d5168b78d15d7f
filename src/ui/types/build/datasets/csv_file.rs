use crate::datasets::CsvFileDataset;
use crate::ui::types::build::BuildError;
use crate::ui::types::choices::CsvFileParameters;

impl TryFrom<CsvFileParameters> for CsvFileDataset {
    type Error = BuildError;

    fn try_from(p: CsvFileParameters) -> Result<Self, Self::Error> {
        CsvFileDataset::new(p.path).map_err(BuildError::from)
    }
}
