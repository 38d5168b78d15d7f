use crate::datasets::SalesGenerator;
use crate::ui::types::build::BuildError;
use crate::ui::types::choices::SalesGeneratorParameters;

impl TryFrom<SalesGeneratorParameters> for SalesGenerator {
    type Error = BuildError;

    fn try_from(p: SalesGeneratorParameters) -> Result<Self, Self::Error> {
        if p.rows == 0 {
            return Err(BuildError::InvalidParameter("rows must be > 0".into()));
        }
        let rows = usize::try_from(p.rows)
            .map_err(|_| BuildError::InvalidParameter("rows too large for usize".into()))?;

        SalesGenerator::new(p.num_shops, p.num_items, Some(rows), p.seed).map_err(|e| {
            BuildError::InvalidParameter(e.to_string())
        })
    }
}
