use crate::core::Value;
use crate::error::OlaError;
use crate::estimators::{
    AvgOla, DistinctBackend, FilterAvgOla, FilterDistinctOla, GroupByAvgOla, GroupByCountOla,
    GroupBySumOla, OlaEstimator,
};
use crate::sinks::PresentationSink;
use crate::ui::types::build::BuildError;
use crate::ui::types::choices::EstimatorChoice;
use crate::utils::file_parsing::parse_cell;

fn column(name: String, field: &str) -> Result<String, BuildError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(BuildError::InvalidParameter(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// Numbers match numerically, quoted input forces a text match.
fn filter_value(raw: &str) -> Result<Value, BuildError> {
    match parse_cell(raw.trim()) {
        Value::Null => Err(BuildError::InvalidParameter(
            "filter_value must not be empty".into(),
        )),
        v => Ok(v),
    }
}

/// Builds the estimator a choice describes, publishing to `sink`.
///
/// `total_rows` is the full dataset size used by the extrapolating kinds.
pub fn build_estimator<'a, S>(
    choice: EstimatorChoice,
    sink: S,
    total_rows: u64,
) -> Result<Box<dyn OlaEstimator + 'a>, BuildError>
where
    S: PresentationSink + 'a,
{
    let est: Box<dyn OlaEstimator + 'a> = match choice {
        EstimatorChoice::Avg(p) => Box::new(AvgOla::new(sink, column(p.mean_col, "mean_col")?)),
        EstimatorChoice::FilterAvg(p) => Box::new(FilterAvgOla::new(
            sink,
            column(p.filter_col, "filter_col")?,
            filter_value(&p.filter_value)?,
            column(p.mean_col, "mean_col")?,
        )),
        EstimatorChoice::GroupByAvg(p) => Box::new(GroupByAvgOla::new(
            sink,
            column(p.groupby_col, "groupby_col")?,
            column(p.mean_col, "mean_col")?,
        )),
        EstimatorChoice::GroupBySum(p) => Box::new(GroupBySumOla::new(
            sink,
            total_rows,
            column(p.groupby_col, "groupby_col")?,
            column(p.sum_col, "sum_col")?,
        )),
        EstimatorChoice::GroupByCount(p) => Box::new(GroupByCountOla::new(
            sink,
            total_rows,
            column(p.groupby_col, "groupby_col")?,
            column(p.count_col, "count_col")?,
        )),
        EstimatorChoice::FilterDistinct(p) => {
            let backend = match p.sketch_precision {
                Some(precision) => DistinctBackend::Sketch { precision },
                None => DistinctBackend::Exact,
            };
            let ola = FilterDistinctOla::with_backend(
                sink,
                total_rows,
                column(p.filter_col, "filter_col")?,
                filter_value(&p.filter_value)?,
                column(p.distinct_col, "distinct_col")?,
                backend,
            )
            .map_err(|e| match e {
                OlaError::InvalidParameter(msg) => BuildError::InvalidParameter(msg),
                other => BuildError::Ola(other),
            })?;
            Box::new(ola)
        }
    };
    Ok(est)
}
