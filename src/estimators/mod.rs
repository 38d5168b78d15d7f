mod avg;
mod estimate;
mod estimator;
mod filter_avg;
mod filter_distinct;
mod group_by_avg;
mod group_by_count;
mod group_by_sum;
mod shared;

pub use avg::AvgOla;
pub use estimate::Estimate;
pub use estimator::{OlaEstimator, extrapolation_factor};
pub use filter_avg::FilterAvgOla;
pub use filter_distinct::{DistinctBackend, FilterDistinctOla};
pub use group_by_avg::GroupByAvgOla;
pub use group_by_count::GroupByCountOla;
pub use group_by_sum::GroupBySumOla;
