mod datasets;
mod error;
mod estimators;

pub use error::BuildError;

pub use datasets::build_dataset;
pub use estimators::build_estimator;
