pub mod accumulators;
pub mod core;
pub mod datasets;
pub mod error;
pub mod estimators;
pub mod sampling;
pub mod sinks;
pub mod sketches;
pub mod tasks;
pub mod ui;
pub mod utils;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;
