mod online_aggregation;

pub use online_aggregation::{ErrorPolicy, OnlineAggregation, Progress};
