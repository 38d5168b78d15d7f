mod hyper_log_log;

pub use hyper_log_log::HyperLogLog;
