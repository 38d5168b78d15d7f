pub mod spy_sink;

pub use spy_sink::{SpyHandle, SpySink};
