mod accumulator;
mod mean_accumulator;
mod sum_accumulator;

pub use accumulator::Accumulator;
pub use mean_accumulator::MeanAccumulator;
pub use sum_accumulator::SumAccumulator;
