mod slice_sampler;

pub use slice_sampler::{SampledSlices, SliceSampler};
