use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;
use tracing::debug;

use crate::core::{Dataset, Slice};
use crate::error::OlaError;

/// Uniform sampler without replacement that cuts the sample into fixed-size slices.
///
/// The same seed over the same dataset always yields the same partition.
#[derive(Debug)]
pub struct SliceSampler {
    seed: u64,
    rng: StdRng,
}

impl SliceSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Re-seeds so the next [`split`](Self::split) repeats the first one.
    pub fn restart(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
    }

    /// Selects `round(sample_fraction * len)` rows (at least one if the dataset
    /// is non-empty) in random order and partitions them into slices of
    /// `slice_size` rows; only the last slice may be shorter.
    pub fn split<'a>(
        &mut self,
        dataset: &'a Dataset,
        sample_fraction: f64,
        slice_size: usize,
    ) -> Result<SampledSlices<'a>, OlaError> {
        if !(sample_fraction > 0.0 && sample_fraction <= 1.0) {
            return Err(OlaError::InvalidParameter(format!(
                "sample_fraction must be in (0, 1], got {sample_fraction}"
            )));
        }
        if slice_size == 0 {
            return Err(OlaError::InvalidParameter(
                "slice_size must be > 0".into(),
            ));
        }

        let n = dataset.len();
        let amount = if n == 0 {
            0
        } else {
            ((sample_fraction * n as f64).round() as usize).clamp(1, n)
        };

        let picked: Vec<usize> = index::sample(&mut self.rng, n, amount).into_vec();
        let rows = dataset.rows();
        let slices: Vec<Slice<'a>> = picked
            .chunks(slice_size)
            .map(|chunk| {
                Slice::new(
                    dataset.header().clone(),
                    chunk.iter().map(|&i| &rows[i]).collect(),
                )
            })
            .collect();

        debug!(
            total_rows = n,
            sampled_rows = amount,
            slices = slices.len(),
            slice_size,
            "dataset split into slices"
        );

        Ok(SampledSlices {
            slices,
            total_rows: n as u64,
            sampled_rows: amount as u64,
            fraction: sample_fraction,
        })
    }
}

/// Fully materialized output of [`SliceSampler::split`].
#[derive(Debug, Clone)]
pub struct SampledSlices<'a> {
    slices: Vec<Slice<'a>>,
    total_rows: u64,
    sampled_rows: u64,
    fraction: f64,
}

impl<'a> SampledSlices<'a> {
    pub fn slices(&self) -> &[Slice<'a>] {
        &self.slices
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Slice<'a>> {
        self.slices.iter()
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Rows in the unsampled dataset.
    pub fn total_rows(&self) -> u64 {
        self.total_rows
    }

    /// Rows across all slices.
    pub fn sampled_rows(&self) -> u64 {
        self.sampled_rows
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Projection from the full sample to the population; `None` for an empty sample.
    pub fn extrapolation_factor(&self) -> Option<f64> {
        if self.sampled_rows == 0 {
            None
        } else {
            Some(self.total_rows as f64 / self.sampled_rows as f64)
        }
    }
}

impl<'s, 'a> IntoIterator for &'s SampledSlices<'a> {
    type Item = &'s Slice<'a>;
    type IntoIter = std::slice::Iter<'s, Slice<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.slices.iter()
    }
}
