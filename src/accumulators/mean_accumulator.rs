use crate::accumulators::{Accumulator, SumAccumulator};

/// Streaming mean estimator: `mean = sum / len`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MeanAccumulator {
    sum: SumAccumulator,
}

impl MeanAccumulator {
    pub fn sum(&self) -> f64 {
        self.sum.total()
    }
}

impl Accumulator for MeanAccumulator {
    #[inline]
    fn add(&mut self, v: f64) {
        self.sum.add(v);
    }

    fn merge(&mut self, other: &Self) {
        self.sum.merge(&other.sum);
    }

    #[inline]
    fn len(&self) -> u64 {
        self.sum.len()
    }

    #[inline]
    fn estimation(&self) -> Option<f64> {
        if self.sum.is_empty() {
            None
        } else {
            Some(self.sum.total() / self.sum.len() as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_nothing_is_none() {
        assert!(MeanAccumulator::default().estimation().is_none());
    }

    #[test]
    fn mean_tracks_sum_and_len() {
        let mut m = MeanAccumulator::default();
        for v in [2.0, 4.0, 9.0] {
            m.add(v);
        }
        assert_eq!(m.len(), 3);
        assert_eq!(m.sum(), 15.0);
        assert_eq!(m.estimation(), Some(5.0));
    }

    #[test]
    fn merged_partials_give_the_batch_mean() {
        let mut a = MeanAccumulator::default();
        a.add(1.0);
        a.add(2.0);
        let mut b = MeanAccumulator::default();
        b.add(6.0);
        a.merge(&b);
        assert_eq!(a.estimation(), Some(3.0));
    }
}
