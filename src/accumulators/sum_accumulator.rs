use crate::accumulators::Accumulator;

/// Running sum with Neumaier compensation.
///
/// The compensation term collects the low-order bits lost by each addition,
/// so long runs of slices do not drift from a single batch sum.
#[derive(Debug, Default, Clone, Copy)]
pub struct SumAccumulator {
    sum: f64,
    compensation: f64,
    len: u64,
}

impl SumAccumulator {
    #[inline]
    fn add_compensated(&mut self, x: f64) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.compensation += (self.sum - t) + x;
        } else {
            self.compensation += (x - t) + self.sum;
        }
        self.sum = t;
    }

    /// Compensated total, `0.0` when empty.
    #[inline]
    pub fn total(&self) -> f64 {
        self.sum + self.compensation
    }
}

impl Accumulator for SumAccumulator {
    #[inline]
    fn add(&mut self, v: f64) {
        if v.is_nan() {
            return;
        }
        self.add_compensated(v);
        self.len += 1;
    }

    fn merge(&mut self, other: &Self) {
        self.add_compensated(other.sum);
        self.compensation += other.compensation;
        self.len += other.len;
    }

    #[inline]
    fn len(&self) -> u64 {
        self.len
    }

    #[inline]
    fn estimation(&self) -> Option<f64> {
        if self.len > 0 { Some(self.total()) } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_has_no_estimation() {
        let s = SumAccumulator::default();
        assert!(s.is_empty());
        assert!(s.estimation().is_none());
        assert_eq!(s.total(), 0.0);
    }

    #[test]
    fn nan_is_ignored() {
        let mut s = SumAccumulator::default();
        s.add(1.0);
        s.add(f64::NAN);
        s.add(2.0);
        assert_eq!(s.len(), 2);
        assert_eq!(s.estimation(), Some(3.0));
    }

    #[test]
    fn compensation_recovers_lost_bits() {
        let mut s = SumAccumulator::default();
        s.add(1.0);
        s.add(1e100);
        s.add(1.0);
        s.add(-1e100);
        assert_eq!(s.total(), 2.0);
    }

    #[test]
    fn merge_matches_sequential_adds() {
        let values: Vec<f64> = (0..1000).map(|i| 0.1 * i as f64).collect();

        let mut whole = SumAccumulator::default();
        values.iter().for_each(|&v| whole.add(v));

        let mut merged = SumAccumulator::default();
        for chunk in values.chunks(37) {
            let mut part = SumAccumulator::default();
            chunk.iter().for_each(|&v| part.add(v));
            merged.merge(&part);
        }

        assert_eq!(merged.len(), whole.len());
        assert!((merged.total() - whole.total()).abs() < 1e-9);
    }
}
