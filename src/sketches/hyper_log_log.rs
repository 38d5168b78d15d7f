use crate::error::OlaError;
use twox_hash::XxHash64;

pub const MIN_PRECISION: u8 = 4;
pub const MAX_PRECISION: u8 = 16;

/// HyperLogLog cardinality sketch over string items.
///
/// `2^precision` one-byte registers; items are hashed with seeded xxHash64.
/// Inserting the same item again never changes the sketch.
#[derive(Debug, Clone, PartialEq)]
pub struct HyperLogLog {
    precision: u8,
    seed: u64,
    registers: Vec<u8>,
}

impl HyperLogLog {
    pub fn new(precision: u8, seed: u64) -> Result<Self, OlaError> {
        if !(MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
            return Err(OlaError::InvalidParameter(format!(
                "precision must be in [{MIN_PRECISION}, {MAX_PRECISION}], got {precision}"
            )));
        }
        Ok(Self {
            precision,
            seed,
            registers: vec![0; 1 << precision],
        })
    }

    /// An empty sketch that can be merged into this one.
    pub fn empty_like(&self) -> Self {
        Self {
            precision: self.precision,
            seed: self.seed,
            registers: vec![0; self.registers.len()],
        }
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn insert(&mut self, item: &str) {
        let hash = XxHash64::oneshot(self.seed, item.as_bytes());
        let p = u32::from(self.precision);
        let index = (hash >> (64 - p)) as usize;
        let rest = hash << p;
        let max_rank = 64 - p + 1;
        let rank = (rest.leading_zeros() + 1).min(max_rank) as u8;
        if rank > self.registers[index] {
            self.registers[index] = rank;
        }
    }

    /// Register-wise max. Both sketches must share precision and seed.
    pub fn merge(&mut self, other: &HyperLogLog) -> Result<(), OlaError> {
        if self.precision != other.precision || self.seed != other.seed {
            return Err(OlaError::InvalidParameter(
                "cannot merge sketches with different precision or seed".into(),
            ));
        }
        for (a, &b) in self.registers.iter_mut().zip(&other.registers) {
            *a = (*a).max(b);
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.registers.iter().all(|&r| r == 0)
    }

    pub fn cardinality(&self) -> f64 {
        let m = self.registers.len() as f64;
        let alpha = match self.registers.len() {
            16 => 0.673,
            32 => 0.697,
            64 => 0.709,
            _ => 0.7213 / (1.0 + 1.079 / m),
        };

        let mut harmonic = 0.0;
        let mut zeros = 0usize;
        for &r in &self.registers {
            harmonic += 2f64.powi(-i32::from(r));
            if r == 0 {
                zeros += 1;
            }
        }

        let raw = alpha * m * m / harmonic;
        if raw <= 2.5 * m && zeros > 0 {
            // linear counting
            m * (m / zeros as f64).ln()
        } else {
            raw
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precision_is_validated() {
        assert!(HyperLogLog::new(3, 0).is_err());
        assert!(HyperLogLog::new(17, 0).is_err());
        assert_eq!(HyperLogLog::new(4, 0).unwrap().registers.len(), 16);
    }

    #[test]
    fn empty_sketch_counts_zero() {
        let h = HyperLogLog::new(10, 1).unwrap();
        assert!(h.is_empty());
        assert_eq!(h.cardinality(), 0.0);
    }

    #[test]
    fn repeated_items_do_not_grow_the_sketch() {
        let mut h = HyperLogLog::new(12, 123_456_789).unwrap();
        h.insert("shop-31");
        let once = h.clone();
        for _ in 0..100 {
            h.insert("shop-31");
        }
        assert_eq!(h, once);
        assert!((h.cardinality() - 1.0).abs() < 0.01);
    }

    #[test]
    fn estimate_is_close_for_ten_thousand_items() {
        let mut h = HyperLogLog::new(14, 7).unwrap();
        for i in 0..10_000 {
            h.insert(&i.to_string());
        }
        let est = h.cardinality();
        assert!((est - 10_000.0).abs() / 10_000.0 < 0.05, "estimate {est}");
    }

    #[test]
    fn merge_equals_inserting_everything() {
        let mut a = HyperLogLog::new(10, 5).unwrap();
        let mut b = HyperLogLog::new(10, 5).unwrap();
        let mut all = HyperLogLog::new(10, 5).unwrap();
        for i in 0..500 {
            let s = i.to_string();
            if i % 2 == 0 { a.insert(&s) } else { b.insert(&s) }
            all.insert(&s);
        }
        a.merge(&b).unwrap();
        assert_eq!(a, all);

        let other = HyperLogLog::new(11, 5).unwrap();
        assert!(a.merge(&other).is_err());
    }
}
