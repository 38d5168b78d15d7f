use crate::core::Slice;
use crate::error::OlaError;
use crate::estimators::Estimate;

/// Incremental estimator fed one slice at a time.
///
/// Implementations keep only the running state needed to produce the next
/// estimate. A call to [`process_slice`](OlaEstimator::process_slice) either
/// folds the whole slice and publishes a fresh estimate to the bound sink, or
/// fails with [`OlaError::SchemaMismatch`] and leaves the state untouched.
///
/// Not safe for concurrent slice submission; callers serialize access.
pub trait OlaEstimator {
    /// Short name used in logs and progress records.
    fn name(&self) -> &'static str;

    /// Folds a slice into the running state and publishes the new estimate.
    fn process_slice(&mut self, slice: &Slice<'_>) -> Result<(), OlaError>;

    /// Current estimate derived from the running state.
    fn estimate(&self) -> Estimate;

    /// Rows folded in so far, counting every row of every accepted slice.
    fn rows_seen(&self) -> u64;

    /// Slices accepted so far.
    fn slices_seen(&self) -> u64;
}

/// `total_rows / rows_seen`, re-derived on every call. `None` before any row.
#[inline]
pub fn extrapolation_factor(total_rows: u64, rows_seen: u64) -> Option<f64> {
    if rows_seen == 0 {
        None
    } else {
        Some(total_rows as f64 / rows_seen as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factor_is_undefined_before_any_row() {
        assert_eq!(extrapolation_factor(100, 0), None);
    }

    #[test]
    fn factor_recalibrates_as_rows_accumulate() {
        assert_eq!(extrapolation_factor(100_000, 2_000), Some(50.0));
        assert_eq!(extrapolation_factor(100_000, 10_000), Some(10.0));
    }
}
