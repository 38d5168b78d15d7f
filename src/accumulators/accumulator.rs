/// Online scalar accumulator (running sum, running mean).
///
/// Implementations accept values incrementally via [`add`](Accumulator::add),
/// can absorb another partial accumulator via [`merge`](Accumulator::merge),
/// and expose the current value via [`estimation`](Accumulator::estimation).
pub trait Accumulator: Default {
    /// Incorporates a new observation. NaN observations are ignored.
    fn add(&mut self, v: f64);

    /// Folds a partial accumulator (e.g. one slice's worth) into this one.
    fn merge(&mut self, other: &Self);

    /// Number of observations folded in so far.
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the current value, `None` before the first observation.
    fn estimation(&self) -> Option<f64>;
}
