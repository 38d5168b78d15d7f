use crate::error::OlaError;
use crate::estimators::{Estimate, OlaEstimator};
use crate::sampling::SampledSlices;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// What the driver does when a slice is rejected with a schema mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Stop the run and return the error.
    #[default]
    Abort,
    /// Log the slice and move on; the estimator keeps its prior state.
    Skip,
}

/// Point-in-time view of a run, emitted after every slice.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub slices_processed: u64,
    pub slices_skipped: u64,
    pub rows_seen: u64,
    pub sampled_rows: u64,
    pub total_rows: u64,
    pub seconds: f64,
    pub estimate: Estimate,
}

impl Progress {
    /// Share of the sampled subset folded in so far; `1.0` means the estimate is final.
    pub fn sample_completion(&self) -> f64 {
        if self.sampled_rows == 0 {
            1.0
        } else {
            self.rows_seen as f64 / self.sampled_rows as f64
        }
    }

    /// Share of the full dataset folded in so far.
    pub fn population_coverage(&self) -> f64 {
        if self.total_rows == 0 {
            1.0
        } else {
            self.rows_seen as f64 / self.total_rows as f64
        }
    }
}

impl Display for Progress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "slices={} (skipped {}), rows={}/{} ({:.1}%), t={:.3}s, estimate={}",
            self.slices_processed,
            self.slices_skipped,
            self.rows_seen,
            self.sampled_rows,
            100.0 * self.sample_completion(),
            self.seconds,
            self.estimate
        )
    }
}

/// Feeds pre-sampled slices to one estimator, strictly in order.
pub struct OnlineAggregation<'a> {
    estimator: Box<dyn OlaEstimator + 'a>,
    slices: SampledSlices<'a>,

    max_slices: Option<u64>,
    max_seconds: Option<u64>,
    pace: Option<Duration>,
    policy: ErrorPolicy,

    next_slice: usize,
    processed: u64,
    skipped: u64,
    start_time: Instant,
    history: Vec<Progress>,

    progress_tx: Option<Sender<Progress>>,
}

impl<'a> OnlineAggregation<'a> {
    pub fn new(estimator: Box<dyn OlaEstimator + 'a>, slices: SampledSlices<'a>) -> Self {
        Self {
            estimator,
            slices,
            max_slices: None,
            max_seconds: None,
            pace: None,
            policy: ErrorPolicy::default(),
            next_slice: 0,
            processed: 0,
            skipped: 0,
            start_time: Instant::now(),
            history: Vec::new(),
            progress_tx: None,
        }
    }

    pub fn with_max_slices(mut self, max_slices: Option<u64>) -> Self {
        self.max_slices = max_slices;
        self
    }

    pub fn with_max_seconds(mut self, max_seconds: Option<u64>) -> Self {
        self.max_seconds = max_seconds;
        self
    }

    /// Sleep between slices so a live display can keep up.
    pub fn with_pace(mut self, pace: Option<Duration>) -> Self {
        self.pace = pace;
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_progress(mut self, tx: Sender<Progress>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    /// Processes remaining slices until exhausted or a limit is hit.
    ///
    /// Calling `run` again after the time limit stopped it resumes where it left off.
    pub fn run(&mut self) -> Result<(), OlaError> {
        self.start_time = Instant::now();
        info!(
            estimator = self.estimator.name(),
            slices = self.slices.len(),
            sampled_rows = self.slices.sampled_rows(),
            total_rows = self.slices.total_rows(),
            sample_factor = self.slices.extrapolation_factor(),
            "online aggregation started"
        );

        while self.next_slice < self.slices.len() {
            if let Some(n) = self.max_slices {
                if self.processed + self.skipped >= n {
                    break;
                }
            }
            if let Some(s) = self.max_seconds {
                if self.start_time.elapsed().as_secs() >= s {
                    break;
                }
            }

            let index = self.next_slice;
            let slice = &self.slices.slices()[index];
            match self.estimator.process_slice(slice) {
                Ok(()) => self.processed += 1,
                Err(e) if e.is_schema_mismatch() && self.policy == ErrorPolicy::Skip => {
                    warn!(slice = index, error = %e, "slice skipped");
                    self.skipped += 1;
                }
                Err(e) => return Err(e),
            }
            self.next_slice += 1;
            self.push_progress();

            if let Some(pace) = self.pace {
                if self.next_slice < self.slices.len() {
                    thread::sleep(pace);
                }
            }
        }

        info!(
            estimator = self.estimator.name(),
            processed = self.processed,
            skipped = self.skipped,
            estimate = %self.estimator.estimate(),
            "online aggregation stopped"
        );
        Ok(())
    }

    pub fn is_finished(&self) -> bool {
        self.next_slice >= self.slices.len()
    }

    pub fn estimator(&self) -> &dyn OlaEstimator {
        self.estimator.as_ref()
    }

    pub fn slices(&self) -> &SampledSlices<'a> {
        &self.slices
    }

    pub fn history(&self) -> &[Progress] {
        &self.history
    }

    pub fn latest(&self) -> Option<&Progress> {
        self.history.last()
    }

    fn push_progress(&mut self) {
        let progress = Progress {
            slices_processed: self.processed,
            slices_skipped: self.skipped,
            rows_seen: self.estimator.rows_seen(),
            sampled_rows: self.slices.sampled_rows(),
            total_rows: self.slices.total_rows(),
            seconds: self.start_time.elapsed().as_secs_f64(),
            estimate: self.estimator.estimate(),
        };

        if let Some(tx) = &self.progress_tx {
            let _ = tx.send(progress.clone());
        }
        self.history.push(progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulators::{Accumulator, MeanAccumulator, SumAccumulator};
    use crate::core::{Dataset, GroupKey};
    use crate::datasets::{SalesGenerator, collect_dataset};
    use crate::estimators::{AvgOla, GroupByAvgOla, GroupBySumOla};
    use crate::sampling::SliceSampler;
    use crate::sinks::NullSink;
    use crate::testing::dummies::{sale, sales, sales_header};
    use crate::testing::SpySink;
    use std::collections::HashMap;
    use std::sync::mpsc::channel;

    fn generated(n: usize) -> Dataset {
        let mut g = SalesGenerator::new(20, 500, Some(n), 2024).unwrap();
        collect_dataset(&mut g)
    }

    fn batch_mean(slices: &SampledSlices<'_>, col: usize) -> f64 {
        let mut m = MeanAccumulator::default();
        for s in slices {
            for r in s.rows() {
                m.add(r.values[col].as_f64().unwrap());
            }
        }
        m.estimation().unwrap()
    }

    #[test]
    fn concrete_scenario_avg_matches_sampled_mean() {
        let ds = generated(100_000);
        let slices = SliceSampler::new(1).split(&ds, 0.1, 2_000).unwrap();
        assert_eq!(slices.len(), 5);
        let price = ds.header().index_of_column("item_price").unwrap();
        let expected = batch_mean(&slices, price);

        let mut run = OnlineAggregation::new(Box::new(AvgOla::new(NullSink, "item_price")), slices);
        run.run().unwrap();

        assert!(run.is_finished());
        assert_eq!(run.history().len(), 5);
        let last = run.latest().unwrap();
        assert_eq!(last.rows_seen, 10_000);
        assert_eq!(last.sample_completion(), 1.0);
        assert!((last.population_coverage() - 0.1).abs() < 1e-12);
        let got = last.estimate.scalar().unwrap();
        assert!((got - expected).abs() < 1e-9 * expected.abs().max(1.0));
    }

    #[test]
    fn concrete_scenario_group_sum_is_sampled_sum_times_ten() {
        let ds = generated(100_000);
        let slices = SliceSampler::new(2).split(&ds, 0.1, 2_000).unwrap();
        let shop = ds.header().index_of_column("shop_id").unwrap();
        let cnt = ds.header().index_of_column("item_cnt_day").unwrap();

        let mut sampled: HashMap<GroupKey, SumAccumulator> = HashMap::new();
        for s in slices.iter() {
            for r in s.rows() {
                let key = r.values[shop].group_key().unwrap();
                sampled.entry(key).or_default().add(r.values[cnt].as_f64().unwrap());
            }
        }

        let ola = GroupBySumOla::new(NullSink, 100_000, "shop_id", "item_cnt_day");
        let mut run = OnlineAggregation::new(Box::new(ola), slices);
        run.run().unwrap();

        let estimate = run.latest().unwrap().estimate.clone();
        let groups = estimate.groups().unwrap();
        assert_eq!(groups.len(), sampled.len());
        for (key, sum) in &sampled {
            let want = sum.total() * 10.0;
            let got = groups[key];
            assert!((got - want).abs() < 1e-6, "shop {key}: {got} vs {want}");
        }
    }

    #[test]
    fn full_fraction_group_means_equal_batch_means_for_any_slice_size() {
        let ds = generated(3_000);
        let shop = ds.header().index_of_column("shop_id").unwrap();
        let price = ds.header().index_of_column("item_price").unwrap();
        let mut batch: HashMap<GroupKey, MeanAccumulator> = HashMap::new();
        for r in ds.rows() {
            batch
                .entry(r.values[shop].group_key().unwrap())
                .or_default()
                .add(r.values[price].as_f64().unwrap());
        }

        for slice_size in [1, 7, 250, 3_000] {
            let slices = SliceSampler::new(slice_size as u64).split(&ds, 1.0, slice_size).unwrap();
            let ola = GroupByAvgOla::new(NullSink, "shop_id", "item_price");
            let mut run = OnlineAggregation::new(Box::new(ola), slices);
            run.run().unwrap();
            let estimate = run.estimator().estimate();
            for (key, m) in &batch {
                let want = m.estimation().unwrap();
                let got = estimate.group(key).unwrap();
                assert!((got - want).abs() < 1e-9 * want.abs().max(1.0), "size {slice_size}");
            }
        }
    }

    #[test]
    fn progress_is_sent_after_every_slice() {
        let ds = sales();
        let slices = SliceSampler::new(3).split(&ds, 1.0, 2).unwrap();
        let (tx, rx) = channel();
        let (sink, handle) = SpySink::new();
        let mut run = OnlineAggregation::new(Box::new(AvgOla::new(sink, "item_price")), slices)
            .with_progress(tx);
        run.run().unwrap();

        let got: Vec<Progress> = rx.try_iter().collect();
        assert_eq!(got.len(), 3);
        assert_eq!(handle.count(), 3);
        assert_eq!(got.iter().map(|p| p.rows_seen).collect::<Vec<_>>(), vec![2, 4, 6]);
        assert_eq!(got[2].estimate, Estimate::Scalar(28.0));
    }

    #[test]
    fn stops_at_max_slices() {
        let ds = sales();
        let slices = SliceSampler::new(4).split(&ds, 1.0, 1).unwrap();
        let mut run = OnlineAggregation::new(Box::new(AvgOla::new(NullSink, "item_price")), slices)
            .with_max_slices(Some(4));
        run.run().unwrap();
        assert!(!run.is_finished());
        assert_eq!(run.latest().unwrap().rows_seen, 4);
        assert!(run.latest().unwrap().sample_completion() < 1.0);
    }

    #[test]
    fn stops_immediately_when_time_zero() {
        let ds = sales();
        let slices = SliceSampler::new(4).split(&ds, 1.0, 2).unwrap();
        let mut run = OnlineAggregation::new(Box::new(AvgOla::new(NullSink, "item_price")), slices)
            .with_max_seconds(Some(0));
        run.run().unwrap();
        assert!(run.history().is_empty());
        assert!(run.estimator().estimate().is_no_data());
    }

    fn with_bad_middle_slice() -> Dataset {
        Dataset::new(
            sales_header(),
            vec![
                sale(0.0, 1.0, 1.0, 10.0, 1.0),
                sale(0.0, 1.0, 1.0, "bad", 1.0),
                sale(0.0, 1.0, 1.0, 20.0, 1.0),
            ],
        )
    }

    #[test]
    fn abort_policy_returns_schema_mismatch() {
        let ds = with_bad_middle_slice();
        let mut run = OnlineAggregation::new(
            Box::new(AvgOla::new(NullSink, "item_price")),
            SliceSampler::new(0).split(&ds, 1.0, 1).unwrap(),
        );
        let err = run.run().unwrap_err();
        assert!(err.is_schema_mismatch());
        assert!(!run.is_finished());
    }

    #[test]
    fn skip_policy_keeps_prior_state_and_continues() {
        let ds = with_bad_middle_slice();
        let mut run = OnlineAggregation::new(
            Box::new(AvgOla::new(NullSink, "item_price")),
            SliceSampler::new(0).split(&ds, 1.0, 1).unwrap(),
        )
        .with_error_policy(ErrorPolicy::Skip);
        run.run().unwrap();

        let last = run.latest().unwrap();
        assert_eq!(last.slices_processed, 2);
        assert_eq!(last.slices_skipped, 1);
        assert_eq!(last.rows_seen, 2);
        assert_eq!(last.estimate, Estimate::Scalar(15.0));
    }
}
