use crate::accumulators::{Accumulator, SumAccumulator};
use crate::core::{GroupKey, Slice, numeric_cell};
use crate::error::OlaError;
use crate::estimators::shared::{group_cell, publish};
use crate::estimators::{Estimate, OlaEstimator, extrapolation_factor};
use crate::sinks::PresentationSink;
use std::collections::HashMap;

/// Projected per-group total of `sum_col` over the whole (unsampled) dataset.
///
/// The running state holds raw sums; the factor `total_rows / rows_seen` is
/// applied on every [`estimate`](OlaEstimator::estimate) so the projection
/// recalibrates as slices of any size arrive.
pub struct GroupBySumOla<S: PresentationSink> {
    sink: S,
    total_rows: u64,
    groupby_col: String,
    sum_col: String,
    groups: HashMap<GroupKey, SumAccumulator>,
    rows_seen: u64,
    slices_seen: u64,
}

impl<S: PresentationSink> GroupBySumOla<S> {
    pub fn new<G: Into<String>, C: Into<String>>(
        sink: S,
        total_rows: u64,
        groupby_col: G,
        sum_col: C,
    ) -> Self {
        Self {
            sink,
            total_rows,
            groupby_col: groupby_col.into(),
            sum_col: sum_col.into(),
            groups: HashMap::new(),
            rows_seen: 0,
            slices_seen: 0,
        }
    }

    pub fn total_rows(&self) -> u64 {
        self.total_rows
    }

    pub fn groupby_col(&self) -> &str {
        &self.groupby_col
    }

    pub fn sum_col(&self) -> &str {
        &self.sum_col
    }

    /// Unscaled running sum for one group.
    pub fn raw_sum(&self, key: &GroupKey) -> Option<f64> {
        self.groups.get(key).map(SumAccumulator::total)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<S: PresentationSink> OlaEstimator for GroupBySumOla<S> {
    fn name(&self) -> &'static str {
        "group-by-sum"
    }

    fn process_slice(&mut self, slice: &Slice<'_>) -> Result<(), OlaError> {
        let group_idx = slice.require_column(&self.groupby_col)?;
        let sum_idx = slice.require_column(&self.sum_col)?;

        let mut delta: HashMap<GroupKey, SumAccumulator> = HashMap::new();
        for row in slice.rows() {
            let Some(key) = group_cell(row, group_idx, &self.groupby_col)? else {
                continue;
            };
            let value = numeric_cell(row, sum_idx, &self.sum_col)?;
            let acc = delta.entry(key).or_default();
            if let Some(v) = value {
                acc.add(v);
            }
        }

        for (key, part) in delta {
            self.groups.entry(key).or_default().merge(&part);
        }
        self.rows_seen += slice.len() as u64;
        self.slices_seen += 1;

        let estimate = self.estimate();
        let name = self.name();
        publish(&mut self.sink, name, self.slices_seen, self.rows_seen, &estimate);
        Ok(())
    }

    fn estimate(&self) -> Estimate {
        let Some(factor) = extrapolation_factor(self.total_rows, self.rows_seen) else {
            return Estimate::Grouped(Default::default());
        };
        Estimate::Grouped(
            self.groups
                .iter()
                .map(|(k, s)| (k.clone(), s.total() * factor))
                .collect(),
        )
    }

    fn rows_seen(&self) -> u64 {
        self.rows_seen
    }

    fn slices_seen(&self) -> u64 {
        self.slices_seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::EstimateCurve;
    use crate::testing::dummies::{sale, sales, sales_header};

    #[test]
    fn empty_before_any_row() {
        let ola = GroupBySumOla::new(EstimateCurve::default(), 100, "shop_id", "item_cnt_day");
        assert!(ola.estimate().groups().unwrap().is_empty());
    }

    #[test]
    fn factor_is_recomputed_from_rows_seen() {
        let ds = sales();
        let h = ds.header().clone();
        let mut ola = GroupBySumOla::new(EstimateCurve::default(), 60, "shop_id", "item_cnt_day");

        // 2 of 60 rows seen: factor 30
        ola.process_slice(&Slice::from_rows(h.clone(), &ds.rows()[..2])).unwrap();
        let e = ola.estimate();
        assert_eq!(e.group(&1.0.into()), Some(30.0));
        assert_eq!(e.group(&2.0.into()), Some(60.0));

        // 6 of 60 rows seen: factor 10
        ola.process_slice(&Slice::from_rows(h, &ds.rows()[2..])).unwrap();
        let e = ola.estimate();
        assert_eq!(e.group(&1.0.into()), Some(40.0));
        assert_eq!(e.group(&2.0.into()), Some(50.0));
        assert_eq!(e.group(&3.0.into()), Some(10.0));
        assert_eq!(ola.raw_sum(&1.0.into()), Some(4.0));
    }

    #[test]
    fn slice_boundaries_do_not_change_the_final_value() {
        let ds = sales();
        let run = |size: usize| {
            let mut ola = GroupBySumOla::new(EstimateCurve::default(), 6, "shop_id", "item_price");
            for chunk in ds.rows().chunks(size) {
                ola.process_slice(&Slice::from_rows(ds.header().clone(), chunk)).unwrap();
            }
            ola.estimate()
        };
        let whole = run(6);
        for size in [1, 2, 4, 5] {
            assert_eq!(run(size), whole, "slice size {size}");
        }
        assert_eq!(whole.group(&1.0.into()), Some(58.0));
    }

    #[test]
    fn text_in_sum_column_rolls_back() {
        let h = sales_header();
        let mut ola = GroupBySumOla::new(EstimateCurve::default(), 10, "shop_id", "item_cnt_day");
        let bad = vec![
            sale(0.0, 1.0, 1.0, 1.0, 3.0),
            crate::core::Row::new(vec![
                0.0.into(),
                1.0.into(),
                1.0.into(),
                1.0.into(),
                "three".into(),
            ]),
        ];
        assert!(ola.process_slice(&Slice::from_rows(h, &bad)).unwrap_err().is_schema_mismatch());
        assert_eq!(ola.rows_seen(), 0);
        assert!(ola.estimate().groups().unwrap().is_empty());
        assert!(ola.sink().is_empty());
    }
}
