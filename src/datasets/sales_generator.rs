use std::io::{Error, ErrorKind};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::{DatasetHeader, Row, Value};
use crate::datasets::RowSource;

const MONTHS: u32 = 34;

/// Synthetic daily sales records in the shape of a retail transactions table.
///
/// Columns: `date_block_num`, `shop_id`, `item_id`, `item_price`, `item_cnt_day`.
/// Each item has a fixed list price; shops are skewed so group sizes differ.
#[derive(Debug)]
pub struct SalesGenerator {
    seed: u64,
    rng: StdRng,
    num_shops: u32,
    item_prices: Vec<f64>,
    header: Arc<DatasetHeader>,
    max_rows: Option<usize>,
    produced: usize,
}

impl SalesGenerator {
    pub fn new(
        num_shops: u32,
        num_items: u32,
        max_rows: Option<usize>,
        seed: u64,
    ) -> Result<Self, Error> {
        if num_shops == 0 || num_items == 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "num_shops and num_items must be > 0",
            ));
        }

        let header = Arc::new(DatasetHeader::new(
            "sales".into(),
            ["date_block_num", "shop_id", "item_id", "item_price", "item_cnt_day"],
        ));

        let mut g = Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
            num_shops,
            item_prices: Vec::new(),
            header,
            max_rows,
            produced: 0,
        };
        let prices: Vec<f64> = (0..num_items).map(|_| g.list_price()).collect();
        g.item_prices = prices;
        Ok(g)
    }

    #[inline]
    fn list_price(&mut self) -> f64 {
        let p: f64 = self.rng.random_range(1.0..3000.0);
        (p * 100.0).round() / 100.0
    }

    /// Lower shop ids sell more: pick the smaller of two uniform draws.
    #[inline]
    fn shop(&mut self) -> u32 {
        let a = self.rng.random_range(0..self.num_shops);
        let b = self.rng.random_range(0..self.num_shops);
        a.min(b)
    }

    #[inline]
    fn count(&mut self) -> f64 {
        let roll: u32 = self.rng.random_range(1..=100);
        match roll {
            1..=80 => 1.0,
            81..=95 => 2.0,
            _ => self.rng.random_range(3..=10) as f64,
        }
    }
}

impl RowSource for SalesGenerator {
    fn header(&self) -> &Arc<DatasetHeader> {
        &self.header
    }

    fn has_more_rows(&self) -> bool {
        self.max_rows.map_or(true, |max| self.produced < max)
    }

    fn next_row(&mut self) -> Option<Row> {
        if !self.has_more_rows() {
            return None;
        }

        let block = match self.max_rows {
            Some(max) => (self.produced * MONTHS as usize / max) as f64,
            None => (self.produced / 10_000 % MONTHS as usize) as f64,
        };
        let shop = self.shop();
        let item = self.rng.random_range(0..self.item_prices.len());
        let discount: f64 = self.rng.random_range(0.8..=1.0);
        let price = (self.item_prices[item] * discount * 100.0).round() / 100.0;
        let cnt = self.count();

        self.produced += 1;
        Some(Row::new(vec![
            Value::from(block),
            Value::from(shop as f64),
            Value::from(item as f64),
            Value::from(price),
            Value::from(cnt),
        ]))
    }

    fn restart(&mut self) -> Result<(), Error> {
        let num_items = self.item_prices.len() as u32;
        *self = Self::new(self.num_shops, num_items, self.max_rows, self.seed)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasets::collect_dataset;

    #[test]
    fn header_shape() {
        let g = SalesGenerator::new(3, 10, Some(1), 42).unwrap();
        let h = g.header();
        assert_eq!(h.number_of_columns(), 5);
        assert_eq!(h.index_of_column("shop_id"), Some(1));
        assert_eq!(h.index_of_column("item_cnt_day"), Some(4));
    }

    #[test]
    fn bounded_generator_stops_at_max_rows() {
        let mut g = SalesGenerator::new(5, 20, Some(250), 1).unwrap();
        let ds = collect_dataset(&mut g);
        assert_eq!(ds.len(), 250);
        assert!(!g.has_more_rows());
        assert!(g.next_row().is_none());
    }

    #[test]
    fn values_stay_in_range() {
        let mut g = SalesGenerator::new(4, 7, Some(500), 9).unwrap();
        let ds = collect_dataset(&mut g);
        for r in ds.rows() {
            let v: Vec<f64> = r.values.iter().map(|x| x.as_f64().unwrap()).collect();
            assert!((0.0..MONTHS as f64).contains(&v[0]));
            assert!((0.0..4.0).contains(&v[1]));
            assert!((0.0..7.0).contains(&v[2]));
            assert!(v[3] > 0.0 && v[3] <= 3000.0);
            assert!((1.0..=10.0).contains(&v[4]));
        }
    }

    #[test]
    fn restart_resets_sequence_with_same_seed() {
        let mut g = SalesGenerator::new(6, 30, Some(100), 12345).unwrap();
        let first: Vec<Row> = (0..30).map(|_| g.next_row().unwrap()).collect();
        g.restart().unwrap();
        let second: Vec<Row> = (0..30).map(|_| g.next_row().unwrap()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let err = SalesGenerator::new(0, 1, None, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        let err = SalesGenerator::new(1, 0, None, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
