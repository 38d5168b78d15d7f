use crate::estimators::Estimate;
use serde::Serialize;
use std::fmt::{Display, Formatter, Result};
use std::sync::mpsc::Sender;

/// One published update: chart labels and values plus how far the run has come.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateFrame {
    pub slices_seen: u64,
    pub rows_seen: u64,
    pub labels: Vec<String>,
    pub values: Vec<Option<f64>>,
}

impl EstimateFrame {
    pub fn new(slices_seen: u64, rows_seen: u64, estimate: &Estimate) -> Self {
        let (labels, values) = estimate.labels_and_values();
        Self {
            slices_seen,
            rows_seen,
            labels,
            values,
        }
    }
}

impl Display for EstimateFrame {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "slice={}, rows={}", self.slices_seen, self.rows_seen)?;
        for (label, value) in self.labels.iter().zip(&self.values) {
            match value {
                Some(v) => write!(f, ", [{label}]={v:.6}")?,
                None => write!(f, ", [{label}]=n/a")?,
            }
        }
        Ok(())
    }
}

/// Display target written to after every slice. The estimators never read back.
pub trait PresentationSink {
    /// Accepts an updated estimate. Must not fail the caller.
    fn update(&mut self, frame: &EstimateFrame);
}

impl<S: PresentationSink + ?Sized> PresentationSink for &mut S {
    fn update(&mut self, frame: &EstimateFrame) {
        (**self).update(frame)
    }
}

impl<S: PresentationSink + ?Sized> PresentationSink for Box<S> {
    fn update(&mut self, frame: &EstimateFrame) {
        (**self).update(frame)
    }
}

impl PresentationSink for Sender<EstimateFrame> {
    fn update(&mut self, frame: &EstimateFrame) {
        let _ = self.send(frame.clone());
    }
}

/// Forwards each frame to both sinks, left first.
impl<A: PresentationSink, B: PresentationSink> PresentationSink for (A, B) {
    fn update(&mut self, frame: &EstimateFrame) {
        self.0.update(frame);
        self.1.update(frame);
    }
}

/// Discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl PresentationSink for NullSink {
    fn update(&mut self, _frame: &EstimateFrame) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    #[test]
    fn frame_from_scalar_uses_empty_label() {
        let f = EstimateFrame::new(2, 40, &Estimate::Scalar(1.5));
        assert_eq!(f.labels, vec![String::new()]);
        assert_eq!(f.values, vec![Some(1.5)]);
        assert_eq!(f.to_string(), "slice=2, rows=40, []=1.500000");
    }

    #[test]
    fn sender_forwards_and_tolerates_dropped_receiver() {
        let (mut tx, rx) = channel::<EstimateFrame>();
        let frame = EstimateFrame::new(1, 10, &Estimate::NoData);
        tx.update(&frame);
        assert_eq!(rx.recv().unwrap(), frame);
        drop(rx);
        tx.update(&frame);
    }

    #[test]
    fn pair_fans_out_to_both() {
        let (a, ra) = channel::<EstimateFrame>();
        let (b, rb) = channel::<EstimateFrame>();
        let mut pair = (a, b);
        let frame = EstimateFrame::new(3, 30, &Estimate::Scalar(2.0));
        pair.update(&frame);
        assert_eq!(ra.recv().unwrap(), frame);
        assert_eq!(rb.recv().unwrap(), frame);
    }
}
