use crate::sinks::{EstimateFrame, PresentationSink};
use std::sync::{Arc, Mutex};

/// Sink that shares what it receives with a handle kept by the test.
pub struct SpySink {
    frames: Arc<Mutex<Vec<EstimateFrame>>>,
}

#[derive(Clone)]
pub struct SpyHandle {
    frames: Arc<Mutex<Vec<EstimateFrame>>>,
}

impl SpySink {
    pub fn new() -> (Self, SpyHandle) {
        let frames = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                frames: Arc::clone(&frames),
            },
            SpyHandle { frames },
        )
    }
}

impl PresentationSink for SpySink {
    fn update(&mut self, frame: &EstimateFrame) {
        self.frames.lock().unwrap().push(frame.clone());
    }
}

impl SpyHandle {
    pub fn count(&self) -> usize {
        self.frames.lock().unwrap().len()
    }

    pub fn latest(&self) -> Option<EstimateFrame> {
        self.frames.lock().unwrap().last().cloned()
    }

    pub fn frames(&self) -> Vec<EstimateFrame> {
        self.frames.lock().unwrap().clone()
    }
}
