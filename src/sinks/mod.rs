mod estimate_curve;
mod presentation_sink;
mod terminal_sink;

pub use estimate_curve::{CurveFormat, EstimateCurve};
pub use presentation_sink::{EstimateFrame, NullSink, PresentationSink};
pub use terminal_sink::TerminalSink;
