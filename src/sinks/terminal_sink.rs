use crate::sinks::{EstimateFrame, PresentationSink};
use std::io::{self, Write};
use tracing::warn;

const BAR_WIDTH: usize = 40;
const MAX_BARS: usize = 30;

/// Renders each frame as a horizontal text bar chart.
pub struct TerminalSink<W: Write> {
    out: W,
    title: String,
}

impl<W: Write> TerminalSink<W> {
    pub fn new<T: Into<String>>(out: W, title: T) -> Self {
        Self {
            out,
            title: title.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&mut self, frame: &EstimateFrame) -> io::Result<()> {
        writeln!(
            self.out,
            "{} | slice {} | {} rows",
            self.title, frame.slices_seen, frame.rows_seen
        )?;

        let scale = frame
            .values
            .iter()
            .flatten()
            .fold(0.0_f64, |m, v| m.max(v.abs()));
        let label_width = frame
            .labels
            .iter()
            .take(MAX_BARS)
            .map(String::len)
            .max()
            .unwrap_or(0);

        for (label, value) in frame.labels.iter().zip(&frame.values).take(MAX_BARS) {
            match value {
                Some(v) => {
                    let len = if scale > 0.0 {
                        ((v.abs() / scale) * BAR_WIDTH as f64).round() as usize
                    } else {
                        0
                    };
                    writeln!(
                        self.out,
                        "  {label:>label_width$} {:<bar_width$} {v:.4}",
                        "#".repeat(len),
                        bar_width = BAR_WIDTH
                    )?;
                }
                None => writeln!(self.out, "  {label:>label_width$} (no data yet)")?,
            }
        }
        if frame.labels.len() > MAX_BARS {
            writeln!(self.out, "  ... {} more", frame.labels.len() - MAX_BARS)?;
        }
        self.out.flush()
    }
}

impl<W: Write> PresentationSink for TerminalSink<W> {
    fn update(&mut self, frame: &EstimateFrame) {
        if let Err(e) = self.render(frame) {
            warn!(error = %e, "terminal sink failed to render frame");
        }
    }
}
