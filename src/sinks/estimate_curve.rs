use crate::sinks::{EstimateFrame, PresentationSink};
use std::fs::File;
use std::io::{BufWriter, Error, Write};
use std::path::Path;

pub enum CurveFormat {
    Csv,
    Tsv,
    Json,
}

/// Sink that keeps every published frame, e.g. to plot convergence afterwards.
#[derive(Debug, Default, Clone)]
pub struct EstimateCurve {
    entries: Vec<EstimateFrame>,
}

impl EstimateCurve {
    pub fn push(&mut self, frame: EstimateFrame) {
        self.entries.push(frame)
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn latest(&self) -> Option<&EstimateFrame> {
        self.entries.last()
    }
    pub fn frames(&self) -> &[EstimateFrame] {
        &self.entries
    }

    pub fn export<P: AsRef<Path>>(&self, path: P, fmt: CurveFormat) -> Result<(), Error> {
        match fmt {
            CurveFormat::Csv => self.export_with_delimiter(path, ','),
            CurveFormat::Tsv => self.export_with_delimiter(path, '\t'),
            CurveFormat::Json => self.export_json(path),
        }
    }

    /// Long format: one line per (frame, label).
    fn export_with_delimiter<P: AsRef<Path>>(&self, path: P, delimiter: char) -> Result<(), Error> {
        let mut w = BufWriter::new(File::create(path)?);
        writeln!(w, "slices_seen{d}rows_seen{d}label{d}value", d = delimiter)?;
        for f in &self.entries {
            for (label, value) in f.labels.iter().zip(&f.values) {
                let value = value.map(|v| format!("{v:.12}")).unwrap_or_default();
                writeln!(
                    w,
                    "{}{d}{}{d}{}{d}{}",
                    f.slices_seen,
                    f.rows_seen,
                    label,
                    value,
                    d = delimiter
                )?;
            }
        }
        w.flush()
    }

    fn export_json<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let mut w = BufWriter::new(File::create(path)?);
        writeln!(w, "[")?;
        for (i, f) in self.entries.iter().enumerate() {
            writeln!(
                w,
                "  {}{}",
                serde_json::to_string(f)?,
                if i + 1 == self.entries.len() { "" } else { "," }
            )?;
        }
        writeln!(w, "]")?;
        w.flush()
    }
}

impl PresentationSink for EstimateCurve {
    fn update(&mut self, frame: &EstimateFrame) {
        self.push(frame.clone());
    }
}
