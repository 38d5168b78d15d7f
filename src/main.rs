use std::io;
use std::path::Path;
use std::time::Duration;
use std::{env, fs};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ola::datasets::collect_dataset;
use ola::sampling::SliceSampler;
use ola::sinks::{CurveFormat, EstimateCurve, TerminalSink};
use ola::tasks::OnlineAggregation;
use ola::ui::cli::drivers::InquireDriver;
use ola::ui::cli::wizard::prompt_choice;
use ola::ui::types::build::{build_dataset, build_estimator};
use ola::ui::types::choices::{EstimatorKind, OnlineAggregationParams, TaskChoice};

fn load_task(path: &Path) -> Result<TaskChoice> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn run(p: OnlineAggregationParams) -> Result<()> {
    let mut source = build_dataset(p.dataset)?;
    let data = collect_dataset(source.as_mut());
    info!(
        relation = data.header().relation_name(),
        rows = data.len(),
        columns = data.header().number_of_columns(),
        "dataset loaded"
    );

    let slice_size = usize::try_from(p.slice_size).context("slice_size too large")?;
    let slices = SliceSampler::new(p.seed).split(&data, p.fraction, slice_size)?;
    let total_rows = slices.total_rows();

    let title = EstimatorKind::from(&p.estimator).to_string();
    let mut curve = EstimateCurve::default();
    {
        let sink = (TerminalSink::new(io::stdout(), title), &mut curve);
        let estimator = build_estimator(p.estimator, sink, total_rows)?;
        let pace = (p.pace_ms > 0).then(|| Duration::from_millis(p.pace_ms));

        let mut task = OnlineAggregation::new(estimator, slices)
            .with_max_slices(p.max_slices)
            .with_max_seconds(p.max_seconds)
            .with_pace(pace)
            .with_error_policy(p.error_policy);
        task.run()?;

        if let Some(last) = task.latest() {
            info!("{last}");
        }
    }

    if p.export_curve {
        let path = format!("ola-curve-{}.csv", Local::now().format("%Y%m%d-%H%M%S"));
        curve
            .export(&path, CurveFormat::Csv)
            .with_context(|| format!("writing {path}"))?;
        info!(path = %path, frames = curve.len(), "estimate curve exported");
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let task = match env::args_os().nth(1) {
        Some(path) => load_task(Path::new(&path))?,
        None => prompt_choice::<TaskChoice, _>(&InquireDriver)?,
    };

    match task {
        TaskChoice::OnlineAggregation(p) => run(p),
    }
}
