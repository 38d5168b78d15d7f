use crate::tasks::ErrorPolicy;
use crate::ui::cli::wizard::prompt_choice;
use crate::ui::types::choices::{DatasetChoice, EstimatorChoice, UIChoice};
use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

fn default_fraction() -> f64 {
    0.1
}
fn default_slice_size() -> u64 {
    2_000
}
fn default_seed() -> u64 {
    42
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct OnlineAggregationParams {
    #[serde(default)]
    #[schemars(skip)]
    pub estimator: EstimatorChoice,
    #[serde(default)]
    #[schemars(skip)]
    pub dataset: DatasetChoice,

    #[serde(default = "default_fraction")]
    #[schemars(
        title = "Sampling fraction",
        description = "Share of rows drawn without replacement (0-1]",
        range(min = 0.0, max = 1.0),
        default = "default_fraction"
    )]
    pub fraction: f64,

    #[serde(default = "default_slice_size")]
    #[schemars(
        title = "Slice size",
        description = "Rows per slice",
        range(min = 1),
        default = "default_slice_size"
    )]
    pub slice_size: u64,

    #[serde(default = "default_seed")]
    #[schemars(title = "Seed", description = "Sampling seed", default = "default_seed")]
    pub seed: u64,

    #[serde(default)]
    #[schemars(
        title = "Max Slices",
        description = "Stop after this many slices (None = all)"
    )]
    pub max_slices: Option<u64>,

    #[serde(default)]
    #[schemars(
        title = "Max Seconds",
        description = "Stop after this many seconds (None = unlimited)"
    )]
    pub max_seconds: Option<u64>,

    #[serde(default)]
    #[schemars(
        title = "Pace (ms)",
        description = "Pause between slices so the estimate can be watched converge"
    )]
    pub pace_ms: u64,

    #[serde(default)]
    #[schemars(skip)]
    pub error_policy: ErrorPolicy,

    #[serde(default)]
    #[schemars(
        title = "Export curve?",
        description = "Write every estimate frame to a timestamped CSV when done"
    )]
    pub export_curve: bool,
}

impl Default for OnlineAggregationParams {
    fn default() -> Self {
        Self {
            estimator: EstimatorChoice::default(),
            dataset: DatasetChoice::default(),
            fraction: default_fraction(),
            slice_size: default_slice_size(),
            seed: default_seed(),
            max_slices: None,
            max_seconds: None,
            pace_ms: 0,
            error_policy: ErrorPolicy::default(),
            export_curve: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants, PartialEq)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(TaskKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum TaskChoice {
    #[strum_discriminants(strum(
        message = "Online Aggregation",
        detailed_message = "Feed sampled slices to an estimator and watch it converge."
    ))]
    OnlineAggregation(OnlineAggregationParams),
}

impl UIChoice for TaskChoice {
    type Kind = TaskKind;

    fn schema() -> Schema {
        schema_for!(TaskChoice)
    }

    fn prompt_label() -> &'static str {
        "Choose a task:"
    }

    fn default_params(kind: Self::Kind) -> Value {
        match kind {
            TaskKind::OnlineAggregation => json!({
                "fraction": default_fraction(),
                "slice_size": default_slice_size(),
                "seed": default_seed(),
                "max_slices": null,
                "max_seconds": null,
                "pace_ms": 0,
                "export_curve": false,
            }),
        }
    }

    fn subprompts<D: crate::ui::cli::drivers::PromptDriver>(
        driver: &D,
        kind: Self::Kind,
    ) -> anyhow::Result<Option<Map<String, Value>>> {
        match kind {
            TaskKind::OnlineAggregation => {
                let dataset = prompt_choice::<DatasetChoice, _>(driver)?;
                let estimator = prompt_choice::<EstimatorChoice, _>(driver)?;
                let skip = driver.ask_bool(
                    "Skip bad slices?",
                    "Keep going when a slice does not fit the estimator's columns",
                    false,
                )?;

                let policy = if skip {
                    ErrorPolicy::Skip
                } else {
                    ErrorPolicy::Abort
                };
                let mut m = Map::new();
                m.insert("dataset".into(), serde_json::to_value(dataset)?);
                m.insert("estimator".into(), serde_json::to_value(estimator)?);
                m.insert("error_policy".into(), serde_json::to_value(policy)?);
                Ok(Some(m))
            }
        }
    }

    fn from_parts(kind: Self::Kind, params: Value) -> anyhow::Result<Self> {
        match kind {
            TaskKind::OnlineAggregation => {
                let p: OnlineAggregationParams = serde_json::from_value(params)?;
                Ok(TaskChoice::OnlineAggregation(p))
            }
        }
    }
}
