use crate::ui::types::choices::UIChoice;
use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

fn default_mean_col() -> String {
    "item_price".into()
}
fn default_groupby_col() -> String {
    "shop_id".into()
}
fn default_filter_col() -> String {
    "shop_id".into()
}
fn default_filter_value() -> String {
    "1".into()
}
fn default_sum_col() -> String {
    "item_cnt_day".into()
}
fn default_count_col() -> String {
    "item_id".into()
}
fn default_distinct_col() -> String {
    "item_id".into()
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AvgParams {
    #[serde(default = "default_mean_col")]
    #[schemars(
        title = "Mean column",
        description = "Numeric column to average",
        default = "default_mean_col"
    )]
    pub mean_col: String,
}
impl Default for AvgParams {
    fn default() -> Self {
        Self {
            mean_col: default_mean_col(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct FilterAvgParams {
    #[serde(default = "default_filter_col")]
    #[schemars(
        title = "Filter column",
        description = "Column compared against the filter value",
        default = "default_filter_col"
    )]
    pub filter_col: String,

    #[serde(default = "default_filter_value")]
    #[schemars(
        title = "Filter value",
        description = "Rows equal to this value are kept. Quote it to force a text match",
        default = "default_filter_value"
    )]
    pub filter_value: String,

    #[serde(default = "default_mean_col")]
    #[schemars(
        title = "Mean column",
        description = "Numeric column to average over matching rows",
        default = "default_mean_col"
    )]
    pub mean_col: String,
}
impl Default for FilterAvgParams {
    fn default() -> Self {
        Self {
            filter_col: default_filter_col(),
            filter_value: default_filter_value(),
            mean_col: default_mean_col(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct GroupByAvgParams {
    #[serde(default = "default_groupby_col")]
    #[schemars(
        title = "Group-by column",
        description = "Column whose values define the groups",
        default = "default_groupby_col"
    )]
    pub groupby_col: String,

    #[serde(default = "default_mean_col")]
    #[schemars(
        title = "Mean column",
        description = "Numeric column to average per group",
        default = "default_mean_col"
    )]
    pub mean_col: String,
}
impl Default for GroupByAvgParams {
    fn default() -> Self {
        Self {
            groupby_col: default_groupby_col(),
            mean_col: default_mean_col(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct GroupBySumParams {
    #[serde(default = "default_groupby_col")]
    #[schemars(
        title = "Group-by column",
        description = "Column whose values define the groups",
        default = "default_groupby_col"
    )]
    pub groupby_col: String,

    #[serde(default = "default_sum_col")]
    #[schemars(
        title = "Sum column",
        description = "Numeric column to total per group",
        default = "default_sum_col"
    )]
    pub sum_col: String,
}
impl Default for GroupBySumParams {
    fn default() -> Self {
        Self {
            groupby_col: default_groupby_col(),
            sum_col: default_sum_col(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct GroupByCountParams {
    #[serde(default = "default_groupby_col")]
    #[schemars(
        title = "Group-by column",
        description = "Column whose values define the groups",
        default = "default_groupby_col"
    )]
    pub groupby_col: String,

    #[serde(default = "default_count_col")]
    #[schemars(
        title = "Count column",
        description = "Non-null cells of this column are counted",
        default = "default_count_col"
    )]
    pub count_col: String,
}
impl Default for GroupByCountParams {
    fn default() -> Self {
        Self {
            groupby_col: default_groupby_col(),
            count_col: default_count_col(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct FilterDistinctParams {
    #[serde(default = "default_filter_col")]
    #[schemars(
        title = "Filter column",
        description = "Column compared against the filter value",
        default = "default_filter_col"
    )]
    pub filter_col: String,

    #[serde(default = "default_filter_value")]
    #[schemars(
        title = "Filter value",
        description = "Rows equal to this value are kept. Quote it to force a text match",
        default = "default_filter_value"
    )]
    pub filter_value: String,

    #[serde(default = "default_distinct_col")]
    #[schemars(
        title = "Distinct column",
        description = "Column whose distinct values are counted",
        default = "default_distinct_col"
    )]
    pub distinct_col: String,

    #[serde(default)]
    #[schemars(
        title = "Sketch precision",
        description = "Use a HyperLogLog with 2^p registers (4-16); empty = exact set",
        range(min = 4, max = 16)
    )]
    pub sketch_precision: Option<u8>,
}
impl Default for FilterDistinctParams {
    fn default() -> Self {
        Self {
            filter_col: default_filter_col(),
            filter_value: default_filter_value(),
            distinct_col: default_distinct_col(),
            sketch_precision: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants, PartialEq)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(EstimatorKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum EstimatorChoice {
    #[strum_discriminants(strum(
        message = "Average",
        detailed_message = "Running mean of one numeric column."
    ))]
    Avg(AvgParams),

    #[strum_discriminants(strum(
        message = "Filtered Average",
        detailed_message = "Running mean over rows matching an equality filter."
    ))]
    FilterAvg(FilterAvgParams),

    #[strum_discriminants(strum(
        message = "Grouped Average",
        detailed_message = "Running mean per group."
    ))]
    GroupByAvg(GroupByAvgParams),

    #[strum_discriminants(strum(
        message = "Grouped Sum",
        detailed_message = "Per-group total scaled to the full dataset."
    ))]
    GroupBySum(GroupBySumParams),

    #[strum_discriminants(strum(
        message = "Grouped Count",
        detailed_message = "Per-group non-null count scaled to the full dataset."
    ))]
    GroupByCount(GroupByCountParams),

    #[strum_discriminants(strum(
        message = "Filtered Distinct Count",
        detailed_message = "Distinct values among matching rows, scaled linearly (biased)."
    ))]
    FilterDistinct(FilterDistinctParams),
}

impl Default for EstimatorChoice {
    fn default() -> Self {
        Self::Avg(AvgParams::default())
    }
}

impl UIChoice for EstimatorChoice {
    type Kind = EstimatorKind;

    fn schema() -> Schema {
        schema_for!(EstimatorChoice)
    }

    fn prompt_label() -> &'static str {
        "Choose an estimator:"
    }

    fn default_params(kind: Self::Kind) -> Value {
        let v = match kind {
            EstimatorKind::Avg => serde_json::to_value(AvgParams::default()),
            EstimatorKind::FilterAvg => serde_json::to_value(FilterAvgParams::default()),
            EstimatorKind::GroupByAvg => serde_json::to_value(GroupByAvgParams::default()),
            EstimatorKind::GroupBySum => serde_json::to_value(GroupBySumParams::default()),
            EstimatorKind::GroupByCount => serde_json::to_value(GroupByCountParams::default()),
            EstimatorKind::FilterDistinct => {
                serde_json::to_value(FilterDistinctParams::default())
            }
        };
        v.unwrap_or_default()
    }
}
