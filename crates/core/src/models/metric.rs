use serde::{Deserialize, Serialize};

/// Direction indicator shown next to a metric card's change figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

/// A top-line metric card. Display-only: `value` is already formatted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub label: String,

    pub value: String,

    /// Change in percent versus the previous period.
    pub change: f64,

    pub trend: Trend,
}

impl Metric {
    pub fn new(label: impl Into<String>, value: impl Into<String>, change: f64, trend: Trend) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            change,
            trend,
        }
    }
}
