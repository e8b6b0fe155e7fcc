use serde::{Deserialize, Serialize};

/// A single day on the performance trend chart.
///
/// The core generates these, the frontend just renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataPoint {
    /// Short day label, e.g. "Jan 5"
    pub date: String,

    pub impressions: u64,

    pub clicks: u64,

    pub conversions: u64,
}

/// Totals shown underneath the trend chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSummary {
    pub total_impressions: u64,

    pub total_clicks: u64,

    pub total_conversions: u64,

    /// Day with the most impressions (first one wins on ties)
    pub peak_day: Option<ChartDataPoint>,
}
