use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::campaign::Campaign;

/// One point-in-time measurement of a campaign's metrics.
///
/// A newer snapshot supersedes the previous one entirely; fields are never
/// merged across snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightSnapshot {
    #[serde(default)]
    pub campaign_id: String,

    /// Receipt time when the backend omits it.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,

    #[serde(default)]
    pub impressions: u64,

    #[serde(default)]
    pub clicks: u64,

    #[serde(default)]
    pub conversions: u64,

    #[serde(default)]
    pub spend: f64,

    /// Server-computed CTR in percent, when the backend sends one.
    #[serde(default)]
    pub ctr: Option<f64>,

    #[serde(default)]
    pub cpc: f64,

    #[serde(default)]
    pub conversion_rate: f64,
}

impl InsightSnapshot {
    /// Seed a snapshot from an already-mapped campaign, so a freshly loaded
    /// view has metrics to show before the first live push arrives.
    pub fn seeded_from(campaign: &Campaign) -> Self {
        Self {
            campaign_id: campaign.id.clone(),
            timestamp: Utc::now(),
            impressions: campaign.impressions,
            clicks: campaign.clicks,
            conversions: 0,
            spend: campaign.spend,
            ctr: Some(campaign.ctr),
            cpc: 0.0,
            conversion_rate: 0.0,
        }
    }

    /// The server CTR if present, otherwise `clicks / impressions * 100`
    /// (0 when there are no impressions).
    #[must_use]
    pub fn effective_ctr(&self) -> f64 {
        self.ctr.unwrap_or_else(|| derived_ctr(self.clicks, self.impressions))
    }
}

/// Backend-computed summary across all campaigns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateInsights {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub total_campaigns: u64,
    #[serde(default)]
    pub active_campaigns: u64,
    #[serde(default)]
    pub paused_campaigns: u64,
    #[serde(default)]
    pub completed_campaigns: u64,
    #[serde(default)]
    pub total_impressions: u64,
    #[serde(default)]
    pub total_clicks: u64,
    #[serde(default)]
    pub total_conversions: u64,
    #[serde(default)]
    pub total_spend: f64,
    #[serde(default)]
    pub avg_ctr: f64,
    #[serde(default)]
    pub avg_cpc: f64,
    #[serde(default)]
    pub avg_conversion_rate: f64,
}

// ── Response envelopes ──────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct InsightsResponse {
    pub insights: InsightSnapshot,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AggregateInsightsResponse {
    pub insights: AggregateInsights,
}

/// CTR in percent, 0 when there were no impressions.
#[must_use]
pub fn derived_ctr(clicks: u64, impressions: u64) -> f64 {
    if impressions > 0 {
        clicks as f64 / impressions as f64 * 100.0
    } else {
        0.0
    }
}
