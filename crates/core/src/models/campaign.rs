use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle status of a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Active,
    Paused,
    Completed,
}

impl CampaignStatus {
    /// Wire / sort representation (`"active"`, `"paused"`, `"completed"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Active => "active",
            CampaignStatus::Paused => "paused",
            CampaignStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CampaignStatus::Active => write!(f, "Active"),
            CampaignStatus::Paused => write!(f, "Paused"),
            CampaignStatus::Completed => write!(f, "Completed"),
        }
    }
}

/// A campaign record exactly as the remote service returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteCampaign {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub brand_id: String,

    pub status: CampaignStatus,

    #[serde(default)]
    pub budget: f64,

    #[serde(default)]
    pub daily_budget: f64,

    #[serde(default)]
    pub platforms: Vec<String>,

    /// Accepts an RFC 3339 timestamp or a bare `YYYY-MM-DD` date.
    #[serde(deserialize_with = "deserialize_created_at")]
    pub created_at: DateTime<Utc>,
}

/// A campaign as the dashboard displays it: identity and status from the
/// campaign record, cumulative metrics from its latest insight snapshot.
///
/// Built by `CampaignService::map_remote_campaign`; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,

    pub name: String,

    pub status: CampaignStatus,

    pub impressions: u64,

    pub clicks: u64,

    /// Click-through rate in percent (2.15 means 2.15%).
    pub ctr: f64,

    pub spend: f64,

    pub start_date: DateTime<Utc>,

    /// Placeholder window end, see `CAMPAIGN_WINDOW_DAYS`.
    pub end_date: DateTime<Utc>,
}

// ── Response envelopes ──────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct CampaignListResponse {
    pub campaigns: Vec<RemoteCampaign>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SingleCampaignResponse {
    pub campaign: RemoteCampaign,
}

fn deserialize_created_at<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid created_at timestamp '{raw}'"))
    })
}

/// Parse an RFC 3339 timestamp, falling back to a plain date at midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
