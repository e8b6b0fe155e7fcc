use chrono::Days;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use crate::errors::CoreError;
use crate::models::campaign::{Campaign, RemoteCampaign};
use crate::models::insight::{derived_ctr, InsightSnapshot};
use crate::providers::traits::CampaignApi;

/// Length of a campaign's display window. The backend has no end-date field,
/// so every campaign is shown as running this many calendar days from creation.
/// Placeholder convention, not a business rule.
pub const CAMPAIGN_WINDOW_DAYS: u64 = 30;

/// Fetches campaigns and enriches them with insight snapshots.
///
/// Campaign records are required: failing to get one fails the call.
/// Insight snapshots are best-effort: a failed fetch leaves that campaign's
/// metrics at zero and is only logged.
#[derive(Clone)]
pub struct CampaignService {
    api: Arc<dyn CampaignApi>,
}

impl CampaignService {
    pub fn new(api: Arc<dyn CampaignApi>) -> Self {
        Self { api }
    }

    /// Fetch every campaign with its insights.
    ///
    /// Insight fetches run concurrently and are all awaited before returning.
    /// The result keeps the order of the campaign collection.
    pub async fn fetch_campaign_list(&self) -> Result<Vec<Campaign>, CoreError> {
        debug!(backend = self.api.name(), "fetching campaign list");
        let remote = self
            .api
            .list_campaigns()
            .await
            .map_err(|e| required("campaign list", e))?;

        let mut tasks = JoinSet::new();
        for (index, raw) in remote.iter().enumerate() {
            let api = Arc::clone(&self.api);
            let campaign_id = raw.id.clone();
            tasks.spawn(async move {
                let result = api.get_insights(&campaign_id).await;
                (index, campaign_id, result)
            });
        }

        let mut snapshots: Vec<Option<InsightSnapshot>> = vec![None; remote.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, _, Ok(snapshot))) => snapshots[index] = Some(snapshot),
                Ok((_, campaign_id, Err(e))) => {
                    let failure = enrichment(&campaign_id, e);
                    warn!(%campaign_id, error = %failure, "using zeroed metrics");
                }
                Err(e) => warn!(error = %e, "insight fetch task did not complete"),
            }
        }

        Ok(remote
            .iter()
            .zip(snapshots.iter())
            .map(|(raw, snapshot)| Self::map_remote_campaign(raw, snapshot.as_ref()))
            .collect())
    }

    /// Fetch one campaign record and its insights concurrently.
    pub async fn fetch_campaign_detail(&self, campaign_id: &str) -> Result<Campaign, CoreError> {
        debug!(%campaign_id, "fetching campaign detail");
        let (record, insights) = tokio::join!(
            self.api.get_campaign(campaign_id),
            self.api.get_insights(campaign_id),
        );

        let raw = record.map_err(|e| {
            let failure = required(&format!("campaign {campaign_id}"), e);
            error!(%campaign_id, error = %failure, "campaign record unavailable");
            failure
        })?;

        let snapshot = match insights {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                let failure = enrichment(campaign_id, e);
                warn!(%campaign_id, error = %failure, "using zeroed metrics");
                None
            }
        };

        Ok(Self::map_remote_campaign(&raw, snapshot.as_ref()))
    }

    /// Fetch the insight snapshot of one campaign.
    /// Failures come back as `CoreError::EnrichmentFailure`.
    pub async fn fetch_campaign_insights(
        &self,
        campaign_id: &str,
    ) -> Result<InsightSnapshot, CoreError> {
        self.api
            .get_insights(campaign_id)
            .await
            .map_err(|e| enrichment(campaign_id, e))
    }

    /// Turn a remote record plus an optional snapshot into a display campaign.
    ///
    /// Metrics default to 0 without a snapshot. CTR is the server's value when
    /// present, else derived from clicks and impressions.
    pub fn map_remote_campaign(raw: &RemoteCampaign, snapshot: Option<&InsightSnapshot>) -> Campaign {
        let impressions = snapshot.map_or(0, |s| s.impressions);
        let clicks = snapshot.map_or(0, |s| s.clicks);
        let spend = snapshot.map_or(0.0, |s| s.spend);
        let ctr = snapshot
            .and_then(|s| s.ctr)
            .unwrap_or_else(|| derived_ctr(clicks, impressions));

        let start_date = raw.created_at;
        let end_date = start_date
            .checked_add_days(Days::new(CAMPAIGN_WINDOW_DAYS))
            .unwrap_or(start_date);

        Campaign {
            id: raw.id.clone(),
            name: raw.name.clone(),
            status: raw.status,
            impressions,
            clicks,
            ctr,
            spend,
            start_date,
            end_date,
        }
    }
}

/// Normalize any error on a required resource into `FetchFailure`.
fn required(resource: &str, error: CoreError) -> CoreError {
    match error {
        CoreError::FetchFailure { .. } => error,
        other => CoreError::fetch_failure(resource, other),
    }
}

fn enrichment(campaign_id: &str, error: CoreError) -> CoreError {
    match error {
        CoreError::EnrichmentFailure { .. } => error,
        other => CoreError::EnrichmentFailure {
            campaign_id: campaign_id.to_string(),
            message: other.to_string(),
        },
    }
}
