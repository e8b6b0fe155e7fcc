use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::campaign::{CampaignListResponse, RemoteCampaign, SingleCampaignResponse};
use crate::models::insight::{
    AggregateInsights, AggregateInsightsResponse, InsightSnapshot, InsightsResponse,
};
use crate::models::settings::Settings;
use super::traits::CampaignApi;

/// REST client for the campaign service.
///
/// - `GET /campaigns` → `{ campaigns, total }`
/// - `GET /campaigns/{id}` → `{ campaign }`
/// - `GET /campaigns/{id}/insights` → `{ insights }`
/// - `GET /campaigns/insights` → `{ insights }` (aggregate)
///
/// Non-2xx responses become `CoreError::FetchFailure`; transport problems
/// become `CoreError::Network`.
pub struct HttpCampaignApi {
    client: Client,
    base_url: Url,
}

impl HttpCampaignApi {
    pub fn new(settings: &Settings) -> Result<Self, CoreError> {
        let base_url = parse_base_url(&settings.base_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());
        Ok(Self { client, base_url })
    }

    /// Build `base_url/segments...`, percent-encoding each segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, CoreError> {
        endpoint(&self.base_url, segments)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        resource: &str,
    ) -> Result<T, CoreError> {
        let url = self.endpoint(segments)?;
        debug!(%url, resource, "requesting");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::FetchFailure {
                resource: resource.to_string(),
                message: format!("server responded with HTTP {status}"),
            });
        }

        response.json::<T>().await.map_err(|e| {
            CoreError::Deserialization(format!("Failed to parse {resource} response: {e}"))
        })
    }
}

#[async_trait]
impl CampaignApi for HttpCampaignApi {
    fn name(&self) -> &str {
        "HTTP"
    }

    async fn list_campaigns(&self) -> Result<Vec<RemoteCampaign>, CoreError> {
        let resp: CampaignListResponse = self.get_json(&["campaigns"], "campaign list").await?;
        debug!(count = resp.campaigns.len(), total = resp.total, "campaign list received");
        Ok(resp.campaigns)
    }

    async fn get_campaign(&self, campaign_id: &str) -> Result<RemoteCampaign, CoreError> {
        let resource = format!("campaign {campaign_id}");
        let resp: SingleCampaignResponse = self
            .get_json(&["campaigns", campaign_id], &resource)
            .await?;
        Ok(resp.campaign)
    }

    async fn get_insights(&self, campaign_id: &str) -> Result<InsightSnapshot, CoreError> {
        let resource = format!("insights for campaign {campaign_id}");
        let resp: InsightsResponse = self
            .get_json(&["campaigns", campaign_id, "insights"], &resource)
            .await?;
        Ok(resp.insights)
    }

    async fn get_aggregate_insights(&self) -> Result<AggregateInsights, CoreError> {
        let resp: AggregateInsightsResponse = self
            .get_json(&["campaigns", "insights"], "aggregate insights")
            .await?;
        Ok(resp.insights)
    }
}

pub(crate) fn parse_base_url(raw: &str) -> Result<Url, CoreError> {
    let url = Url::parse(raw)
        .map_err(|e| CoreError::InvalidConfig(format!("base_url '{raw}' is not a valid URL: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(CoreError::InvalidConfig(format!(
            "base_url '{raw}' cannot be used as a base URL"
        )));
    }
    Ok(url)
}

pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, CoreError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| CoreError::InvalidConfig(format!("base_url '{base}' cannot carry a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
