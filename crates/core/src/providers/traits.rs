use std::pin::Pin;

use async_trait::async_trait;
use tokio_stream::Stream;

use crate::errors::CoreError;
use crate::models::campaign::RemoteCampaign;
use crate::models::insight::{AggregateInsights, InsightSnapshot};

/// Request/response access to the remote campaign service.
///
/// `HttpCampaignApi` is the production implementation. Tests and offline
/// hosts plug in their own, the services never see the transport.
#[async_trait]
pub trait CampaignApi: Send + Sync {
    /// Human-readable name of this backend (for logs/errors).
    fn name(&self) -> &str;

    /// `GET /campaigns`
    async fn list_campaigns(&self) -> Result<Vec<RemoteCampaign>, CoreError>;

    /// `GET /campaigns/{id}`
    async fn get_campaign(&self, campaign_id: &str) -> Result<RemoteCampaign, CoreError>;

    /// `GET /campaigns/{id}/insights`
    async fn get_insights(&self, campaign_id: &str) -> Result<InsightSnapshot, CoreError>;

    /// `GET /campaigns/insights`
    async fn get_aggregate_insights(&self) -> Result<AggregateInsights, CoreError>;
}

/// One raw event from a live insight feed.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// Payload of one pushed message, not yet parsed.
    Message(String),
    /// The underlying connection reported an error. The feed may keep going.
    TransportError(String),
}

/// Stream of feed events for one campaign. Dropping it releases the connection.
pub type FeedStream = Pin<Box<dyn Stream<Item = FeedEvent> + Send>>;

/// Server-push source of insight snapshots, scoped to one campaign.
#[async_trait]
pub trait InsightFeed: Send + Sync {
    fn name(&self) -> &str;

    /// Open the feed for `campaign_id`.
    async fn connect(&self, campaign_id: &str) -> Result<FeedStream, CoreError>;
}
