use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio_stream::StreamExt;
use tracing::{debug, error, warn};

use crate::errors::CoreError;
use crate::models::insight::{AggregateInsights, InsightSnapshot};
use crate::models::metric::{Metric, Trend};
use crate::providers::traits::{CampaignApi, FeedEvent, InsightFeed};
use crate::services::format::{format_count, format_percent, format_usd};
use crate::services::subscription::InsightSubscription;

/// Period-over-period changes shown on the spend/volume/rate cards.
/// The backend has no history endpoint, so these are fixed placeholders.
const PLACEHOLDER_CHANGES: [(f64, Trend); 7] = [
    (12.5, Trend::Up),   // Total Spend
    (8.2, Trend::Up),    // Total Impressions
    (5.4, Trend::Up),    // Total Clicks
    (3.1, Trend::Up),    // Total Conversions
    (-2.1, Trend::Down), // Avg. CTR
    (-1.5, Trend::Down), // Avg. CPC
    (2.3, Trend::Up),    // Avg. Conversion Rate
];

/// Aggregate metric cards and live per-campaign insight streams.
#[derive(Clone)]
pub struct InsightService {
    api: Arc<dyn CampaignApi>,
    feed: Arc<dyn InsightFeed>,
}

impl InsightService {
    pub fn new(api: Arc<dyn CampaignApi>, feed: Arc<dyn InsightFeed>) -> Self {
        Self { api, feed }
    }

    /// Fetch the aggregate summary as metric cards.
    ///
    /// Never fails: any error yields an empty list, meaning "no metrics
    /// available" (as opposed to a list of zero-valued cards).
    pub async fn fetch_aggregate_insights(&self) -> Vec<Metric> {
        match self.api.get_aggregate_insights().await {
            Ok(aggregate) => Self::metrics_from_aggregate(&aggregate),
            Err(e) => {
                error!(error = %e, "aggregate insights unavailable");
                Vec::new()
            }
        }
    }

    /// Build the eleven top-line cards, in display order.
    pub fn metrics_from_aggregate(a: &AggregateInsights) -> Vec<Metric> {
        let mut metrics = vec![
            Metric::new("Total Campaigns", a.total_campaigns.to_string(), 0.0, Trend::Neutral),
            Metric::new("Active Campaigns", a.active_campaigns.to_string(), 0.0, Trend::Neutral),
            Metric::new("Paused Campaigns", a.paused_campaigns.to_string(), 0.0, Trend::Neutral),
            Metric::new("Completed Campaigns", a.completed_campaigns.to_string(), 0.0, Trend::Neutral),
        ];

        let values = [
            ("Total Spend", format_usd(a.total_spend)),
            ("Total Impressions", format_count(a.total_impressions)),
            ("Total Clicks", format_count(a.total_clicks)),
            ("Total Conversions", format_count(a.total_conversions)),
            ("Avg. CTR", format_percent(a.avg_ctr)),
            ("Avg. CPC", format_usd(a.avg_cpc)),
            ("Avg. Conversion Rate", format_percent(a.avg_conversion_rate)),
        ];
        for ((label, value), (change, trend)) in values.into_iter().zip(PLACEHOLDER_CHANGES) {
            metrics.push(Metric::new(label, value, change, trend));
        }

        metrics
    }

    /// Open the live insight stream for one campaign.
    ///
    /// Each parsed snapshot goes to `on_snapshot`. Unparsable messages are
    /// logged and dropped without calling either callback. Every transport
    /// error calls `on_error` once; the feed may keep delivering afterwards.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open_insight_stream<S, E>(
        &self,
        campaign_id: &str,
        on_snapshot: S,
        on_error: E,
    ) -> InsightSubscription
    where
        S: Fn(InsightSnapshot) + Send + Sync + 'static,
        E: Fn(CoreError) + Send + Sync + 'static,
    {
        let closed = Arc::new(AtomicBool::new(false));
        let feed = Arc::clone(&self.feed);
        let id = campaign_id.to_string();
        let flag = Arc::clone(&closed);

        let task = tokio::spawn(async move {
            let mut stream = match feed.connect(&id).await {
                Ok(stream) => stream,
                Err(e) => {
                    error!(campaign_id = %id, error = %e, "live stream could not be opened");
                    if !flag.load(Ordering::Acquire) {
                        on_error(transport_error(&id, e.to_string()));
                    }
                    return;
                }
            };
            debug!(campaign_id = %id, feed = feed.name(), "live stream opened");

            while let Some(event) = stream.next().await {
                if flag.load(Ordering::Acquire) {
                    break;
                }
                match event {
                    FeedEvent::Message(payload) => match Self::parse_snapshot(&payload) {
                        Ok(snapshot) => on_snapshot(snapshot),
                        Err(e) => warn!(campaign_id = %id, error = %e, "dropping stream message"),
                    },
                    FeedEvent::TransportError(message) => {
                        error!(campaign_id = %id, %message, "live stream error");
                        on_error(transport_error(&id, message));
                    }
                }
            }
        });

        InsightSubscription::new(campaign_id.to_string(), closed, task)
    }

    /// Parse one stream payload as an insight snapshot.
    pub fn parse_snapshot(payload: &str) -> Result<InsightSnapshot, CoreError> {
        serde_json::from_str(payload).map_err(|e| CoreError::MalformedMessage(e.to_string()))
    }
}

fn transport_error(campaign_id: &str, message: String) -> CoreError {
    CoreError::StreamTransport {
        campaign_id: campaign_id.to_string(),
        message,
    }
}
