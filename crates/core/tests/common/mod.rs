// ═══════════════════════════════════════════════════════════════════
// Shared test helpers — mock campaign API, mock insight feed, fixtures
// ═══════════════════════════════════════════════════════════════════

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::{mpsc, Notify};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::Stream;

use campaign_dashboard_core::errors::CoreError;
use campaign_dashboard_core::models::campaign::{CampaignStatus, RemoteCampaign};
use campaign_dashboard_core::models::insight::{AggregateInsights, InsightSnapshot};
use campaign_dashboard_core::models::settings::Settings;
use campaign_dashboard_core::providers::traits::{CampaignApi, FeedEvent, FeedStream, InsightFeed};
use campaign_dashboard_core::DashboardClient;

// ── Fixtures ────────────────────────────────────────────────────────

pub fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

pub fn remote(id: &str, name: &str, status: CampaignStatus) -> RemoteCampaign {
    RemoteCampaign {
        id: id.to_string(),
        name: name.to_string(),
        brand_id: "brand_1".to_string(),
        status,
        budget: 10_000.0,
        daily_budget: 500.0,
        platforms: vec!["meta".to_string()],
        created_at: ts(2024, 1, 20),
    }
}

pub fn snapshot(id: &str, impressions: u64, clicks: u64, spend: f64) -> InsightSnapshot {
    InsightSnapshot {
        campaign_id: id.to_string(),
        timestamp: ts(2024, 2, 1),
        impressions,
        clicks,
        conversions: clicks / 10,
        spend,
        ctr: None,
        cpc: 0.5,
        conversion_rate: 10.0,
    }
}

pub fn snapshot_json(id: &str, impressions: u64, clicks: u64) -> String {
    serde_json::json!({
        "campaign_id": id,
        "timestamp": "2024-02-01T12:00:00Z",
        "impressions": impressions,
        "clicks": clicks,
        "conversions": 3,
        "spend": 12.5,
        "ctr": 2.0,
        "cpc": 0.4,
        "conversion_rate": 1.5
    })
    .to_string()
}

pub fn aggregate() -> AggregateInsights {
    AggregateInsights {
        timestamp: ts(2024, 2, 1),
        total_campaigns: 12,
        active_campaigns: 7,
        paused_campaigns: 3,
        completed_campaigns: 2,
        total_impressions: 1_234_567,
        total_clicks: 45_678,
        total_conversions: 1_234,
        total_spend: 45_231.891,
        avg_ctr: 3.7,
        avg_cpc: 0.99,
        avg_conversion_rate: 2.7,
    }
}

pub fn client(api: Arc<MockApi>, feed: Arc<MockFeed>) -> DashboardClient {
    DashboardClient::with_providers(Settings::default(), api, feed)
}

/// Poll `condition` until it holds, failing the test after one second.
pub async fn eventually<F: Fn() -> bool>(condition: F) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not met within 1s");
}

// ═══════════════════════════════════════════════════════════════════
// Mock campaign API
// ═══════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct MockApi {
    campaigns: Vec<RemoteCampaign>,
    insights: HashMap<String, InsightSnapshot>,
    failing_insights: HashSet<String>,
    missing_campaigns: HashSet<String>,
    aggregate: Option<AggregateInsights>,
    fail_list: AtomicBool,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    insight_calls: AtomicUsize,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_campaign(mut self, raw: RemoteCampaign) -> Self {
        self.campaigns.push(raw);
        self
    }

    pub fn with_insights(mut self, snapshot: InsightSnapshot) -> Self {
        self.insights.insert(snapshot.campaign_id.clone(), snapshot);
        self
    }

    pub fn with_failing_insights(mut self, campaign_id: &str) -> Self {
        self.failing_insights.insert(campaign_id.to_string());
        self
    }

    pub fn with_missing_campaign(mut self, campaign_id: &str) -> Self {
        self.missing_campaigns.insert(campaign_id.to_string());
        self
    }

    pub fn with_aggregate(mut self, aggregate: AggregateInsights) -> Self {
        self.aggregate = Some(aggregate);
        self
    }

    pub fn failing_list(self) -> Self {
        self.fail_list.store(true, Ordering::SeqCst);
        self
    }

    pub fn set_fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    /// Hold `get_campaign(campaign_id)` until the returned gate is notified.
    pub fn gate(&self, campaign_id: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(campaign_id.to_string(), Arc::clone(&gate));
        gate
    }

    pub fn insight_calls(&self) -> usize {
        self.insight_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CampaignApi for MockApi {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn list_campaigns(&self) -> Result<Vec<RemoteCampaign>, CoreError> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(CoreError::FetchFailure {
                resource: "campaign list".into(),
                message: "server responded with HTTP 500 Internal Server Error".into(),
            });
        }
        Ok(self.campaigns.clone())
    }

    async fn get_campaign(&self, campaign_id: &str) -> Result<RemoteCampaign, CoreError> {
        let gate = self.gates.lock().unwrap().get(campaign_id).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.missing_campaigns.contains(campaign_id) {
            return Err(CoreError::FetchFailure {
                resource: format!("campaign {campaign_id}"),
                message: "server responded with HTTP 404 Not Found".into(),
            });
        }
        self.campaigns
            .iter()
            .find(|c| c.id == campaign_id)
            .cloned()
            .ok_or_else(|| CoreError::Network(format!("connection reset fetching {campaign_id}")))
    }

    async fn get_insights(&self, campaign_id: &str) -> Result<InsightSnapshot, CoreError> {
        self.insight_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_insights.contains(campaign_id) {
            return Err(CoreError::FetchFailure {
                resource: format!("insights for campaign {campaign_id}"),
                message: "server responded with HTTP 503 Service Unavailable".into(),
            });
        }
        self.insights
            .get(campaign_id)
            .cloned()
            .ok_or_else(|| CoreError::Deserialization("missing insights".into()))
    }

    async fn get_aggregate_insights(&self) -> Result<AggregateInsights, CoreError> {
        self.aggregate
            .clone()
            .ok_or_else(|| CoreError::Network("aggregate endpoint unreachable".into()))
    }
}

// ═══════════════════════════════════════════════════════════════════
// Mock insight feed
// ═══════════════════════════════════════════════════════════════════

/// Feed whose streams are driven by the test through `send`.
/// Counts connections and how many streams have been dropped (closed).
#[derive(Default)]
pub struct MockFeed {
    senders: Mutex<HashMap<String, mpsc::UnboundedSender<FeedEvent>>>,
    connected: Mutex<Vec<String>>,
    drops: Arc<AtomicUsize>,
    fail_connect: bool,
}

impl MockFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_connect: true,
            ..Self::default()
        }
    }

    /// Push an event to the open stream of `campaign_id`.
    /// Returns false when no stream is open (or it was closed).
    pub fn send(&self, campaign_id: &str, event: FeedEvent) -> bool {
        self.senders
            .lock()
            .unwrap()
            .get(campaign_id)
            .is_some_and(|tx| tx.send(event).is_ok())
    }

    pub fn connects(&self) -> usize {
        self.connected.lock().unwrap().len()
    }

    pub fn connected_ids(&self) -> Vec<String> {
        self.connected.lock().unwrap().clone()
    }

    pub fn drops(&self) -> usize {
        self.drops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InsightFeed for MockFeed {
    fn name(&self) -> &str {
        "MockFeed"
    }

    async fn connect(&self, campaign_id: &str) -> Result<FeedStream, CoreError> {
        if self.fail_connect {
            return Err(CoreError::Network("connection refused".into()));
        }
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders
            .lock()
            .unwrap()
            .insert(campaign_id.to_string(), tx);
        self.connected.lock().unwrap().push(campaign_id.to_string());
        Ok(Box::pin(TrackedStream {
            inner: UnboundedReceiverStream::new(rx),
            drops: Arc::clone(&self.drops),
        }))
    }
}

struct TrackedStream {
    inner: UnboundedReceiverStream<FeedEvent>,
    drops: Arc<AtomicUsize>,
}

impl Stream for TrackedStream {
    type Item = FeedEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<FeedEvent>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

impl Drop for TrackedStream {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}
