pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod telemetry;
pub mod views;

use std::sync::Arc;

use errors::CoreError;
use models::{
    campaign::{Campaign, RemoteCampaign},
    chart::{ChartDataPoint, ChartSummary},
    insight::InsightSnapshot,
    metric::Metric,
    settings::Settings,
};
use providers::{
    http::HttpCampaignApi,
    sse::SseInsightFeed,
    traits::{CampaignApi, InsightFeed},
};
use services::{
    campaign_service::CampaignService, chart_service::ChartService,
    insight_service::InsightService, subscription::InsightSubscription,
};
use views::{
    dashboard::DashboardView, detail::CampaignDetailView, drawer::CampaignDrawer,
};

/// Main entry point for the campaign dashboard core library.
///
/// Holds the settings and every service the views need. Cheap to clone:
/// clones share the same backends. Views take a clone at construction.
#[derive(Clone)]
#[must_use]
pub struct DashboardClient {
    settings: Settings,
    campaign_service: CampaignService,
    insight_service: InsightService,
    chart_service: ChartService,
}

impl std::fmt::Debug for DashboardClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardClient")
            .field("settings", &self.settings)
            .finish()
    }
}

impl DashboardClient {
    /// Client talking HTTP/SSE to `settings.base_url`.
    pub fn new(settings: Settings) -> Result<Self, CoreError> {
        settings.validate()?;
        let api = HttpCampaignApi::new(&settings)?;
        let feed = SseInsightFeed::new(&settings)?;
        Ok(Self::with_providers(settings, Arc::new(api), Arc::new(feed)))
    }

    /// Default settings with the base URL from `CAMPAIGN_API_BASE_URL`.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::new(Settings::from_env())
    }

    /// Client over caller-supplied backends (offline hosts, tests).
    pub fn with_providers(
        settings: Settings,
        api: Arc<dyn CampaignApi>,
        feed: Arc<dyn InsightFeed>,
    ) -> Self {
        Self {
            settings,
            campaign_service: CampaignService::new(Arc::clone(&api)),
            insight_service: InsightService::new(api, feed),
            chart_service: ChartService::new(),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ── Campaigns ───────────────────────────────────────────────────

    /// All campaigns with their insights. Fails only if the list itself fails.
    pub async fn fetch_campaign_list(&self) -> Result<Vec<Campaign>, CoreError> {
        self.campaign_service.fetch_campaign_list().await
    }

    /// One campaign with its insights. Fails only if the record fails.
    pub async fn fetch_campaign_detail(&self, campaign_id: &str) -> Result<Campaign, CoreError> {
        self.campaign_service.fetch_campaign_detail(campaign_id).await
    }

    /// Insight snapshot of one campaign.
    pub async fn fetch_campaign_insights(
        &self,
        campaign_id: &str,
    ) -> Result<InsightSnapshot, CoreError> {
        self.campaign_service.fetch_campaign_insights(campaign_id).await
    }

    /// Map a remote record (plus optional snapshot) to a display campaign.
    pub fn map_remote_campaign(raw: &RemoteCampaign, snapshot: Option<&InsightSnapshot>) -> Campaign {
        CampaignService::map_remote_campaign(raw, snapshot)
    }

    // ── Insights ────────────────────────────────────────────────────

    /// Top-line metric cards; empty when the summary is unavailable.
    pub async fn fetch_aggregate_insights(&self) -> Vec<Metric> {
        self.insight_service.fetch_aggregate_insights().await
    }

    /// Open a live insight stream for one campaign. See
    /// `InsightService::open_insight_stream`.
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
        self.insight_service
            .open_insight_stream(campaign_id, on_snapshot, on_error)
    }

    // ── Charts ──────────────────────────────────────────────────────

    /// Placeholder trend series for the last seven days.
    #[must_use]
    pub fn generate_chart_data(&self) -> Vec<ChartDataPoint> {
        self.chart_service.generate_chart_data()
    }

    #[must_use]
    pub fn summarize_chart(&self, points: &[ChartDataPoint]) -> ChartSummary {
        self.chart_service.summarize(points)
    }

    // ── Views ───────────────────────────────────────────────────────

    pub fn dashboard_view(&self) -> DashboardView {
        DashboardView::new(self.clone())
    }

    pub fn campaign_detail_view(&self) -> CampaignDetailView {
        CampaignDetailView::new(self.clone())
    }

    pub fn campaign_drawer(&self) -> CampaignDrawer {
        CampaignDrawer::new(self.clone())
    }
}
