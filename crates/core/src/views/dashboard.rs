use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

use crate::models::chart::{ChartDataPoint, ChartSummary};
use crate::models::metric::Metric;
use crate::DashboardClient;
use super::drawer::CampaignDrawer;
use super::state::{lock, ViewStatus};
use super::table::{CampaignTable, SortField, SortState};

/// Everything the dashboard screen renders.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub status: ViewStatus,
    /// Top-line cards; empty when aggregate insights were unavailable.
    pub metrics: Vec<Metric>,
    pub chart: Vec<ChartDataPoint>,
    pub chart_summary: ChartSummary,
    pub table: CampaignTable,
    generation: u64,
}

/// State container for the main dashboard: metric cards, trend chart,
/// campaign table and the campaign drawer.
#[derive(Clone)]
pub struct DashboardView {
    client: DashboardClient,
    state: Arc<Mutex<DashboardState>>,
    drawer: CampaignDrawer,
}

impl DashboardView {
    pub fn new(client: DashboardClient) -> Self {
        let table = CampaignTable::new(client.settings().page_size);
        let chart_summary = client.summarize_chart(&[]);
        let state = DashboardState {
            status: ViewStatus::Idle,
            metrics: Vec::new(),
            chart: Vec::new(),
            chart_summary,
            table,
            generation: 0,
        };
        Self {
            drawer: CampaignDrawer::new(client.clone()),
            client,
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn state(&self) -> DashboardState {
        lock(&self.state).clone()
    }

    pub fn status(&self) -> ViewStatus {
        lock(&self.state).status.clone()
    }

    /// Fetch campaigns and aggregate metrics concurrently.
    ///
    /// Fails only when the campaign list cannot be fetched; missing
    /// aggregate metrics just leave the cards empty.
    pub async fn load(&self) {
        let generation = {
            let mut state = lock(&self.state);
            state.generation += 1;
            state.status = ViewStatus::Loading;
            state.generation
        };

        let (campaigns, metrics) = tokio::join!(
            self.client.fetch_campaign_list(),
            self.client.fetch_aggregate_insights(),
        );

        let mut state = lock(&self.state);
        if state.generation != generation {
            debug!("discarding superseded dashboard load");
            return;
        }
        match campaigns {
            Ok(campaigns) => {
                info!(campaigns = campaigns.len(), metrics = metrics.len(), "dashboard loaded");
                let chart = self.client.generate_chart_data();
                state.chart_summary = self.client.summarize_chart(&chart);
                state.chart = chart;
                state.metrics = metrics;
                state.table.set_rows(campaigns);
                state.status = ViewStatus::Ready;
            }
            Err(e) => {
                error!(error = %e, "dashboard failed to load");
                state.status = ViewStatus::Failed(e.to_string());
            }
        }
    }

    /// Re-run the load after a failure.
    pub async fn retry(&self) {
        if self.status().is_failed() {
            self.load().await;
        }
    }

    /// Table header click.
    pub fn sort_by(&self, field: SortField) -> Option<SortState> {
        lock(&self.state).table.request_sort(field)
    }

    /// Pager click; clamped into the valid range.
    pub fn go_to_page(&self, page: usize) -> usize {
        lock(&self.state).table.go_to_page(page)
    }

    /// "View" on a table row: open the drawer for that campaign.
    pub async fn view_campaign(&self, campaign_id: &str) {
        self.drawer.open(campaign_id).await;
    }

    pub async fn close_drawer(&self) {
        self.drawer.close().await;
    }

    pub fn drawer(&self) -> &CampaignDrawer {
        &self.drawer
    }

    /// Leave the dashboard: close the drawer and its live stream.
    pub async fn leave(&self) {
        {
            let mut state = lock(&self.state);
            state.generation += 1;
            state.status = ViewStatus::Idle;
        }
        self.drawer.close().await;
    }
}
