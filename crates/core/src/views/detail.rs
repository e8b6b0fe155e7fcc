use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, error};

use crate::models::campaign::Campaign;
use crate::models::insight::InsightSnapshot;
use crate::services::subscription::InsightSubscription;
use crate::DashboardClient;
use super::state::{lock, LiveMetrics, ViewStatus};

/// Everything a campaign detail screen renders.
#[derive(Debug, Clone)]
pub struct DetailState {
    /// Campaign currently shown (or being loaded); `None` when idle.
    pub campaign_id: Option<String>,
    pub status: ViewStatus,
    pub campaign: Option<Campaign>,
    pub live: LiveMetrics,
    generation: u64,
}

impl DetailState {
    fn new(flash: Duration) -> Self {
        Self {
            campaign_id: None,
            status: ViewStatus::Idle,
            campaign: None,
            live: LiveMetrics::new(flash),
            generation: 0,
        }
    }
}

/// State container for one campaign's detail view.
///
/// `load` fetches the campaign and, once ready, keeps a live insight stream
/// open for it. Switching campaigns or leaving closes that stream before
/// anything new is opened. Results of superseded loads, and snapshots from
/// superseded streams, are discarded.
#[derive(Clone)]
pub struct CampaignDetailView {
    client: DashboardClient,
    state: Arc<Mutex<DetailState>>,
    subscription: Arc<tokio::sync::Mutex<Option<InsightSubscription>>>,
}

impl CampaignDetailView {
    pub fn new(client: DashboardClient) -> Self {
        let flash = Duration::from_millis(client.settings().live_flash_ms);
        Self {
            client,
            state: Arc::new(Mutex::new(DetailState::new(flash))),
            subscription: Arc::new(tokio::sync::Mutex::new(None)),
        }
    }

    /// Copy of the current view state.
    pub fn state(&self) -> DetailState {
        lock(&self.state).clone()
    }

    pub fn status(&self) -> ViewStatus {
        lock(&self.state).status.clone()
    }

    /// Show `campaign_id`: fetch it, then subscribe to its live insights.
    pub async fn load(&self, campaign_id: &str) {
        let generation = {
            let mut state = lock(&self.state);
            state.generation += 1;
            state.campaign_id = Some(campaign_id.to_string());
            state.status = ViewStatus::Loading;
            state.campaign = None;
            state.live.clear();
            state.generation
        };

        self.close_subscription().await;

        let result = self.client.fetch_campaign_detail(campaign_id).await;

        let ready = {
            let mut state = lock(&self.state);
            if state.generation != generation {
                debug!(%campaign_id, "discarding superseded campaign detail");
                return;
            }
            match result {
                Ok(campaign) => {
                    state.live.seed(InsightSnapshot::seeded_from(&campaign));
                    state.campaign = Some(campaign);
                    state.status = ViewStatus::Ready;
                    true
                }
                Err(e) => {
                    error!(%campaign_id, error = %e, "campaign detail failed to load");
                    state.status = ViewStatus::Failed(e.to_string());
                    false
                }
            }
        };

        if ready {
            self.subscribe(campaign_id, generation).await;
        }
    }

    /// Re-run the last load after a failure.
    pub async fn retry(&self) {
        let campaign_id = {
            let state = lock(&self.state);
            match (&state.status, &state.campaign_id) {
                (ViewStatus::Failed(_), Some(id)) => Some(id.clone()),
                _ => None,
            }
        };
        if let Some(campaign_id) = campaign_id {
            self.load(&campaign_id).await;
        }
    }

    /// Leave the view: close the live stream and go back to idle.
    pub async fn leave(&self) {
        {
            let mut state = lock(&self.state);
            state.generation += 1;
            state.campaign_id = None;
            state.status = ViewStatus::Idle;
            state.campaign = None;
            state.live.clear();
        }
        self.close_subscription().await;
    }

    /// Whether a live stream is currently open.
    pub async fn is_subscribed(&self) -> bool {
        self.subscription
            .lock()
            .await
            .as_ref()
            .is_some_and(|s| !s.is_closed())
    }

    async fn close_subscription(&self) {
        let previous = self.subscription.lock().await.take();
        if let Some(subscription) = previous {
            subscription.close().await;
        }
    }

    async fn subscribe(&self, campaign_id: &str, generation: u64) {
        let mut slot = self.subscription.lock().await;

        let current = lock(&self.state).generation;
        if current != generation {
            return;
        }
        if let Some(previous) = slot.take() {
            previous.close().await;
        }

        let on_snapshot = {
            let state = Arc::clone(&self.state);
            move |snapshot: InsightSnapshot| {
                let mut state = lock(&state);
                if state.generation == generation && state.status.is_ready() {
                    state.live.apply(snapshot);
                }
            }
        };
        let on_error = {
            let state = Arc::clone(&self.state);
            move |e: crate::errors::CoreError| {
                let mut state = lock(&state);
                if state.generation == generation {
                    state.live.record_error(e.to_string());
                }
            }
        };

        *slot = Some(self.client.open_insight_stream(campaign_id, on_snapshot, on_error));
    }
}
