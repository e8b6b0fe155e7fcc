use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::DashboardClient;
use super::detail::{CampaignDetailView, DetailState};

/// Side drawer showing one campaign with live metrics.
///
/// Opening it for a campaign loads that campaign; closing it tears the
/// live stream down and clears the content.
#[derive(Clone)]
pub struct CampaignDrawer {
    detail: CampaignDetailView,
    open: Arc<AtomicBool>,
}

impl CampaignDrawer {
    pub fn new(client: DashboardClient) -> Self {
        Self {
            detail: CampaignDetailView::new(client),
            open: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn open(&self, campaign_id: &str) {
        self.open.store(true, Ordering::Release);
        self.detail.load(campaign_id).await;
    }

    pub async fn close(&self) {
        self.open.store(false, Ordering::Release);
        self.detail.leave().await;
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    pub fn selected_campaign_id(&self) -> Option<String> {
        self.detail.state().campaign_id
    }

    pub fn state(&self) -> DetailState {
        self.detail.state()
    }

    /// Retry a failed load of the selected campaign.
    pub async fn retry(&self) {
        if self.is_open() {
            self.detail.retry().await;
        }
    }

    pub async fn is_subscribed(&self) -> bool {
        self.detail.is_subscribed().await
    }
}
