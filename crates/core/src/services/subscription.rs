use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::debug;

/// Handle to one open live insight stream.
///
/// Closing is idempotent and never fails. Once `close()` returns, the feed
/// connection has been released and no callback fires again. Dropping the
/// handle closes the stream too, without waiting.
#[must_use = "dropping the subscription closes the live stream"]
pub struct InsightSubscription {
    campaign_id: String,
    closed: Arc<AtomicBool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl InsightSubscription {
    pub(crate) fn new(campaign_id: String, closed: Arc<AtomicBool>, task: JoinHandle<()>) -> Self {
        Self {
            campaign_id,
            closed,
            task: Mutex::new(Some(task)),
        }
    }

    pub fn campaign_id(&self) -> &str {
        &self.campaign_id
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Stop delivery and tear the connection down.
    ///
    /// Returns `true` for the call that actually closed the stream and
    /// `false` for every later call.
    pub async fn close(&self) -> bool {
        if self.closed.swap(true, Ordering::AcqRel) {
            return false;
        }
        let task = self.task.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(task) = task {
            task.abort();
            // Cancelled or already finished, either way the stream is gone.
            let _ = task.await;
        }
        debug!(campaign_id = %self.campaign_id, "live stream closed");
        true
    }
}

impl Drop for InsightSubscription {
    fn drop(&mut self) {
        self.closed.store(true, Ordering::Release);
        let task = self.task.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(task) = task {
            task.abort();
        }
    }
}

impl std::fmt::Debug for InsightSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsightSubscription")
            .field("campaign_id", &self.campaign_id)
            .field("closed", &self.is_closed())
            .finish()
    }
}
