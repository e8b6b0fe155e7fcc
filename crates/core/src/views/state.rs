use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::models::insight::InsightSnapshot;

/// Lifecycle of a view: `Idle → Loading → {Ready, Failed}`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    /// A required fetch failed; the view shows this message and a retry action.
    Failed(String),
}

impl ViewStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, ViewStatus::Ready)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewStatus::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ViewStatus::Failed(_))
    }
}

/// Latest live snapshot of one campaign plus the "just updated" flag.
#[derive(Debug, Clone)]
pub struct LiveMetrics {
    snapshot: Option<InsightSnapshot>,
    updated_at: Option<Instant>,
    flash: Duration,
    updates: u64,
    last_error: Option<String>,
}

impl LiveMetrics {
    pub fn new(flash: Duration) -> Self {
        Self {
            snapshot: None,
            updated_at: None,
            flash,
            updates: 0,
            last_error: None,
        }
    }

    /// Initial metrics taken from the fetched campaign. Does not flash.
    pub fn seed(&mut self, snapshot: InsightSnapshot) {
        self.snapshot = Some(snapshot);
        self.updated_at = None;
    }

    /// A pushed snapshot replaces the previous one wholesale and flashes.
    pub fn apply(&mut self, snapshot: InsightSnapshot) {
        self.apply_at(snapshot, Instant::now());
    }

    pub fn apply_at(&mut self, snapshot: InsightSnapshot, now: Instant) {
        self.snapshot = Some(snapshot);
        self.updated_at = Some(now);
        self.updates += 1;
        self.last_error = None;
    }

    /// Stream trouble: keep the last snapshot, drop the flash.
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.updated_at = None;
        self.last_error = Some(message.into());
    }

    pub fn clear(&mut self) {
        self.snapshot = None;
        self.updated_at = None;
        self.updates = 0;
        self.last_error = None;
    }

    pub fn snapshot(&self) -> Option<&InsightSnapshot> {
        self.snapshot.as_ref()
    }

    /// True for the flash window after the latest live update.
    pub fn is_live(&self) -> bool {
        self.is_live_at(Instant::now())
    }

    pub fn is_live_at(&self, now: Instant) -> bool {
        self.updated_at
            .is_some_and(|at| now.saturating_duration_since(at) < self.flash)
    }

    /// Number of live snapshots applied since the view loaded.
    pub fn updates(&self) -> u64 {
        self.updates
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

pub(crate) fn lock<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}
