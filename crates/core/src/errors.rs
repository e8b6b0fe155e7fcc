use thiserror::Error;

/// Unified error type for the entire campaign-dashboard-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    // ── Required resources ──────────────────────────────────────────
    /// A resource the view cannot render without (campaign list, single
    /// campaign record) could not be fetched. Surfaced to the user.
    #[error("Failed to fetch {resource}: {message}")]
    FetchFailure { resource: String, message: String },

    // ── Supplementary resources ─────────────────────────────────────
    /// An insight snapshot could not be attached to a campaign.
    /// Absorbed by the data access layer; never reaches the user.
    #[error("Insights unavailable for campaign {campaign_id}: {message}")]
    EnrichmentFailure {
        campaign_id: String,
        message: String,
    },

    // ── Live stream ─────────────────────────────────────────────────
    #[error("Live stream error for campaign {campaign_id}: {message}")]
    StreamTransport {
        campaign_id: String,
        message: String,
    },

    #[error("Malformed stream message: {0}")]
    MalformedMessage(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("Network error: {0}")]
    Network(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Configuration ───────────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CoreError {
    /// Build a `FetchFailure` for the named resource from any lower-level error.
    pub fn fetch_failure(resource: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        CoreError::FetchFailure {
            resource: resource.into(),
            message: cause.to_string(),
        }
    }

    /// `true` for errors that must be shown to the user (required resources).
    #[must_use]
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            CoreError::FetchFailure { .. } | CoreError::InvalidConfig(_)
        )
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors embed the full URL; keep query strings out of logs.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
