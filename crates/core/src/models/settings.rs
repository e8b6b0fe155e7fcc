use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Default backend the dashboard talks to.
pub const DEFAULT_BASE_URL: &str = "https://mixo-fe-backend-task.vercel.app";

/// Environment variable that overrides `base_url`.
pub const BASE_URL_ENV: &str = "CAMPAIGN_API_BASE_URL";

/// Runtime settings for the dashboard core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root URL of the campaign service, without a trailing slash.
    pub base_url: String,

    /// Per-request timeout for REST calls.
    pub request_timeout_secs: u64,

    /// Rows per campaign table page.
    pub page_size: usize,

    /// How long the "just updated" flag stays on after a live snapshot.
    pub live_flash_ms: u64,

    /// Reconnect delay for the live stream when the server sends no `retry:`.
    pub stream_retry_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 30,
            page_size: 10,
            live_flash_ms: 500,
            stream_retry_ms: 3000,
        }
    }
}

impl Settings {
    /// Defaults, with `base_url` taken from `CAMPAIGN_API_BASE_URL` when set.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                settings.base_url = url.trim().trim_end_matches('/').to_string();
            }
        }
        settings
    }

    /// Settings pointing at a specific backend.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            CoreError::InvalidConfig(format!("base_url '{}' is not a valid URL: {e}", self.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CoreError::InvalidConfig(format!(
                "base_url '{}' must use http or https",
                self.base_url
            )));
        }
        if self.page_size == 0 {
            return Err(CoreError::InvalidConfig("page_size must be at least 1".into()));
        }
        Ok(())
    }
}
