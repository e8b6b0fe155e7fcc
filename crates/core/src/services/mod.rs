pub mod campaign_service;
pub mod chart_service;
pub mod format;
pub mod insight_service;
pub mod subscription;
