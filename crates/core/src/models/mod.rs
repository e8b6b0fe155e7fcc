pub mod campaign;
pub mod chart;
pub mod insight;
pub mod metric;
pub mod settings;
