use chrono::{Days, NaiveDate, Utc};
use rand::Rng;
use std::ops::Range;

use crate::models::chart::{ChartDataPoint, ChartSummary};

/// Number of days shown on the trend chart (today included).
pub const CHART_DAYS: u64 = 7;

const IMPRESSIONS_RANGE: Range<u64> = 10_000..60_000;
const CLICKS_RANGE: Range<u64> = 1_000..6_000;
const CONVERSIONS_RANGE: Range<u64> = 100..600;

/// Generates the performance trend series.
///
/// PLACEHOLDER: the backend exposes no historical time series, so the points
/// are random values over the last seven days. Replace `generate_with` once a
/// history endpoint exists.
#[derive(Debug, Clone, Default)]
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// Seven days ending today, random values.
    pub fn generate_chart_data(&self) -> Vec<ChartDataPoint> {
        let today = Utc::now().date_naive();
        self.generate_with(&mut rand::thread_rng(), today)
    }

    /// Seven consecutive days ending at `today`, values drawn from `rng`.
    pub fn generate_with<R: Rng>(&self, rng: &mut R, today: NaiveDate) -> Vec<ChartDataPoint> {
        (0..CHART_DAYS)
            .rev()
            .filter_map(|days_back| today.checked_sub_days(Days::new(days_back)))
            .map(|date| ChartDataPoint {
                date: date.format("%b %-d").to_string(),
                impressions: rng.gen_range(IMPRESSIONS_RANGE),
                clicks: rng.gen_range(CLICKS_RANGE),
                conversions: rng.gen_range(CONVERSIONS_RANGE),
            })
            .collect()
    }

    /// Totals and the peak day by impressions (first wins on ties).
    pub fn summarize(&self, points: &[ChartDataPoint]) -> ChartSummary {
        let peak_day = points
            .iter()
            .fold(None::<&ChartDataPoint>, |best, p| match best {
                Some(b) if b.impressions >= p.impressions => Some(b),
                _ => Some(p),
            })
            .cloned();

        ChartSummary {
            total_impressions: points.iter().map(|p| p.impressions).sum(),
            total_clicks: points.iter().map(|p| p.clicks).sum(),
            total_conversions: points.iter().map(|p| p.conversions).sum(),
            peak_day,
        }
    }
}
