//! Label/value series for the 7-day rate trend.

use crate::rate_provider::DailyRates;

/// Ordered chart series derived from a historical-rate response. Ephemeral;
/// a fresh series replaces the previous one on every successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    /// Short date labels, chronologically ascending.
    pub labels: Vec<String>,
    /// Rate per label, same length as `labels`.
    pub values: Vec<f64>,
}

impl TrendSeries {
    pub fn from_rates(rates: &DailyRates) -> Self {
        // BTreeMap iteration is already chronologically ascending.
        let labels = rates.keys().map(|d| d.format("%b %-d").to_string()).collect();
        let values = rates.values().copied().collect();
        TrendSeries { labels, values }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
