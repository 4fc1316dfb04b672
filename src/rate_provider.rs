//! Exchange rate abstractions for the application.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Outcome of a point-in-time conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// Converted amount in the target currency, rounded to 2 decimals.
    pub converted_amount: f64,
    /// Units of target currency per one unit of source, rounded to 4 decimals.
    pub rate: f64,
}

/// Daily rates keyed by date; BTreeMap keeps them chronologically ordered.
pub type DailyRates = BTreeMap<NaiveDate, f64>;

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Converts `amount` from one currency to another at the live rate.
    /// The caller validates that `amount` is finite and positive.
    async fn convert(&self, amount: f64, from: &str, to: &str) -> Result<Conversion>;

    /// Fetches daily rates for the trailing 7-calendar-day window ending
    /// today in local time.
    async fn fetch_trend(&self, from: &str, to: &str) -> Result<DailyRates>;
}
