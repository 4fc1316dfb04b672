use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{Duration, Local, NaiveDate};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::providers::util::{round2, round4};
use crate::rate_provider::{Conversion, DailyRates, RateProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.frankfurter.app";

/// Rate provider backed by the Frankfurter API (https://frankfurter.app).
pub struct FrankfurterProvider {
    base_url: String,
}

impl FrankfurterProvider {
    pub fn new(base_url: &str) -> Self {
        FrankfurterProvider {
            base_url: base_url.to_string(),
        }
    }

    /// Fetches daily rates for an explicit date range. `fetch_trend` computes
    /// the trailing window and delegates here.
    pub async fn fetch_range(
        &self,
        from: &str,
        to: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DailyRates> {
        let url = format!(
            "{}/{}..{}?from={}&to={}",
            self.base_url,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
            from,
            to
        );
        debug!("Requesting rate history from {}", url);

        let client = reqwest::Client::builder().user_agent("fxc/1.0").build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Request error for rate history: {from} -> {to}"))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for rate history: {} -> {}",
                response.status(),
                from,
                to
            ));
        }

        let text = response.text().await?;
        let data: RangeResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {from} -> {to}: {e}"))?;

        let target = to.to_uppercase();
        // Days whose entry omits the target code are skipped.
        let rates = data
            .rates
            .into_iter()
            .filter_map(|(date, day)| day.get(&target).map(|rate| (date, *rate)))
            .collect();
        Ok(rates)
    }
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    rates: HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct RangeResponse {
    rates: HashMap<NaiveDate, HashMap<String, f64>>,
}

#[async_trait]
impl RateProvider for FrankfurterProvider {
    #[instrument(
        name = "FrankfurterConvert",
        skip(self),
        fields(from = %from, to = %to)
    )]
    async fn convert(&self, amount: f64, from: &str, to: &str) -> Result<Conversion> {
        // The upstream rejects identical pairs; the conversion is trivial.
        if from.eq_ignore_ascii_case(to) {
            return Ok(Conversion {
                converted_amount: round2(amount),
                rate: 1.0,
            });
        }

        let url = format!(
            "{}/latest?amount={}&from={}&to={}",
            self.base_url, amount, from, to
        );
        debug!("Requesting conversion from {}", url);

        let client = reqwest::Client::builder().user_agent("fxc/1.0").build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Request error for conversion: {from} -> {to}"))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for conversion: {} -> {}",
                response.status(),
                from,
                to
            ));
        }

        let text = response.text().await?;
        let data: LatestResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {from} -> {to}: {e}"))?;

        let value = data
            .rates
            .get(&to.to_uppercase())
            .copied()
            .ok_or_else(|| anyhow!("No rate found for {} in conversion response", to))?;

        let converted_amount = round2(value);
        let rate = round4(converted_amount / amount);
        Ok(Conversion {
            converted_amount,
            rate,
        })
    }

    async fn fetch_trend(&self, from: &str, to: &str) -> Result<DailyRates> {
        // Window boundaries come from the clock, not from the response range.
        let end = Local::now().date_naive();
        let start = end - Duration::days(7);
        self.fetch_range(from, to, start, end).await
    }
}
