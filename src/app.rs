//! View controller: owns the selection and control state, wires the rate
//! provider, the history store and the render sink together.

use anyhow::{Result, anyhow};
use chrono::Utc;
use std::mem;
use tracing::{debug, warn};

use crate::catalog::{self, CurrencyDescriptor};
use crate::history::{ConversionRecord, HistoryStore};
use crate::rate_provider::RateProvider;
use crate::render::RenderSink;
use crate::trend::TrendSeries;

pub const INVALID_AMOUNT_MESSAGE: &str = "Please enter a valid amount";
pub const CONVERSION_FAILED_MESSAGE: &str = "Conversion failed. Please try again.";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    Idle,
    Busy,
}

/// Application state for the converter. All shared state lives here; there
/// are no ambient singletons.
pub struct ConverterApp<'a> {
    from: &'static CurrencyDescriptor,
    to: &'static CurrencyDescriptor,
    state: ControlState,
    trend: Option<TrendSeries>,
    provider: &'a dyn RateProvider,
    history: &'a HistoryStore,
    sink: &'a mut dyn RenderSink,
}

impl<'a> ConverterApp<'a> {
    pub fn new(
        provider: &'a dyn RateProvider,
        history: &'a HistoryStore,
        sink: &'a mut dyn RenderSink,
        from: &str,
        to: &str,
    ) -> Result<Self> {
        let from = catalog::get(from).ok_or_else(|| unknown_currency(from))?;
        let to = catalog::get(to).ok_or_else(|| unknown_currency(to))?;
        Ok(ConverterApp {
            from,
            to,
            state: ControlState::Idle,
            trend: None,
            provider,
            history,
            sink,
        })
    }

    pub fn selection(&self) -> (&'static str, &'static str) {
        (self.from.code, self.to.code)
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn trend_series(&self) -> Option<&TrendSeries> {
        self.trend.as_ref()
    }

    /// Runs one conversion: validation gate, busy state around the point
    /// conversion, then history append and trend refresh on success. Any
    /// failure is rendered inline; nothing is fatal and the app always
    /// returns to Idle.
    pub async fn convert(&mut self, amount_input: &str) {
        let amount = match amount_input.trim().parse::<f64>() {
            Ok(a) if a.is_finite() && a > 0.0 => a,
            _ => {
                self.sink.error(INVALID_AMOUNT_MESSAGE);
                return;
            }
        };

        if self.state == ControlState::Busy {
            debug!("Ignoring convert while a conversion is in flight");
            return;
        }

        self.state = ControlState::Busy;
        self.sink.busy(true);
        let outcome = self
            .provider
            .convert(amount, self.from.code, self.to.code)
            .await;
        // Busy ends on the point-conversion result alone; the trend fetch
        // below never holds the control.
        self.state = ControlState::Idle;
        self.sink.busy(false);

        match outcome {
            Ok(conversion) => {
                let record =
                    ConversionRecord::new(amount, self.from.code, self.to.code, &conversion);
                self.sink.result(&record);
                match self.history.append(record) {
                    Ok(records) => self.sink.history(&records, Utc::now().timestamp_millis()),
                    Err(e) => warn!("Failed to persist conversion history: {e}"),
                }
                self.refresh_trend().await;
            }
            Err(e) => {
                warn!(error = %e, "Conversion failed");
                let message = if e.downcast_ref::<reqwest::Error>().is_some() {
                    NETWORK_ERROR_MESSAGE
                } else {
                    CONVERSION_FAILED_MESSAGE
                };
                self.sink.error(message);
            }
        }
    }

    /// Post-conversion trend refresh. The trend is a secondary feature, so a
    /// failure is logged and swallowed; the chart just stays stale.
    async fn refresh_trend(&mut self) {
        match self
            .provider
            .fetch_trend(self.from.code, self.to.code)
            .await
        {
            Ok(rates) => {
                let series = TrendSeries::from_rates(&rates);
                if !series.is_empty() {
                    self.sink.trend(&series, self.from.code, self.to.code);
                }
                self.trend = Some(series);
            }
            Err(e) => warn!("Trend fetch failed: {e}"),
        }
    }

    /// On-demand trend for the standalone subcommand; unlike the
    /// post-conversion refresh this surfaces failures to the caller.
    pub async fn show_trend(&mut self) -> Result<()> {
        let rates = self
            .provider
            .fetch_trend(self.from.code, self.to.code)
            .await?;
        let series = TrendSeries::from_rates(&rates);
        self.sink.trend(&series, self.from.code, self.to.code);
        self.trend = Some(series);
        Ok(())
    }

    /// Exchanges the selected pair. Does not trigger a conversion.
    pub fn swap(&mut self) {
        mem::swap(&mut self.from, &mut self.to);
        self.sink.flags(self.from, self.to);
    }

    /// Changes the source currency. Refreshes flags only; conversion is
    /// user-initiated, never implicit.
    pub fn select_from(&mut self, code: &str) {
        match catalog::get(code) {
            Some(currency) => {
                self.from = currency;
                self.sink.flags(self.from, self.to);
            }
            None => self.sink.error(&unknown_currency(code).to_string()),
        }
    }

    /// Changes the target currency. Refreshes flags only.
    pub fn select_to(&mut self, code: &str) {
        match catalog::get(code) {
            Some(currency) => {
                self.to = currency;
                self.sink.flags(self.from, self.to);
            }
            None => self.sink.error(&unknown_currency(code).to_string()),
        }
    }

    pub fn show_flags(&mut self) {
        self.sink.flags(self.from, self.to);
    }

    pub fn show_history(&mut self) {
        let records = self.history.load();
        self.sink.history(&records, Utc::now().timestamp_millis());
    }

    /// Wipes the history. A no-op unless the caller confirmed the prompt.
    pub fn clear_history(&mut self, confirmed: bool) -> Result<()> {
        if !confirmed {
            debug!("History clear not confirmed");
            return Ok(());
        }
        self.history.clear()?;
        self.sink.history(&[], Utc::now().timestamp_millis());
        Ok(())
    }
}

fn unknown_currency(code: &str) -> anyhow::Error {
    anyhow!("Unknown currency: {code}. Run `fxc currencies` to list supported codes.")
}

/// One line of interactive session input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Convert(String),
    From(String),
    To(String),
    Swap,
    History,
    Clear,
    Help,
    Quit,
    Empty,
}

impl SessionCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return SessionCommand::Empty;
        }
        let mut parts = trimmed.split_whitespace();
        let head = parts.next().unwrap_or_default().to_lowercase();
        match (head.as_str(), parts.next()) {
            ("quit" | "exit" | "q", _) => SessionCommand::Quit,
            ("swap", _) => SessionCommand::Swap,
            ("history", _) => SessionCommand::History,
            ("clear", _) => SessionCommand::Clear,
            ("help" | "?", _) => SessionCommand::Help,
            ("from", Some(code)) => SessionCommand::From(code.to_uppercase()),
            ("to", Some(code)) => SessionCommand::To(code.to_uppercase()),
            // Anything else is an amount attempt; convert validates it.
            _ => SessionCommand::Convert(trimmed.to_string()),
        }
    }
}
