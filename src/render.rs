//! Rendering ports for the view controller.

use crate::catalog::CurrencyDescriptor;
use crate::history::ConversionRecord;
use crate::trend::TrendSeries;

/// Output surface the converter renders into. The console implementation
/// lives in [`crate::ui`]; tests inject a recording sink. Render failures are
/// the sink's problem and must never bubble back into the conversion flow.
pub trait RenderSink {
    /// Busy indicator while a conversion request is outstanding.
    fn busy(&mut self, busy: bool);

    /// A successful conversion result.
    fn result(&mut self, record: &ConversionRecord);

    /// A transient inline error message.
    fn error(&mut self, message: &str);

    /// The history panel. `now_ms` anchors the relative time labels.
    fn history(&mut self, records: &[ConversionRecord], now_ms: i64);

    /// The 7-day trend chart for a currency pair.
    fn trend(&mut self, series: &TrendSeries, from: &str, to: &str);

    /// The selected currency pair (flag refresh).
    fn flags(&mut self, from: &CurrencyDescriptor, to: &CurrencyDescriptor);
}
