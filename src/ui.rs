//! Console rendering: styled text, history table, busy spinner, trend chart.

use anyhow::Result;
use chrono::Local;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Color as ChartColor, Style as ChartStyle};
use ratatui::symbols;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType};
use ratatui::{Frame, Terminal, TerminalOptions, Viewport};
use std::time::Duration;
use tracing::warn;

use crate::catalog::{self, CurrencyDescriptor};
use crate::history::ConversionRecord;
use crate::render::RenderSink;
use crate::trend::TrendSeries;

/// Defines different styles for text elements.
pub enum StyleType {
    ResultValue,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::ResultValue => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Creates a new `indicatif::ProgressBar` spinner for the busy state.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Human-relative label for an elapsed duration in seconds.
pub fn relative_time(elapsed_secs: i64) -> String {
    if elapsed_secs < 60 {
        "Just now".to_string()
    } else if elapsed_secs < 3600 {
        format!("{}m ago", elapsed_secs / 60)
    } else if elapsed_secs < 86400 {
        format!("{}h ago", elapsed_secs / 3600)
    } else {
        format!("{}d ago", elapsed_secs / 86400)
    }
}

/// Formats a positive amount with thousands separators, keeping at most two
/// decimals and dropping trailing zeros: 8320.00 -> "8,320", 83.20 -> "83.2".
pub fn format_amount(value: f64) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text, None),
    };

    let mut grouped = String::new();
    let digits = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{grouped}.{f}"),
        None => grouped,
    }
}

/// Asks a yes/no question on the terminal; anything but y/yes is a no.
pub fn confirm(prompt: &str) -> Result<bool> {
    let term = console::Term::stdout();
    term.write_str(&format!("{prompt} [y/N] "))?;
    let answer = term.read_line()?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes"
    ))
}

/// Catalog listing for the `currencies` subcommand.
pub fn currency_table() -> Table {
    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Currency"),
        header_cell("Symbol"),
        header_cell("Flag"),
    ]);
    for currency in &catalog::CURRENCIES {
        table.add_row(vec![
            Cell::new(currency.code),
            Cell::new(currency.name),
            Cell::new(currency.symbol),
            Cell::new(catalog::flag_emoji(currency.flag)),
        ]);
    }
    table
}

const CHART_HEIGHT: u16 = 12;

/// Draws the trend chart into a frame. Split out so tests can render it
/// against a `TestBackend`.
pub(crate) fn draw_trend(frame: &mut Frame, series: &TrendSeries, from: &str, to: &str) {
    let data: Vec<(f64, f64)> = series
        .values
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as f64, v))
        .collect();

    let min_y = series.values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_y = series
        .values
        .iter()
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);
    // Keep a visible band even when the rate was flat all week.
    let pad = ((max_y - min_y) * 0.1).max(max_y.abs() * 0.001).max(1e-6);

    let name = format!("{from} to {to}");
    let datasets = vec![
        Dataset::default()
            .name(name.clone())
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(ChartStyle::default().fg(ChartColor::Cyan))
            .data(&data),
    ];

    let max_x = (series.values.len().saturating_sub(1)).max(1) as f64;
    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {name} (7 days) ")),
        )
        .x_axis(
            Axis::default()
                .style(ChartStyle::default().fg(ChartColor::Gray))
                .bounds([0.0, max_x])
                .labels(vec![
                    Span::raw(series.labels.first().cloned().unwrap_or_default()),
                    Span::raw(series.labels.last().cloned().unwrap_or_default()),
                ]),
        )
        .y_axis(
            Axis::default()
                .style(ChartStyle::default().fg(ChartColor::Gray))
                .bounds([min_y - pad, max_y + pad])
                .labels(vec![
                    Span::raw(format!("{min_y:.4}")),
                    Span::raw(format!("{max_y:.4}")),
                ]),
        );

    frame.render_widget(chart, frame.area());
}

/// Renders the chart once into an inline viewport at the cursor. Each call
/// builds a fresh terminal and chart; the previous drawing is plain scrollback
/// by then, so nothing is ever updated in place.
fn render_trend_chart(series: &TrendSeries, from: &str, to: &str) -> Result<()> {
    let backend = CrosstermBackend::new(std::io::stdout());
    let mut terminal = Terminal::with_options(
        backend,
        TerminalOptions {
            viewport: Viewport::Inline(CHART_HEIGHT),
        },
    )?;
    terminal.draw(|frame| draw_trend(frame, series, from, to))?;
    println!();
    Ok(())
}

/// Render sink writing to the terminal.
pub struct ConsoleSink {
    spinner: Option<ProgressBar>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        ConsoleSink { spinner: None }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSink for ConsoleSink {
    fn busy(&mut self, busy: bool) {
        if busy {
            self.spinner = Some(new_spinner("Converting..."));
        } else if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn result(&mut self, record: &ConversionRecord) {
        let symbol = catalog::get(&record.to).map_or("", |c| c.symbol);
        println!();
        println!(
            "  {}",
            style_text(
                &format!("{symbol}{}", format_amount(record.result)),
                StyleType::ResultValue
            )
        );
        println!("  1 {} = {:.4} {}", record.from, record.rate, record.to);
        println!(
            "  {}",
            style_text(
                &format!("Updated {}", Local::now().format("%H:%M:%S")),
                StyleType::Subtle
            )
        );
    }

    fn error(&mut self, message: &str) {
        println!("{}", style_text(message, StyleType::Error));
    }

    fn history(&mut self, records: &[ConversionRecord], now_ms: i64) {
        if records.is_empty() {
            println!("{}", style_text("No conversions yet", StyleType::Subtle));
            return;
        }

        let mut table = new_styled_table();
        table.set_header(vec![
            header_cell("Conversion"),
            header_cell("Result"),
            header_cell("Rate"),
            header_cell("When"),
        ]);
        for record in records {
            let symbol = catalog::get(&record.to).map_or("", |c| c.symbol);
            let elapsed_secs = (now_ms - record.timestamp) / 1000;
            table.add_row(vec![
                Cell::new(format!(
                    "{} {} → {}",
                    format_amount(record.amount),
                    record.from,
                    record.to
                )),
                Cell::new(format!("{symbol}{}", format_amount(record.result))),
                Cell::new(format!(
                    "1 {} = {:.4} {}",
                    record.from, record.rate, record.to
                )),
                Cell::new(relative_time(elapsed_secs)),
            ]);
        }
        println!("{table}");
    }

    fn trend(&mut self, series: &TrendSeries, from: &str, to: &str) {
        if series.is_empty() {
            return;
        }
        if let Err(e) = render_trend_chart(series, from, to) {
            warn!("Failed to draw trend chart: {e}");
        }
    }

    fn flags(&mut self, from: &CurrencyDescriptor, to: &CurrencyDescriptor) {
        println!(
            "  {} {} → {} {}",
            catalog::flag_emoji(from.flag),
            from.code,
            catalog::flag_emoji(to.flag),
            to.code
        );
    }
}
