pub mod app;
pub mod catalog;
pub mod config;
pub mod history;
pub mod log;
pub mod providers;
pub mod rate_provider;
pub mod render;
pub mod trend;
pub mod ui;

use anyhow::Result;
use tracing::{debug, info};

use crate::app::{ConverterApp, SessionCommand};
use crate::history::HistoryStore;
use crate::providers::frankfurter::{DEFAULT_BASE_URL, FrankfurterProvider};
use crate::ui::ConsoleSink;

pub enum AppCommand {
    Convert {
        amount: String,
        from: Option<String>,
        to: Option<String>,
    },
    Trend {
        from: Option<String>,
        to: Option<String>,
    },
    History,
    Clear {
        yes: bool,
    },
    Currencies,
    Interactive,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    if let AppCommand::Currencies = command {
        println!("{}", ui::currency_table());
        return Ok(());
    }

    let base_url = config
        .providers
        .frankfurter
        .as_ref()
        .map_or(DEFAULT_BASE_URL, |p| &p.base_url);
    let provider = FrankfurterProvider::new(base_url);
    let history = HistoryStore::open(&config.history_path()?)?;
    let mut sink = ConsoleSink::new();

    let defaults = &config.defaults;
    let (from, to) = match &command {
        AppCommand::Convert { from, to, .. } | AppCommand::Trend { from, to } => (
            from.clone().unwrap_or_else(|| defaults.from.clone()),
            to.clone().unwrap_or_else(|| defaults.to.clone()),
        ),
        _ => (defaults.from.clone(), defaults.to.clone()),
    };
    let mut app = ConverterApp::new(&provider, &history, &mut sink, &from, &to)?;

    match command {
        AppCommand::Convert { amount, .. } => app.convert(&amount).await,
        AppCommand::Trend { .. } => app.show_trend().await?,
        AppCommand::History => app.show_history(),
        AppCommand::Clear { yes } => {
            let confirmed = yes || ui::confirm("Clear all conversion history?")?;
            app.clear_history(confirmed)?;
        }
        AppCommand::Interactive => run_session(&mut app).await?,
        AppCommand::Currencies => unreachable!("handled above"),
    }

    Ok(())
}

/// Interactive loop mirroring the converter widget: type an amount to
/// convert, change or swap the pair, inspect or clear the history.
async fn run_session(app: &mut ConverterApp<'_>) -> Result<()> {
    let term = console::Term::stdout();
    println!("Type an amount to convert, `help` for commands, `quit` to leave.");
    app.show_flags();
    app.show_history();

    loop {
        term.write_str("> ")?;
        let line = term.read_line()?;
        match SessionCommand::parse(&line) {
            SessionCommand::Quit => break,
            SessionCommand::Empty => continue,
            SessionCommand::Help => print_session_help(),
            SessionCommand::Swap => app.swap(),
            SessionCommand::From(code) => app.select_from(&code),
            SessionCommand::To(code) => app.select_to(&code),
            SessionCommand::History => app.show_history(),
            SessionCommand::Clear => {
                let confirmed = ui::confirm("Clear all conversion history?")?;
                app.clear_history(confirmed)?;
            }
            SessionCommand::Convert(amount) => app.convert(&amount).await,
        }
    }
    Ok(())
}

fn print_session_help() {
    println!("Commands:");
    println!("  <amount>     convert the amount with the selected pair");
    println!("  from <code>  change the source currency");
    println!("  to <code>    change the target currency");
    println!("  swap         exchange the selected pair");
    println!("  history      show past conversions");
    println!("  clear        clear past conversions");
    println!("  quit         leave the session");
}
