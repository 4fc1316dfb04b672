use anyhow::Result;
use clap::{Parser, Subcommand};
use fxc::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fxc::AppCommand {
    fn from(cmd: Commands) -> fxc::AppCommand {
        match cmd {
            Commands::Convert { amount, from, to } => fxc::AppCommand::Convert { amount, from, to },
            Commands::Trend { from, to } => fxc::AppCommand::Trend { from, to },
            Commands::History => fxc::AppCommand::History,
            Commands::Clear { yes } => fxc::AppCommand::Clear { yes },
            Commands::Currencies => fxc::AppCommand::Currencies,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an amount between two currencies
    Convert {
        amount: String,
        from: Option<String>,
        to: Option<String>,
    },
    /// Show the 7-day rate trend for a currency pair
    Trend {
        from: Option<String>,
        to: Option<String>,
    },
    /// Show past conversions
    History,
    /// Clear past conversions
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List supported currencies
    Currencies,
    /// Create default configuration
    Setup,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => fxc::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => fxc::run_command(fxc::AppCommand::Interactive, cli.config_path.as_deref()).await,
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = fxc::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
defaults:
  from: "USD"
  to: "INR"

providers:
  frankfurter:
    base_url: "https://api.frankfurter.app"
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
