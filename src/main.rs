use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use curconv::core::log::init_logging;
use std::path::PathBuf;

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

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List the known currency codes
    Codes {
        /// Fetch the codes again instead of using the cache
        #[arg(long)]
        refresh: bool,
    },
    /// Show or change the default currency pair
    Default {
        #[command(subcommand)]
        action: Option<DefaultAction>,
    },
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert, e.g. 100 or "$1,250.50"
        amount: String,
        /// Source currency, defaults to the default pair
        from: Option<String>,
        /// Target currency, defaults to the default pair
        to: Option<String>,
        /// Use the rate of this day (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Show the exchange rate of a pair
    Rate {
        from: Option<String>,
        to: Option<String>,
        /// Use the rate of this day (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Show the daily rate of a pair over the last days
    History {
        from: Option<String>,
        to: Option<String>,
        /// Number of days ending today
        #[arg(long, default_value_t = curconv::cli::history::DEFAULT_DAYS)]
        days: u32,
        /// Also write the series as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the country the lookup service places you in
    Locate,
}

#[derive(Subcommand)]
enum DefaultAction {
    /// Persist a new default pair
    Set { from: String, to: String },
}

impl From<Commands> for curconv::AppCommand {
    fn from(cmd: Commands) -> curconv::AppCommand {
        use curconv::AppCommand;
        match cmd {
            Commands::Codes { refresh } => AppCommand::Codes { refresh },
            Commands::Default { action: None } => AppCommand::ShowDefault,
            Commands::Default {
                action: Some(DefaultAction::Set { from, to }),
            } => AppCommand::SetDefault { from, to },
            Commands::Convert {
                amount,
                from,
                to,
                date,
            } => AppCommand::Convert {
                amount,
                from,
                to,
                date,
            },
            Commands::Rate { from, to, date } => AppCommand::Rate { from, to, date },
            Commands::History {
                from,
                to,
                days,
                output,
            } => AppCommand::History {
                from,
                to,
                days,
                output,
            },
            Commands::Locate => AppCommand::Locate,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => curconv::cli::setup::setup(),
        Some(cmd) => curconv::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
