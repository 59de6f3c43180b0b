pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::providers::{CachingRateProvider, CountryLocator, FreeCurrencyProvider};
use crate::store::{CODES_FILE, CodeRegistry, DEFAULT_PAIR_FILE, DebugDump, PreferenceStore};
use anyhow::Result;
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::{debug, info};

pub enum AppCommand {
    Codes {
        refresh: bool,
    },
    ShowDefault,
    SetDefault {
        from: String,
        to: String,
    },
    Convert {
        amount: String,
        from: Option<String>,
        to: Option<String>,
        date: Option<NaiveDate>,
    },
    Rate {
        from: Option<String>,
        to: Option<String>,
        date: Option<NaiveDate>,
    },
    History {
        from: Option<String>,
        to: Option<String>,
        days: u32,
        output: Option<PathBuf>,
    },
    Locate,
}

/// Everything a command needs, built once from the config.
pub struct AppContext {
    pub config: AppConfig,
    pub provider: CachingRateProvider<FreeCurrencyProvider>,
    pub registry: CodeRegistry,
    pub preferences: PreferenceStore,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Result<Self> {
        let data_path = config.default_data_path()?;
        debug!("Using data path {}", data_path.display());

        let dump = if config.debug_dump {
            DebugDump::new(config.debug_dump_path()?)
        } else {
            DebugDump::disabled()
        };

        let rates = &config.providers.freecurrency;
        let provider = FreeCurrencyProvider::new(&rates.base_url, rates.resolve_api_key())?
            .with_debug_dump(dump);

        Ok(AppContext {
            provider: CachingRateProvider::new(provider),
            registry: CodeRegistry::new(data_path.join(CODES_FILE)),
            preferences: PreferenceStore::new(data_path.join(DEFAULT_PAIR_FILE)),
            config,
        })
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("curconv starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let ctx = AppContext::new(config)?;
    let provider = &ctx.provider;

    match command {
        AppCommand::Codes { refresh } => cli::codes::run(&ctx.registry, provider, refresh).await,
        AppCommand::ShowDefault => cli::defaults::show(&ctx.preferences),
        AppCommand::SetDefault { from, to } => {
            cli::defaults::set(&ctx.preferences, &ctx.registry, provider, &from, &to).await
        }
        AppCommand::Convert {
            amount,
            from,
            to,
            date,
        } => {
            let pair = cli::resolve_pair(from.as_deref(), to.as_deref(), &ctx.preferences)?;
            let request = cli::convert::ConvertRequest {
                pair: &pair,
                amount: &amount,
                date,
                fallback_rate: ctx.config.fallback_rate,
            };
            cli::convert::run(request, &ctx.registry, provider)
                .await
                .map(|_| ())
        }
        AppCommand::Rate { from, to, date } => {
            let pair = cli::resolve_pair(from.as_deref(), to.as_deref(), &ctx.preferences)?;
            cli::convert::rate(&pair, date, &ctx.registry, provider)
                .await
                .map(|_| ())
        }
        AppCommand::History {
            from,
            to,
            days,
            output,
        } => {
            let pair = cli::resolve_pair(from.as_deref(), to.as_deref(), &ctx.preferences)?;
            cli::history::run(&pair, days, output.as_deref(), &ctx.registry, provider)
                .await
                .map(|_| ())
        }
        AppCommand::Locate => {
            let lookup = &ctx.config.providers.ipregistry;
            let locator = CountryLocator::new(&lookup.base_url, lookup.resolve_api_key())?;
            cli::locate::run(&locator).await.map(|_| ())
        }
    }
}
