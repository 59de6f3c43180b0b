//! Command handlers behind the `curconv` binary

pub mod codes;
pub mod convert;
pub mod defaults;
pub mod history;
pub mod locate;
pub mod setup;
pub mod ui;

use crate::core::{CurrencyCode, CurrencyPair, RateProvider};
use crate::store::{CodeRegistry, PreferenceStore};
use anyhow::{Result, bail};

/// Fills in whichever side of the pair was not given from the stored default.
pub fn resolve_pair(
    from: Option<&str>,
    to: Option<&str>,
    preferences: &PreferenceStore,
) -> Result<CurrencyPair> {
    let from = from.map(str::parse::<CurrencyCode>).transpose()?;
    let to = to.map(str::parse::<CurrencyCode>).transpose()?;

    if let (Some(from), Some(to)) = (&from, &to) {
        return Ok(CurrencyPair::new(from.clone(), to.clone()));
    }

    let Some(default) = preferences.default_pair()? else {
        bail!("No currency pair given and no default set. Run `curconv default set FROM TO` first");
    };
    Ok(CurrencyPair::new(
        from.unwrap_or(default.from),
        to.unwrap_or(default.to),
    ))
}

/// Fails unless both codes of the pair are in the registry.
pub async fn validate_pair(
    pair: &CurrencyPair,
    registry: &CodeRegistry,
    provider: &(dyn RateProvider + Send + Sync),
) -> Result<()> {
    let known = registry.load_or_fetch(provider).await?;
    for code in [&pair.from, &pair.to] {
        if !known.contains(code) {
            bail!("Unknown currency code: {}", code);
        }
    }
    Ok(())
}
