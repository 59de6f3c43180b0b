use super::ui;
use crate::core::{CurrencyPair, RateProvider};
use crate::store::{CodeRegistry, PreferenceStore};
use anyhow::Result;

pub fn show(preferences: &PreferenceStore) -> Result<()> {
    match preferences.default_pair()? {
        Some(pair) => println!(
            "Default pair: {} -> {}",
            ui::style_text(pair.from.as_str(), ui::StyleType::Value),
            ui::style_text(pair.to.as_str(), ui::StyleType::Value)
        ),
        None => println!(
            "{}",
            ui::style_text("No default pair set", ui::StyleType::Subtle)
        ),
    }
    Ok(())
}

pub async fn set(
    preferences: &PreferenceStore,
    registry: &CodeRegistry,
    provider: &(dyn RateProvider + Send + Sync),
    from: &str,
    to: &str,
) -> Result<()> {
    let pair = CurrencyPair::new(from.parse()?, to.parse()?);
    super::validate_pair(&pair, registry, provider).await?;
    preferences.set_default_pair(&pair)?;
    println!("Default pair set to {} -> {}", pair.from, pair.to);
    Ok(())
}
