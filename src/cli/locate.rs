use super::ui;
use crate::providers::CountryLocator;
use anyhow::Result;

pub async fn run(locator: &CountryLocator) -> Result<String> {
    let pb = ui::new_spinner("Looking up country...");
    let country = locator.country_name().await;
    pb.finish_and_clear();
    let country = country?;
    println!(
        "You appear to be in {}",
        ui::style_text(&country, ui::StyleType::Value)
    );
    Ok(country)
}
