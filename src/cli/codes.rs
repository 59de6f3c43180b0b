use super::ui;
use crate::core::RateProvider;
use crate::store::CodeRegistry;
use anyhow::Result;

pub async fn run(
    registry: &CodeRegistry,
    provider: &(dyn RateProvider + Send + Sync),
    refresh: bool,
) -> Result<()> {
    let codes = if refresh {
        let pb = ui::new_spinner("Fetching currency codes...");
        let codes = registry.refresh(provider).await;
        pb.finish_and_clear();
        codes?
    } else {
        registry.load_or_fetch(provider).await?
    };

    println!(
        "{} ({})",
        ui::style_text("Known currency codes", ui::StyleType::Title),
        codes.len()
    );
    let names: Vec<&str> = codes.iter().map(|c| c.as_str()).collect();
    for row in names.chunks(10) {
        println!("{}", row.join("  "));
    }
    println!(
        "{}",
        ui::style_text(
            &format!("Cached at {}", registry.path().display()),
            ui::StyleType::Subtle
        )
    );
    Ok(())
}
