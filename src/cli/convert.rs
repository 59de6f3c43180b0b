use super::ui;
use crate::core::convert::{convert_or_fallback, parse_amount};
use crate::core::{CurrencyCode, CurrencyPair, RateProvider};
use crate::store::CodeRegistry;
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::Cell;
use tracing::debug;

pub struct ConvertRequest<'a> {
    pub pair: &'a CurrencyPair,
    pub amount: &'a str,
    pub date: Option<NaiveDate>,
    pub fallback_rate: Option<f64>,
}

/// Validates the pair and fetches the rate concurrently, then prints the
/// converted amount.
pub async fn run(
    request: ConvertRequest<'_>,
    registry: &CodeRegistry,
    provider: &(dyn RateProvider + Send + Sync),
) -> Result<f64> {
    let pair = request.pair;
    let amount = parse_amount(request.amount)?;
    debug!(%pair, amount, date = ?request.date, "Converting");

    let pb = ui::new_spinner("Fetching exchange rate...");
    let result = futures::try_join!(
        super::validate_pair(pair, registry, provider),
        convert_or_fallback(
            provider,
            &pair.from,
            &pair.to,
            amount,
            request.date,
            request.fallback_rate
        )
    );
    pb.finish_and_clear();
    let (_, converted) = result?;

    let when = request
        .date
        .map(|d| format!(" on {d}"))
        .unwrap_or_default();
    println!(
        "{} = {}{}",
        display_amount(amount, &pair.from),
        ui::style_text(&display_amount(converted, &pair.to), ui::StyleType::Value),
        ui::style_text(&when, ui::StyleType::Subtle)
    );
    Ok(converted)
}

/// `£250 GBP`, or `250 XAU` when the currency has no known symbol.
pub fn display_amount(value: f64, code: &CurrencyCode) -> String {
    format!("{}{} {}", code.symbol().unwrap_or_default(), value, code)
}

/// Prints the rate of the pair, latest or on the given day.
pub async fn rate(
    pair: &CurrencyPair,
    date: Option<NaiveDate>,
    registry: &CodeRegistry,
    provider: &(dyn RateProvider + Send + Sync),
) -> Result<f64> {
    let pb = ui::new_spinner("Fetching exchange rate...");
    let result = futures::try_join!(
        super::validate_pair(pair, registry, provider),
        provider.get_rate(&pair.from, &pair.to, date)
    );
    pb.finish_and_clear();
    let (_, rate) = result?;

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Pair"),
        ui::header_cell("Date"),
        ui::header_cell("Rate"),
        ui::header_cell("Inverse"),
    ]);
    let inverse = if rate != 0.0 {
        Cell::new(ui::format_rate(1.0 / rate))
    } else {
        Cell::new("N/A")
    };
    table.add_row(vec![
        Cell::new(format!("{}/{}", pair.from, pair.to)),
        Cell::new(date.map_or_else(|| "latest".to_string(), |d| d.to_string())),
        ui::rate_cell(rate),
        inverse,
    ]);
    println!("{table}");
    Ok(rate)
}
