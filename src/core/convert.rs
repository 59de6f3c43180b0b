//! Amount parsing and conversion

use crate::core::currency::CurrencyCode;
use crate::core::rate::RateProvider;
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use tracing::{debug, warn};

const CONVERTED_PLACES: i32 = 3;

/// Rounds half away from zero to the given number of decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Reads a user-typed amount, ignoring anything that is not a digit or `.`
/// (currency symbols, thousands separators, spaces). Blank input is zero.
pub fn parse_amount(text: &str) -> Result<f64> {
    if text.trim().is_empty() {
        return Ok(0.0);
    }
    let digits: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if digits.is_empty() {
        bail!("Failed to parse amount: '{text}'");
    }
    digits
        .parse::<f64>()
        .with_context(|| format!("Failed to parse amount: '{text}'"))
}

/// Converts `amount` of `from` into `to`, rounded to 3 decimal places.
pub async fn convert(
    provider: &(dyn RateProvider + Send + Sync),
    from: &CurrencyCode,
    to: &CurrencyCode,
    amount: f64,
    date: Option<NaiveDate>,
) -> Result<f64> {
    let rate = provider.get_rate(from, to, date).await?;
    debug!(%from, %to, rate, amount, "Converting");
    Ok(round_to(amount * rate, CONVERTED_PLACES))
}

/// Like [`convert`], but a response body that is not JSON at all is
/// converted with `fallback_rate` instead of failing. Well-formed JSON of the
/// wrong shape still fails.
pub async fn convert_or_fallback(
    provider: &(dyn RateProvider + Send + Sync),
    from: &CurrencyCode,
    to: &CurrencyCode,
    amount: f64,
    date: Option<NaiveDate>,
    fallback_rate: Option<f64>,
) -> Result<f64> {
    match convert(provider, from, to, amount, date).await {
        Err(e) if is_decode_error(&e) => match fallback_rate {
            Some(rate) => {
                warn!(error = %e, rate, "Malformed rate response, using fallback rate");
                Ok(round_to(amount * rate, CONVERTED_PLACES))
            }
            None => Err(e),
        },
        other => other,
    }
}

fn is_decode_error(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<serde_json::Error>())
        .any(|e| e.is_syntax() || e.is_eof())
}
