//! Currency codes and pairs

use anyhow::{Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// A three letter, upper-case currency code such as `USD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Local symbol of well known currencies.
    pub fn symbol(&self) -> Option<&'static str> {
        let symbol = match self.0.as_str() {
            "USD" | "AUD" | "CAD" | "NZD" | "SGD" | "HKD" | "MXN" => "$",
            "EUR" => "€",
            "GBP" => "£",
            "JPY" | "CNY" => "¥",
            "INR" => "₹",
            "KRW" => "₩",
            "RUB" => "₽",
            "TRY" => "₺",
            "ILS" => "₪",
            "PHP" => "₱",
            "THB" => "฿",
            "UAH" => "₴",
            "NGN" => "₦",
            "VND" => "₫",
            "BRL" => "R$",
            "ZAR" => "R",
            "CHF" => "CHF",
            "PLN" => "zł",
            "SEK" | "NOK" | "DKK" | "ISK" => "kr",
            "CZK" => "Kč",
            "HUF" => "Ft",
            "IDR" => "Rp",
            "MYR" => "RM",
            _ => return None,
        };
        Some(symbol)
    }
}

impl FromStr for CurrencyCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(anyhow!("Invalid currency code: '{}'", s.trim()));
        }
        Ok(CurrencyCode(code))
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A source and target currency, persisted as `FROM,TO`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
}

impl CurrencyPair {
    pub fn new(from: CurrencyCode, to: CurrencyCode) -> Self {
        Self { from, to }
    }
}

impl FromStr for CurrencyPair {
    type Err = anyhow::Error;

    /// Only the first two fields are read, anything after them is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.trim().split(',');
        let (Some(from), Some(to)) = (fields.next(), fields.next()) else {
            bail!("Expected a currency pair in the form FROM,TO but got '{}'", s.trim());
        };
        Ok(CurrencyPair {
            from: from.parse()?,
            to: to.parse()?,
        })
    }
}

impl Display for CurrencyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_normalised_to_upper_case() {
        let code: CurrencyCode = " usd ".parse().unwrap();
        assert_eq!(code.as_str(), "USD");
        assert_eq!(code.to_string(), "USD");
    }

    #[test]
    fn test_symbol_lookup() {
        let symbol = |s: &str| s.parse::<CurrencyCode>().unwrap().symbol();
        assert_eq!(symbol("gbp"), Some("£"));
        assert_eq!(symbol("USD"), Some("$"));
        assert_eq!(symbol("BRL"), Some("R$"));
        assert_eq!(symbol("XAU"), None);
    }

    #[test]
    fn test_invalid_codes_are_rejected() {
        for input in ["", "US", "USDT", "U$D", "12A"] {
            assert!(input.parse::<CurrencyCode>().is_err(), "{input} should fail");
        }
        assert_eq!(
            "EURO".parse::<CurrencyCode>().unwrap_err().to_string(),
            "Invalid currency code: 'EURO'"
        );
    }

    #[test]
    fn test_pair_reads_first_two_fields() {
        let pair: CurrencyPair = "gbp,jpy,eur\n".parse().unwrap();
        assert_eq!(pair.from.as_str(), "GBP");
        assert_eq!(pair.to.as_str(), "JPY");
        assert_eq!(pair.to_string(), "GBP,JPY");
    }

    #[test]
    fn test_pair_requires_two_fields() {
        let err = "USD".parse::<CurrencyPair>().unwrap_err();
        assert!(err.to_string().contains("FROM,TO"));
    }

    #[test]
    fn test_code_deserializes_from_string() {
        let code: CurrencyCode = serde_json::from_str(r#""inr""#).unwrap();
        assert_eq!(code.as_str(), "INR");
        assert!(serde_json::from_str::<CurrencyCode>(r#""rupee""#).is_err());
    }
}
