//! Exchange rate abstractions and core types

use crate::core::currency::CurrencyCode;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Rates of every quoted currency relative to one base currency.
pub type RateTable = BTreeMap<String, f64>;

/// Rate tables keyed by the day they were observed.
pub type RateSeries = BTreeMap<NaiveDate, RateTable>;

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn latest_rates(&self, base: &CurrencyCode) -> Result<RateTable>;

    async fn historical_rates(&self, base: &CurrencyCode, date: NaiveDate) -> Result<RateTable>;

    async fn rate_series(
        &self,
        base: &CurrencyCode,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<RateSeries>;

    /// Rate to multiply an amount in `from` by to get `to`. Uses the latest
    /// rates unless a date is given.
    async fn get_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        date: Option<NaiveDate>,
    ) -> Result<f64> {
        let table = match date {
            Some(date) => self.historical_rates(from, date).await?,
            None => self.latest_rates(from).await?,
        };
        table
            .get(to.as_str())
            .copied()
            .ok_or_else(|| anyhow!("No rate found for currency pair: {}{}", from, to))
    }
}

/// Picks the rate of `to` out of every day in the series, oldest first.
pub fn pair_history(series: &RateSeries, to: &CurrencyCode) -> Vec<(NaiveDate, f64)> {
    series
        .iter()
        .filter_map(|(date, table)| table.get(to.as_str()).map(|rate| (*date, *rate)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn code(s: &str) -> CurrencyCode {
        s.parse().unwrap()
    }

    struct FixedProvider;

    #[async_trait]
    impl RateProvider for FixedProvider {
        async fn latest_rates(&self, _base: &CurrencyCode) -> Result<RateTable> {
            Ok(RateTable::from([("EUR".to_string(), 0.9)]))
        }

        async fn historical_rates(
            &self,
            _base: &CurrencyCode,
            _date: NaiveDate,
        ) -> Result<RateTable> {
            Ok(RateTable::from([("EUR".to_string(), 0.8)]))
        }

        async fn rate_series(
            &self,
            _base: &CurrencyCode,
            _from: NaiveDate,
            _to: NaiveDate,
        ) -> Result<RateSeries> {
            Ok(RateSeries::new())
        }
    }

    #[tokio::test]
    async fn test_get_rate_picks_latest_or_historical() {
        let provider = FixedProvider;
        let latest = provider.get_rate(&code("USD"), &code("EUR"), None).await;
        assert_eq!(latest.unwrap(), 0.9);

        let historical = provider
            .get_rate(&code("USD"), &code("EUR"), Some(date("2021-06-01")))
            .await;
        assert_eq!(historical.unwrap(), 0.8);
    }

    #[tokio::test]
    async fn test_get_rate_missing_target() {
        let provider = FixedProvider;
        let err = provider
            .get_rate(&code("USD"), &code("JPY"), None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "No rate found for currency pair: USDJPY");
    }

    #[test]
    fn test_pair_history_is_sorted_and_skips_gaps() {
        let mut series = RateSeries::new();
        series.insert(
            date("2024-01-03"),
            RateTable::from([("EUR".to_string(), 0.93)]),
        );
        series.insert(
            date("2024-01-01"),
            RateTable::from([("EUR".to_string(), 0.91)]),
        );
        series.insert(
            date("2024-01-02"),
            RateTable::from([("GBP".to_string(), 0.79)]),
        );

        let history = pair_history(&series, &code("EUR"));
        assert_eq!(
            history,
            vec![(date("2024-01-01"), 0.91), (date("2024-01-03"), 0.93)]
        );
    }
}
