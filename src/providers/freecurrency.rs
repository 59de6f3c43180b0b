use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::util::{RetryPolicy, with_retry};
use crate::core::{CurrencyCode, RateProvider, RateSeries, RateTable};
use crate::store::DebugDump;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy)]
enum Endpoint {
    Latest,
    Historical,
}

impl Endpoint {
    fn path(self) -> &'static str {
        match self {
            Endpoint::Latest => "/api/v2/latest",
            Endpoint::Historical => "/api/v2/historical",
        }
    }
}

#[derive(Deserialize, Debug)]
struct ApiResponse<T> {
    data: T,
}

/// Client for the freecurrencyapi.net v2 API.
pub struct FreeCurrencyProvider {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
    retry: RetryPolicy,
    dump: DebugDump,
}

impl FreeCurrencyProvider {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("curconv/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(FreeCurrencyProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
            retry: RetryPolicy::default(),
            dump: DebugDump::disabled(),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_debug_dump(mut self, dump: DebugDump) -> Self {
        self.dump = dump;
        self
    }

    fn build_url(
        &self,
        endpoint: Endpoint,
        base: &CurrencyCode,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<Url> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            anyhow!("No API key configured for the exchange rate provider (set EXCHANGE_RATE_API_KEY)")
        })?;

        let mut url = Url::parse(&format!("{}{}", self.base_url, endpoint.path()))
            .with_context(|| format!("Invalid provider URL: {}", self.base_url))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("apikey", api_key);
            query.append_pair("base_currency", base.as_str());
            if let Some(date) = date_from {
                query.append_pair("date_from", &date.format(DATE_FORMAT).to_string());
            }
            if let Some(date) = date_to {
                query.append_pair("date_to", &date.format(DATE_FORMAT).to_string());
            }
        }
        Ok(url)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        base: &CurrencyCode,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<T> {
        let url = self.build_url(endpoint, base, date_from, date_to)?;
        if let Err(e) = self.dump.log_url(url.as_str()) {
            warn!("Could not log request URL: {}", e);
        }
        debug!(endpoint = ?endpoint, "Requesting rates for {}", base);

        let response = with_retry(|| self.client.get(url.clone()).send(), self.retry)
            .await
            .with_context(|| format!("Failed to send request for base currency: {base}"))?;

        if !response.status().is_success() {
            bail!(
                "HTTP error: {} for base currency: {}",
                response.status(),
                base
            );
        }

        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to get response text for base currency: {base}"))?;

        let body: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse JSON response for {base}"))?;
        if let Err(e) = self.dump.write_response(&body) {
            warn!("Could not dump response: {}", e);
        }

        let parsed: ApiResponse<T> = serde_json::from_value(body)
            .with_context(|| format!("Unexpected response shape for {base}"))?;
        Ok(parsed.data)
    }
}

#[async_trait]
impl RateProvider for FreeCurrencyProvider {
    #[instrument(name = "LatestRates", skip_all, fields(base = %base))]
    async fn latest_rates(&self, base: &CurrencyCode) -> Result<RateTable> {
        self.fetch(Endpoint::Latest, base, None, None).await
    }

    #[instrument(name = "HistoricalRates", skip_all, fields(base = %base, date = %date))]
    async fn historical_rates(&self, base: &CurrencyCode, date: NaiveDate) -> Result<RateTable> {
        let mut series: RateSeries = self
            .fetch(Endpoint::Historical, base, Some(date), Some(date))
            .await?;
        series
            .remove(&date)
            .ok_or_else(|| anyhow!("No rates found for {} on {}", base, date))
    }

    #[instrument(name = "RateSeries", skip_all, fields(base = %base))]
    async fn rate_series(
        &self,
        base: &CurrencyCode,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<RateSeries> {
        if from > to {
            bail!("Start date {} is after end date {}", from, to);
        }
        let series: RateSeries = self
            .fetch(Endpoint::Historical, base, Some(from), Some(to))
            .await?;
        debug!("Received {} days of rates", series.len());
        Ok(series)
    }
}
