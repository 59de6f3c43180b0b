use anyhow::{Context, Result, anyhow, bail};
use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

#[derive(Deserialize, Debug)]
struct LookupResponse {
    location: Location,
}

#[derive(Deserialize, Debug)]
struct Location {
    country: Country,
}

#[derive(Deserialize, Debug)]
struct Country {
    name: String,
}

/// Looks up the caller's country through the ipregistry.co API.
pub struct CountryLocator {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl CountryLocator {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("curconv/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(CountryLocator {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    pub async fn country_name(&self) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            anyhow!("No API key configured for the country lookup (set IPREGISTRY_API_KEY)")
        })?;

        let mut url = Url::parse(&format!("{}/", self.base_url))
            .with_context(|| format!("Invalid provider URL: {}", self.base_url))?;
        url.query_pairs_mut()
            .append_pair("key", api_key)
            .append_pair("fields", "location.country");
        debug!("Requesting country from {}", self.base_url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send country lookup request")?;

        if !response.status().is_success() {
            bail!("HTTP error: {} for country lookup", response.status());
        }

        let lookup: LookupResponse = response
            .json()
            .await
            .context("Failed to parse country lookup response")?;
        Ok(lookup.location.country.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_successful_lookup() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("key", "ip-key"))
            .and(query_param("fields", "location.country"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"location": {"country": {"code": "NZ", "name": "New Zealand"}}}"#,
            ))
            .mount(&mock_server)
            .await;

        let locator = CountryLocator::new(&mock_server.uri(), Some("ip-key".to_string())).unwrap();
        assert_eq!(locator.country_name().await.unwrap(), "New Zealand");
    }

    #[tokio::test]
    async fn test_lookup_error_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;

        let locator = CountryLocator::new(&mock_server.uri(), Some("bad".to_string())).unwrap();
        let err = locator.country_name().await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP error: 403 Forbidden for country lookup");
    }

    #[tokio::test]
    async fn test_lookup_requires_key() {
        let locator = CountryLocator::new("http://localhost", None).unwrap();
        assert!(locator.country_name().await.is_err());
    }
}
