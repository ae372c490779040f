use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::core::currency::RateProvider;
use crate::providers::util::with_retry;

/// Rate provider backed by the exchangerate-api.com service.
pub struct ExchangeRateApiProvider {
    base_url: String,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str) -> Self {
        ExchangeRateApiProvider {
            base_url: base_url.to_string(),
        }
    }
}

// The service has shipped two response shapes over time: v6 uses
// "conversion_rates", v4 plain "rates". Accept either.
#[derive(Debug, Deserialize)]
struct ExchangeRateResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    conversion_rates: Option<HashMap<String, f64>>,
    #[serde(default)]
    rates: Option<HashMap<String, f64>>,
}

impl ExchangeRateResponse {
    fn effective_rates(self) -> Option<HashMap<String, f64>> {
        self.conversion_rates.or(self.rates)
    }
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    #[instrument(
        name = "RateFetch",
        skip(self),
        fields(base = %base)
    )]
    async fn fetch_rates(&self, base: &str) -> Result<HashMap<String, f64>> {
        let url = format!("{}/v4/latest/{}", self.base_url, base);
        debug!("Requesting exchange rates from {}", url);

        let client = reqwest::Client::builder().user_agent("wayplan/1.0").build()?;
        let response = with_retry(|| client.get(&url).send(), 2, 500)
            .await
            .map_err(|e| anyhow!("Request error: {} for base currency: {}", e, base))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for base currency: {}",
                response.status(),
                base
            ));
        }

        let text = response.text().await?;
        let data: ExchangeRateResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse rates response for {}: {}", base, e))?;

        if let Some(result) = &data.result {
            if result != "success" {
                return Err(anyhow!(
                    "Provider reported {} for base currency: {}",
                    result,
                    base
                ));
            }
        }

        data.effective_rates()
            .filter(|rates| !rates.is_empty())
            .ok_or_else(|| anyhow!("No rates found for base currency: {}", base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(base: &str, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        let request_path = format!("/v4/latest/{base}");

        Mock::given(method("GET"))
            .and(path(request_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_rate_fetch() {
        let mock_response = r#"{
            "base": "USD",
            "rates": {
                "EUR": 0.92,
                "GBP": 0.79
            }
        }"#;

        let mock_server = create_mock_server("USD", mock_response).await;
        let provider = ExchangeRateApiProvider::new(&mock_server.uri());

        let rates = provider.fetch_rates("USD").await.unwrap();
        assert_eq!(rates.len(), 2);
        assert_eq!(rates["EUR"], 0.92);
        assert_eq!(rates["GBP"], 0.79);
    }

    #[tokio::test]
    async fn test_v6_response_shape_is_accepted() {
        let mock_response = r#"{
            "result": "success",
            "base_code": "USD",
            "conversion_rates": {
                "EUR": 0.92
            }
        }"#;

        let mock_server = create_mock_server("USD", mock_response).await;
        let provider = ExchangeRateApiProvider::new(&mock_server.uri());

        let rates = provider.fetch_rates("USD").await.unwrap();
        assert_eq!(rates["EUR"], 0.92);
    }

    #[tokio::test]
    async fn test_provider_error_result_is_surfaced() {
        let mock_response = r#"{
            "result": "error",
            "rates": {"EUR": 0.92}
        }"#;

        let mock_server = create_mock_server("USD", mock_response).await;
        let provider = ExchangeRateApiProvider::new(&mock_server.uri());

        let result = provider.fetch_rates("USD").await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "Provider reported error for base currency: USD"
        );
    }

    #[tokio::test]
    async fn test_empty_rate_table_is_an_error() {
        let mock_response = r#"{"base": "USD", "rates": {}}"#;

        let mock_server = create_mock_server("USD", mock_response).await;
        let provider = ExchangeRateApiProvider::new(&mock_server.uri());

        let result = provider.fetch_rates("USD").await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "No rates found for base currency: USD"
        );
    }

    #[tokio::test]
    async fn test_http_error_response() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/latest/USD"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let provider = ExchangeRateApiProvider::new(&mock_server.uri());
        let result = provider.fetch_rates("USD").await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 500 Internal Server Error for base currency: USD"
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_response = r#"{"rates": "not-a-map"}"#;

        let mock_server = create_mock_server("USD", mock_response).await;
        let provider = ExchangeRateApiProvider::new(&mock_server.uri());

        let result = provider.fetch_rates("USD").await;
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse rates response for USD")
        );
    }
}
