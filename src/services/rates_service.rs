use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug)]
pub enum RatesError {
    Request(String),
    Api(String),
    Decode(String),
}

impl std::fmt::Display for RatesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RatesError::Request(err) => write!(f, "Request error: {}", err),
            RatesError::Api(err) => write!(f, "API error: {}", err),
            RatesError::Decode(err) => write!(f, "Decode error: {}", err),
        }
    }
}

impl std::error::Error for RatesError {}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    result: String,
    base_code: Option<String>,
    #[serde(default)]
    rates: BTreeMap<String, f64>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
}

/// Exchange rates relative to `base`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rates {
    pub base: String,
    pub rates: BTreeMap<String, f64>,
}

/// Three ASCII letters, returned upper-cased.
pub fn normalize_currency_code(code: &str) -> Option<String> {
    let code = code.trim();
    (code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()))
        .then(|| code.to_ascii_uppercase())
}

/// Proxy for an open exchange-rate API (`{base_url}/{BASE}`).
pub struct RatesService {
    client: reqwest::Client,
    base_url: String,
}

impl RatesService {
    pub fn new(base_url: &str) -> Result<Self, RatesError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| RatesError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn latest(&self, base: &str) -> Result<Rates, RatesError> {
        let url = format!("{}/{}", self.base_url, base);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RatesError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RatesError::Api(format!("Status: {}", response.status())));
        }

        let body: LatestRatesResponse = response
            .json()
            .await
            .map_err(|e| RatesError::Decode(e.to_string()))?;

        if body.result != "success" {
            return Err(RatesError::Api(
                body.error_type.unwrap_or_else(|| body.result.clone()),
            ));
        }

        Ok(Rates {
            base: body.base_code.unwrap_or_else(|| base.to_string()),
            rates: body.rates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_currency_code_normalization() {
        assert_eq!(normalize_currency_code(" usd "), Some("USD".to_string()));
        assert_eq!(normalize_currency_code("EURO"), None);
        assert_eq!(normalize_currency_code("U$D"), None);
        assert_eq!(normalize_currency_code(""), None);
    }

    #[actix_rt::test]
    async fn test_latest_rates() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/USD")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "result": "success",
                    "base_code": "USD",
                    "rates": { "USD": 1, "EUR": 0.92, "JPY": 151.3 }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let service = RatesService::new(&server.url()).unwrap();
        let rates = service.latest("USD").await.unwrap();

        mock.assert_async().await;
        assert_eq!(rates.base, "USD");
        assert_eq!(rates.rates.get("EUR"), Some(&0.92));
        assert_eq!(rates.rates.len(), 3);
    }

    #[actix_rt::test]
    async fn test_upstream_error_result() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/XYZ")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"result": "error", "error-type": "unsupported-code"}"#)
            .create_async()
            .await;

        let service = RatesService::new(&server.url()).unwrap();
        let result = service.latest("XYZ").await;

        match result {
            Err(RatesError::Api(message)) => assert_eq!(message, "unsupported-code"),
            other => panic!("expected API error, got {:?}", other),
        }
    }
}
