use async_trait::async_trait;
use converter_config::RateSettings;
use converter_core::{ConverterError, Currency, RateSource, RateTable, Result};
use std::time::Duration;
use tracing::{debug, info};

/// HTTP client for an exchangerate-api style service:
/// `GET {base_url}/{CODE}` answers with `{"rates": {"EUR": 0.92, ...}}`.
pub struct ExchangeRateClient {
    client: reqwest::Client,
    base_url: String,
}

impl std::fmt::Debug for ExchangeRateClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeRateClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ExchangeRateClient {
    pub fn new(settings: &RateSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()
            .map_err(|e| ConverterError::RateService(format!("Failed to build HTTP client: {}", e)))?;

        info!("Exchange rates from {}", settings.base_url);
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn latest_url(&self, base: Currency) -> String {
        format!("{}/{}", self.base_url, base.code())
    }
}

#[async_trait]
impl RateSource for ExchangeRateClient {
    async fn latest_rates(&self, base: Currency) -> Result<RateTable> {
        let url = self.latest_url(base);
        debug!("Fetching rates: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ConverterError::RateService(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ConverterError::RateService(format!("HTTP {}", response.status())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ConverterError::RateService(e.to_string()))?;

        parse_rates(&body)
    }
}

pub fn parse_rates(body: &str) -> Result<RateTable> {
    serde_json::from_str(body)
        .map_err(|e| ConverterError::RateService(format!("Failed to parse rates: {}", e)))
}
