//! Carrier rate API client.
//!
//! `CarrierClient` is the seam the orchestration talks through; production
//! code uses `ShipEngineClient`, tests substitute a fake. The client is
//! built once and passed by reference afterwards.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{RateError, Result};
use crate::rates::{RateApiResponse, RateRequest, RateResponseBody};

/// One logical operation: submit a rate request, receive the quoted rates.
#[async_trait]
pub trait CarrierClient: Send + Sync {
    async fn get_rates(&self, request: &RateRequest) -> Result<RateResponseBody>;
}

/// Connection settings for a ShipEngine-compatible rate API.
#[derive(Clone, Debug)]
pub struct ShipEngineConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl ShipEngineConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.shipengine.com";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Points the client at a different endpoint (test servers, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

fn user_agent() -> String {
    format!("packrate/{}", env!("CARGO_PKG_VERSION"))
}

/// Production client for the carrier rate API.
pub struct ShipEngineClient {
    http: reqwest::Client,
    config: ShipEngineConfig,
}

impl ShipEngineClient {
    pub fn new(config: ShipEngineConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(RateError::Config {
                message: "carrier API key is empty".to_string(),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(user_agent())
            .build()?;

        Ok(Self { http, config })
    }

    fn rates_endpoint(&self) -> String {
        format!("{}/v1/rates", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CarrierClient for ShipEngineClient {
    async fn get_rates(&self, request: &RateRequest) -> Result<RateResponseBody> {
        let response = self
            .http
            .post(self.rates_endpoint())
            .header("API-Key", &self.config.api_key)
            .json(request)
            .send()
            .await?
            .error_for_status()?;

        let envelope: RateApiResponse = response.json().await?;
        Ok(envelope.rate_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_key_is_a_config_error() {
        let result = ShipEngineClient::new(ShipEngineConfig::new("  "));
        assert!(matches!(result, Err(RateError::Config { .. })));
    }

    #[test]
    fn rates_endpoint_tolerates_trailing_slash() {
        let client = ShipEngineClient::new(
            ShipEngineConfig::new("test-key").with_base_url("http://localhost:9999/"),
        )
        .unwrap();
        assert_eq!(client.rates_endpoint(), "http://localhost:9999/v1/rates");
    }
}
