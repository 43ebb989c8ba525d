//! EFA HTTP client.
//!
//! Posts form-encoded parameters to the provider's search endpoint and hands
//! back the raw body. Trip searches answer in HTML, autocomplete in JSON;
//! interpreting either is left to the caller.

use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::TransportParams;

use super::error::EfaError;
use super::transport::Transport;

/// Default search endpoint.
const DEFAULT_BASE_URL: &str = "http://info.kvv.de/index.php";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Default number of retries after a network failure.
const DEFAULT_RETRIES: u32 = 10;

/// Name of the cache-busting parameter.
const CACHE_BUSTER_KEY: &str = "_";

/// Configuration for the EFA client.
#[derive(Debug, Clone)]
pub struct EfaConfig {
    /// Search endpoint URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Retries after a connect or timeout failure
    pub retries: u32,
}

impl EfaConfig {
    /// Create a config pointing at the public endpoint.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retries: DEFAULT_RETRIES,
        }
    }

    /// Set a custom endpoint (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the number of retries.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }
}

impl Default for EfaConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// EFA search endpoint client.
#[derive(Debug, Clone)]
pub struct EfaClient {
    http: reqwest::Client,
    base_url: String,
    retries: u32,
}

impl EfaClient {
    /// Create a new client with the given configuration.
    pub fn new(config: EfaConfig) -> Result<Self, EfaError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            retries: config.retries,
        })
    }

    /// Post the parameters, retrying connect failures and timeouts.
    ///
    /// Non-success statuses are not retried.
    pub async fn post(&self, params: &TransportParams) -> Result<String, EfaError> {
        let mut attempt = 0;

        loop {
            match self.post_once(params).await {
                Err(EfaError::Http(e))
                    if attempt < self.retries && (e.is_connect() || e.is_timeout()) =>
                {
                    attempt += 1;
                    warn!(attempt, retries = self.retries, error = %e, "Retrying EFA request");
                }
                result => return result,
            }
        }
    }

    async fn post_once(&self, params: &TransportParams) -> Result<String, EfaError> {
        let cache_buster: u32 = rand::random();

        let mut form: Vec<(&str, String)> = params
            .iter()
            .map(|(key, value)| (*key, value.clone()))
            .collect();
        form.push((CACHE_BUSTER_KEY, cache_buster.to_string()));

        debug!(url = %self.base_url, fields = form.len(), "Posting EFA request");

        let response = self.http.post(&self.base_url).form(&form).send().await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EfaError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?)
    }
}

impl Transport for EfaClient {
    async fn submit(&self, params: &TransportParams) -> Result<String, EfaError> {
        self.post(params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = EfaConfig::new()
            .with_base_url("http://localhost:8080/index.php")
            .with_timeout(5)
            .with_retries(2);

        assert_eq!(config.base_url, "http://localhost:8080/index.php");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.retries, 2);
    }

    #[test]
    fn config_defaults() {
        let config = EfaConfig::default();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 20);
        assert_eq!(config.retries, 10);
    }

    #[test]
    fn client_creation() {
        let client = EfaClient::new(EfaConfig::new());
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        let config = EfaConfig::new()
            .with_base_url("http://127.0.0.1:9/index.php")
            .with_timeout(1)
            .with_retries(0);
        let client = EfaClient::new(config).unwrap();

        let err = client.submit(&TransportParams::new()).await.unwrap_err();
        assert!(err.is_transport());
    }
}
