//! HTTP-based fetcher implementation.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::HarvestConfig;
use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::Fetcher;

/// Fetcher that issues one plain GET per call.
///
/// # Example
///
/// ```rust,ignore
/// use place_harvest::{HarvestConfig, HttpFetcher};
///
/// let fetcher = HttpFetcher::from_config(&HarvestConfig::new())?;
/// let body = fetcher.fetch("https://example.com").await?;
/// ```
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with default timeout and user agent.
    pub fn new() -> FetchResult<Self> {
        Self::from_config(&HarvestConfig::default())
    }

    /// Create a fetcher using the timeout and user agent from `config`.
    pub fn from_config(config: &HarvestConfig) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| FetchError::Http(Box::new(e)))?;

        Ok(Self { client })
    }

    /// Set a custom HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        debug!(url = %url, "HTTP fetch starting");

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "HTTP request failed");
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Http(Box::new(e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Http(Box::new(e)))?;

        debug!(url = %url, content_length = body.len(), "Page fetched");
        Ok(body)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_from_config() {
        let config = HarvestConfig::new()
            .with_user_agent("test-agent")
            .with_request_timeout_secs(5);
        let fetcher = HttpFetcher::from_config(&config).unwrap();
        assert_eq!(fetcher.name(), "http");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_an_error() {
        let config = HarvestConfig::new().with_request_timeout_secs(2);
        let fetcher = HttpFetcher::from_config(&config).unwrap();

        // Port 9 (discard) on localhost is closed in test environments.
        let result = fetcher.fetch("http://127.0.0.1:9/places").await;
        assert!(result.is_err());
    }
}
