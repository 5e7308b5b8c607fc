//! Mock fetcher for testing.
//!
//! Serves canned bodies by URL and records every call, so stages can be
//! exercised without a network.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::Fetcher;

#[derive(Debug, Clone)]
enum MockResponse {
    Body(String),
    Status(u16),
    NetworkError(String),
}

/// Mock fetcher for testing.
///
/// URLs with no canned response answer with HTTP 404.
///
/// # Example
///
/// ```rust
/// use place_harvest::fetchers::MockFetcher;
///
/// let mock = MockFetcher::new()
///     .with_page("https://example.com/places/a", "<html>...</html>")
///     .with_network_error("https://example.com/places/b", "connection reset");
/// ```
#[derive(Default, Clone)]
pub struct MockFetcher {
    responses: Arc<RwLock<HashMap<String, MockResponse>>>,
    calls: Arc<RwLock<Vec<String>>>,
    delay: Option<Duration>,
}

impl MockFetcher {
    /// Create a new empty mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    pub fn add_page(&self, url: impl Into<String>, body: impl Into<String>) {
        self.insert(url.into(), MockResponse::Body(body.into()));
    }

    /// Serve `body` for `url` (builder pattern).
    pub fn with_page(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.add_page(url, body);
        self
    }

    /// Answer `url` with a non-success status.
    pub fn with_status(self, url: impl Into<String>, status: u16) -> Self {
        self.insert(url.into(), MockResponse::Status(status));
        self
    }

    /// Fail `url` as if the connection broke.
    pub fn with_network_error(self, url: impl Into<String>, message: impl Into<String>) -> Self {
        self.insert(url.into(), MockResponse::NetworkError(message.into()));
        self
    }

    /// Sleep this long before answering every request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// URLs requested so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of requests made so far.
    pub fn call_count(&self) -> usize {
        self.calls.read().map(|c| c.len()).unwrap_or_default()
    }

    fn insert(&self, url: String, response: MockResponse) {
        if let Ok(mut responses) = self.responses.write() {
            responses.insert(url, response);
        }
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        if let Ok(mut calls) = self.calls.write() {
            calls.push(url.to_string());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let response = self
            .responses
            .read()
            .ok()
            .and_then(|r| r.get(url).cloned());

        match response {
            Some(MockResponse::Body(body)) => Ok(body),
            Some(MockResponse::Status(status)) => Err(FetchError::Status {
                status,
                url: url.to_string(),
            }),
            Some(MockResponse::NetworkError(message)) => Err(FetchError::Http(message.into())),
            None => Err(FetchError::Status {
                status: 404,
                url: url.to_string(),
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serves_canned_pages() {
        let mock = MockFetcher::new().with_page("https://example.com/a", "hello");
        assert_eq!(mock.fetch("https://example.com/a").await.unwrap(), "hello");
        assert_eq!(mock.calls(), vec!["https://example.com/a".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_url_is_404() {
        let mock = MockFetcher::new();
        let err = mock.fetch("https://example.com/missing").await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_network_error() {
        let mock = MockFetcher::new().with_network_error("https://example.com/a", "reset");
        let err = mock.fetch("https://example.com/a").await.unwrap_err();
        assert!(matches!(err, FetchError::Http(_)));
        assert_eq!(mock.call_count(), 1);
    }
}
