//! Fetcher trait for pluggable page retrieval.
//!
//! The listing crawler and the place fetcher only ever need "give me the body
//! behind this URL". Keeping that behind a trait lets the stages run against
//! the network (`HttpFetcher`), a throttled network (`RateLimitedFetcher`), or
//! canned pages in tests (`MockFetcher`).
//!
//! # Usage
//!
//! ```rust,ignore
//! use place_harvest::{Fetcher, HttpFetcher, RateLimitedFetcher};
//!
//! let fetcher = RateLimitedFetcher::new(HttpFetcher::new()?, 2);
//! let html = fetcher.fetch("https://www.atlasobscura.com/places/the-lost-city").await?;
//! ```

use async_trait::async_trait;

use crate::error::FetchResult;

/// Retrieve the raw body behind a URL.
///
/// Implementations make exactly one attempt and never retry.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch one URL and return the full response body.
    ///
    /// Non-success statuses are errors. Body length is not checked here;
    /// callers decide what counts as a usable page.
    async fn fetch(&self, url: &str) -> FetchResult<String>;

    /// Get the fetcher name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for std::sync::Arc<F> {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        (**self).fetch(url).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Fetch under a deadline, mapping an elapsed deadline to `FetchError::Timeout`.
pub async fn fetch_with_deadline<F: Fetcher + ?Sized>(
    fetcher: &F,
    url: &str,
    deadline: std::time::Duration,
) -> FetchResult<String> {
    match tokio::time::timeout(deadline, fetcher.fetch(url)).await {
        Ok(result) => result,
        Err(_) => Err(crate::error::FetchError::Timeout {
            url: url.to_string(),
        }),
    }
}
