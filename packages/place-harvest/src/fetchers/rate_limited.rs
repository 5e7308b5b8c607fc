//! Rate-limited fetcher wrapper.
//!
//! Wraps any Fetcher with a per-host rate limit using the governor crate.
//! Requests to different hosts do not wait on each other.

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

use crate::error::FetchResult;
use crate::traits::fetcher::Fetcher;

type HostRateLimiter = RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// A fetcher wrapper that enforces a request rate per host.
pub struct RateLimitedFetcher<F: Fetcher> {
    inner: F,
    limiter: Arc<HostRateLimiter>,
}

impl<F: Fetcher> RateLimitedFetcher<F> {
    /// Create a new rate-limited fetcher.
    ///
    /// # Arguments
    /// * `fetcher` - The underlying fetcher to wrap
    /// * `requests_per_second` - Maximum requests per second per host (0 is treated as 1)
    pub fn new(fetcher: F, requests_per_second: u32) -> Self {
        let quota = Quota::per_second(
            NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN),
        );
        Self::with_quota(fetcher, quota)
    }

    /// Create with a custom quota.
    pub fn with_quota(fetcher: F, quota: Quota) -> Self {
        Self {
            inner: fetcher,
            limiter: Arc::new(RateLimiter::keyed(quota)),
        }
    }

    /// Access the wrapped fetcher.
    pub fn inner(&self) -> &F {
        &self.inner
    }

    async fn wait_for_permit(&self, url: &str) {
        self.limiter.until_key_ready(&host_key(url)).await;
    }
}

/// Rate-limit key for a URL: its host, or the raw string when unparsable.
fn host_key(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string())
}

#[async_trait]
impl<F: Fetcher> Fetcher for RateLimitedFetcher<F> {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        self.wait_for_permit(url).await;
        self.inner.fetch(url).await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Extension trait for easy rate limiting.
pub trait FetcherExt: Fetcher + Sized {
    /// Wrap this fetcher with a per-host rate limit.
    fn rate_limited(self, requests_per_second: u32) -> RateLimitedFetcher<Self> {
        RateLimitedFetcher::new(self, requests_per_second)
    }
}

impl<F: Fetcher + Sized> FetcherExt for F {}
