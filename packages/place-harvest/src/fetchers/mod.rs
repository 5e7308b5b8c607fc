//! Fetcher implementations.
//!
//! - `HttpFetcher` - one GET per call via reqwest
//! - `RateLimitedFetcher` - wrapper that throttles requests per host
//! - `MockFetcher` - canned bodies for tests

mod http;
mod mock;
mod rate_limited;

pub use http::HttpFetcher;
pub use mock::MockFetcher;
pub use rate_limited::{FetcherExt, RateLimitedFetcher};

// Re-export from traits for convenience
pub use crate::traits::fetcher::Fetcher;
