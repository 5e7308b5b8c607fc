//! Core trait abstractions.
//!
//! - [`fetcher::Fetcher`] - retrieve the raw body behind a URL

pub mod fetcher;
