//! Place Harvest Library
//!
//! Harvests place pages from a travel-curiosity site into a clean text
//! corpus: discover place URLs from the paginated listing, store each raw
//! page, extract a fixed set of fields from every page, merge the records
//! into one table and normalize its free-text columns.
//!
//! # Design Philosophy
//!
//! - Every unit of work fails alone: a page, a place, a field, a row
//! - Soft failures are logged where they happen and counted in a report
//! - Only setup errors (bad config, unreadable input, unwritable output)
//!   reach the caller
//!
//! # Usage
//!
//! ```rust,ignore
//! use place_harvest::{crawl_index_to_file, fetch_places, read_index, HarvestConfig, HttpFetcher};
//! use place_harvest::fetchers::FetcherExt;
//! use tokio_util::sync::CancellationToken;
//!
//! let config = HarvestConfig::from_env()?;
//! let fetcher = HttpFetcher::from_config(&config)?.rate_limited(config.requests_per_second);
//!
//! crawl_index_to_file(&fetcher, &config, 1..=20, &config.index_path(), false).await?;
//! let entries = read_index(&config.index_path())?;
//! let report = fetch_places(&fetcher, &config, &entries, &config.html_root(), &CancellationToken::new()).await;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - The `Fetcher` seam between stages and the network
//! - [`fetchers`] - HTTP, rate-limited and mock fetchers
//! - [`crawl`] - Listing crawl into the index artifact
//! - [`fetch`] - Place page fetching and raw storage
//! - [`extract`] - Per-field extraction into place records
//! - [`normalize`] - Text normalization into stemmed tokens
//! - [`pipeline`] - Merge and corpus preprocessing over tables
//! - [`tsv`] - Tab-separated table reading and writing

pub mod config;
pub mod crawl;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod fetchers;
pub mod normalize;
pub mod pipeline;
pub mod traits;
pub mod tsv;
pub mod types;

// Re-export core types at crate root
pub use config::HarvestConfig;
pub use crawl::{crawl_index, crawl_index_to_file, parse_listing};
pub use error::{ExtractionError, FetchError, HarvestError, NormalizationError, TableError};
pub use extract::{extract_directory, extract_file, extract_record};
pub use fetch::{fetch_page, fetch_places, storage_path, FetchOutcome};
pub use fetchers::{HttpFetcher, MockFetcher, RateLimitedFetcher};
pub use normalize::normalize;
pub use pipeline::{merge_tables, preprocess_corpus};
pub use traits::fetcher::Fetcher;
pub use types::{
    index::{read_index, IndexEntry},
    record::{PlaceRecord, FIELD_NAMES},
    report::{ExtractReport, FetchReport, IndexReport, MergeReport, PreprocessReport},
};
