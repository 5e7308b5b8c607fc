//! Harvest configuration.
//!
//! Values come from defaults, then environment variables (a `.env` file is
//! honoured in development), then CLI overrides via the `with_*` builders.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{HarvestError, Result};

/// Site the listing and place pages are served from.
pub const DEFAULT_SITE: &str = "https://www.atlasobscura.com";

/// Listing sort order; fixed for reproducible page contents.
pub const LISTING_SORT: &str = "likes_count";

/// Number of place cards a full listing page carries.
pub const EXPECTED_ANCHORS_PER_PAGE: usize = 18;

/// Bodies shorter than this are treated as soft-404 / bot-block stubs.
pub const MIN_BODY_LENGTH: usize = 50;

/// Configuration shared by every harvest stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Base site URL, without trailing slash.
    pub site: String,

    /// Root directory for all artifacts.
    pub data_dir: PathBuf,

    /// Maximum requests in flight at once. 1 gives the sequential behaviour.
    pub concurrency: usize,

    /// Sustained requests per second allowed against one host.
    pub requests_per_second: u32,

    /// Per-request deadline in seconds.
    pub request_timeout_secs: u64,

    /// User agent sent with every request.
    pub user_agent: String,

    /// Expected place cards per listing page.
    #[serde(default = "default_expected_anchors")]
    pub expected_anchors: usize,

    /// Minimum body length for a page to be stored.
    #[serde(default = "default_min_body_length")]
    pub min_body_length: usize,
}

fn default_expected_anchors() -> usize {
    EXPECTED_ANCHORS_PER_PAGE
}

fn default_min_body_length() -> usize {
    MIN_BODY_LENGTH
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            site: DEFAULT_SITE.to_string(),
            data_dir: PathBuf::from("data"),
            concurrency: 4,
            requests_per_second: 2,
            request_timeout_secs: 30,
            user_agent: "Mozilla/5.0 (compatible; PlaceHarvest/0.1)".to_string(),
            expected_anchors: EXPECTED_ANCHORS_PER_PAGE,
            min_body_length: MIN_BODY_LENGTH,
        }
    }
}

impl HarvestConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        Self {
            site: env::var("HARVEST_SITE")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(defaults.site),
            data_dir: env::var("HARVEST_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            concurrency: parse_var("HARVEST_CONCURRENCY", defaults.concurrency)?,
            requests_per_second: parse_var(
                "HARVEST_REQUESTS_PER_SECOND",
                defaults.requests_per_second,
            )?,
            request_timeout_secs: parse_var(
                "HARVEST_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            )?,
            user_agent: env::var("HARVEST_USER_AGENT").unwrap_or(defaults.user_agent),
            expected_anchors: defaults.expected_anchors,
            min_body_length: defaults.min_body_length,
        }
        .validated()
    }

    /// Set the base site URL.
    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = site.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the data directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set concurrency.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the per-host request rate.
    pub fn with_requests_per_second(mut self, rps: u32) -> Self {
        self.requests_per_second = rps;
        self
    }

    /// Set the per-request deadline.
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Reject values the stages cannot run with.
    pub fn validated(self) -> Result<Self> {
        if self.concurrency == 0 {
            return Err(HarvestError::Config("concurrency must be > 0".into()));
        }
        if self.requests_per_second == 0 {
            return Err(HarvestError::Config(
                "requests_per_second must be > 0".into(),
            ));
        }
        if url::Url::parse(&self.site).is_err() {
            return Err(HarvestError::Config(format!("invalid site URL: {}", self.site)));
        }
        Ok(self)
    }

    /// Per-request deadline.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Listing URL for one page number.
    pub fn listing_url(&self, page: u32) -> String {
        format!("{}/places?page={}&sort={}", self.site, page, LISTING_SORT)
    }

    /// Canonical place URL for a slug.
    pub fn place_url(&self, slug: &str) -> String {
        format!("{}/places/{}", self.site, slug)
    }

    /// Default index artifact path.
    pub fn index_path(&self) -> PathBuf {
        self.data_dir.join("places.txt")
    }

    /// Default raw-page storage root.
    pub fn html_root(&self) -> PathBuf {
        self.data_dir.join("html")
    }

    /// Default per-place table directory.
    pub fn tables_dir(&self) -> PathBuf {
        self.data_dir.join("tables")
    }

    /// Default merged table path.
    pub fn merged_path(&self) -> PathBuf {
        self.data_dir.join("merged_places.tsv")
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| HarvestError::Config(format!("{} must be a valid number", name))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_url() {
        let config = HarvestConfig::new().with_site("https://example.com/");
        assert_eq!(
            config.listing_url(3),
            "https://example.com/places?page=3&sort=likes_count"
        );
    }

    #[test]
    fn test_place_url() {
        let config = HarvestConfig::new();
        assert_eq!(
            config.place_url("the-lost-city"),
            "https://www.atlasobscura.com/places/the-lost-city"
        );
    }

    #[test]
    fn test_validation_rejects_zero_concurrency() {
        let result = HarvestConfig::new().with_concurrency(0).validated();
        assert!(matches!(result, Err(HarvestError::Config(_))));
    }

    #[test]
    fn test_validation_rejects_bad_site() {
        let result = HarvestConfig::new().with_site("not a url").validated();
        assert!(result.is_err());
    }

    #[test]
    fn test_default_paths() {
        let config = HarvestConfig::new().with_data_dir("/tmp/harvest");
        assert_eq!(config.index_path(), PathBuf::from("/tmp/harvest/places.txt"));
        assert_eq!(config.html_root(), PathBuf::from("/tmp/harvest/html"));
        assert_eq!(
            config.merged_path(),
            PathBuf::from("/tmp/harvest/merged_places.tsv")
        );
    }
}
