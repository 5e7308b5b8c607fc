//! Stage reports.
//!
//! Soft failures are logged where they happen and also counted here, so a
//! caller can see what a run skipped without reading logs.

use serde::Serialize;
use std::path::PathBuf;

/// A listing page whose anchor count differed from the expected constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingAnomaly {
    pub page: u32,
    pub found: usize,
    pub expected: usize,
}

/// Result of a listing crawl.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IndexReport {
    /// Listing pages fetched and parsed
    pub pages_crawled: usize,

    /// Listing pages skipped after a request or parse failure
    pub failed_pages: Vec<u32>,

    /// Index lines written
    pub entries_written: usize,

    /// Pages with an unexpected anchor count
    pub anomalies: Vec<ListingAnomaly>,
}

/// Result of a place fetch batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FetchReport {
    /// Pages written to storage
    pub stored: Vec<PathBuf>,

    /// URLs whose body was below the minimum length
    pub short_responses: Vec<String>,

    /// URLs whose request failed, timed out or was cancelled
    pub failed_urls: Vec<String>,
}

impl FetchReport {
    /// Check if every place was stored.
    pub fn is_success(&self) -> bool {
        self.short_responses.is_empty() && self.failed_urls.is_empty()
    }
}

/// Result of extracting every stored page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractReport {
    /// Records extracted and exported
    pub records: usize,

    /// Total null fields across all records
    pub missing_fields: usize,

    /// Files that could not be read or exported
    pub failed_files: Vec<PathBuf>,
}

/// Result of merging per-place tables.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeReport {
    pub rows: usize,
    pub skipped_files: Vec<PathBuf>,
    pub output: PathBuf,
}

/// Result of preprocessing a merged table.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PreprocessReport {
    pub rows: usize,

    /// Rows too short to hold a designated column, passed through unchanged
    pub short_rows: usize,

    pub output: PathBuf,
}
