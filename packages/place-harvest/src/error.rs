//! Typed errors for the harvest library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. Almost every variant here is
//! absorbed by the stage that produced it (a null field, a skipped page, a
//! partial token list); only setup failures reach the caller.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching a listing or place page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed (connection, TLS, body read)
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// The per-task deadline elapsed
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// The run was cancelled before the request completed
    #[error("cancelled: {url}")]
    Cancelled { url: String },

    /// Listing href that cannot be resolved against the site
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// URL has no `places/` segment to derive a slug from
    #[error("no place slug in URL: {url}")]
    MissingSlug { url: String },

    /// Listing page could not be interpreted
    #[error("malformed listing on page {page}: {reason}")]
    MalformedListing { page: u32, reason: String },

    /// Writing the fetched body failed
    #[error("failed to store {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a single field could not be extracted.
///
/// These never escape the extractor: each one turns into a null field.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// A CSS selector failed to compile
    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// A structural marker the field depends on is not present
    #[error("missing marker `{marker}`")]
    MissingMarker { marker: String },

    /// The marker is present but the markup has an unexpected shape
    #[error("unexpected shape for `{marker}`: {detail}")]
    ShapeMismatch { marker: String, detail: String },
}

/// Errors raised inside the text normalization pipeline.
#[derive(Debug, Error)]
pub enum NormalizationError {
    /// A numeric token that is not made of ASCII digits (e.g. `²`)
    #[error("cannot spell numeral `{0}`")]
    UnsupportedNumeral(String),

    /// A numeric token beyond the largest supported scale word
    #[error("number too large to spell: {digits} digits")]
    NumberTooLarge { digits: usize },
}

/// Errors reading or writing tab-separated tables.
#[derive(Debug, Error)]
pub enum TableError {
    /// Filesystem error
    #[error("table I/O on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Table has no header row
    #[error("table {path} is empty")]
    Empty { path: PathBuf },

    /// A designated column is absent from the header
    #[error("column `{column}` not found in {path}")]
    MissingColumn { column: String, path: PathBuf },
}

/// Top-level errors for batch stages (setup failures only).
#[derive(Debug, Error)]
pub enum HarvestError {
    /// Table read/write failed
    #[error("table error: {0}")]
    Table(#[from] TableError),

    /// Index or output artifact I/O failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing to a caller-supplied sink failed
    #[error("output write failed: {0}")]
    Sink(#[source] std::io::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

impl HarvestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for batch operations.
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for a single extraction rule.
pub type FieldResult<T> = std::result::Result<Option<T>, ExtractionError>;

/// Result type alias for table operations.
pub type TableResult<T> = std::result::Result<T, TableError>;
