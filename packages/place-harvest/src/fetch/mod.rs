//! Place page fetching and raw storage.
//!
//! Pages are stored at `<root>/page_<n>/<slug>.html`. A fetch never returns
//! an error: network failures, short bodies and storage failures are logged
//! and reported as a [`FetchOutcome`], and the batch moves on.

use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::HarvestConfig;
use crate::error::FetchError;
use crate::traits::fetcher::{fetch_with_deadline, Fetcher};
use crate::types::index::IndexEntry;
use crate::types::record::slug_from_url;
use crate::types::report::FetchReport;

/// What happened to one place fetch.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Body written to this path
    Stored(PathBuf),

    /// Body shorter than the minimum; nothing written
    ShortResponse { length: usize },

    /// Request, slug or storage failure; nothing written
    Failed(FetchError),
}

impl FetchOutcome {
    pub fn stored_path(&self) -> Option<&Path> {
        match self {
            Self::Stored(path) => Some(path),
            _ => None,
        }
    }
}

/// Storage location for a place page.
pub fn storage_path(root: &Path, page: u32, slug: &str) -> PathBuf {
    root.join(format!("page_{}", page)).join(format!("{}.html", slug))
}

/// Fetch one place page and store its body, at most once, without retry.
pub async fn fetch_page<F: Fetcher + ?Sized>(
    fetcher: &F,
    config: &HarvestConfig,
    url: &str,
    page: u32,
    root: &Path,
) -> FetchOutcome {
    let Some(slug) = slug_from_url(url) else {
        error!(page = page, url = %url, "No place slug in URL");
        return FetchOutcome::Failed(FetchError::MissingSlug {
            url: url.to_string(),
        });
    };

    let body = match fetch_with_deadline(fetcher, url, config.request_timeout()).await {
        Ok(body) => body,
        Err(e) => {
            error!(page = page, url = %url, error = %e, "Place request failed");
            return FetchOutcome::Failed(e);
        }
    };

    let length = body.chars().count();
    if length < config.min_body_length {
        warn!(page = page, url = %url, length = length, "Short response");
        debug!(url = %url, body = %body, "Short response body");
        return FetchOutcome::ShortResponse { length };
    }

    let path = storage_path(root, page, slug);
    if let Err(e) = store(&path, &body).await {
        error!(page = page, url = %url, error = %e, "Failed to store page");
        return FetchOutcome::Failed(e);
    }

    debug!(page = page, path = %path.display(), "Stored place page");
    FetchOutcome::Stored(path)
}

async fn store(path: &Path, body: &str) -> Result<(), FetchError> {
    let storage_err = |source| FetchError::Storage {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(storage_err)?;
    }
    tokio::fs::write(path, body).await.map_err(storage_err)
}

/// Fetch every indexed place with at most `config.concurrency` requests in
/// flight. Each fetch runs under its own deadline and stops early when
/// `cancel` fires; one place failing never affects another.
pub async fn fetch_places<F: Fetcher + ?Sized>(
    fetcher: &F,
    config: &HarvestConfig,
    entries: &[IndexEntry],
    root: &Path,
    cancel: &CancellationToken,
) -> FetchReport {
    info!(
        places = entries.len(),
        concurrency = config.concurrency,
        root = %root.display(),
        "Place fetch starting"
    );

    let outcomes: Vec<(&IndexEntry, FetchOutcome)> = stream::iter(entries)
        .map(|entry| async move {
            let outcome = if cancel.is_cancelled() {
                FetchOutcome::Failed(FetchError::Cancelled {
                    url: entry.url.clone(),
                })
            } else {
                tokio::select! {
                    _ = cancel.cancelled() => FetchOutcome::Failed(FetchError::Cancelled {
                        url: entry.url.clone(),
                    }),
                    outcome = fetch_page(fetcher, config, &entry.url, entry.page, root) => outcome,
                }
            };
            (entry, outcome)
        })
        .buffer_unordered(config.concurrency.max(1))
        .collect()
        .await;

    let mut report = FetchReport::default();
    for (entry, outcome) in outcomes {
        match outcome {
            FetchOutcome::Stored(path) => report.stored.push(path),
            FetchOutcome::ShortResponse { .. } => report.short_responses.push(entry.url.clone()),
            FetchOutcome::Failed(_) => report.failed_urls.push(entry.url.clone()),
        }
    }
    report.stored.sort();

    info!(
        stored = report.stored.len(),
        short = report.short_responses.len(),
        failed = report.failed_urls.len(),
        "Place fetch completed"
    );

    report
}
