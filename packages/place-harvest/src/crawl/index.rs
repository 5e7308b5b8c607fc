//! Index crawl - paginate the listing and write one line per place.

use futures::stream::{self, StreamExt};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{error, info, warn};
use url::Url;

use super::listing::parse_listing;
use crate::config::HarvestConfig;
use crate::error::{FetchResult, HarvestError, Result};
use crate::traits::fetcher::{fetch_with_deadline, Fetcher};
use crate::types::index::IndexEntry;
use crate::types::report::{IndexReport, ListingAnomaly};

/// Crawl the given listing pages and append `<page> <url>` lines to `out`.
///
/// Up to `config.concurrency` listing requests are in flight at once, but
/// results are consumed in page order so `out` only ever has one writer and
/// lines land in crawl order. A page that fails is logged and skipped; an
/// unexpected anchor count is logged and its anchors are still written.
pub async fn crawl_index<F, W, I>(
    fetcher: &F,
    config: &HarvestConfig,
    pages: I,
    out: &mut W,
) -> Result<IndexReport>
where
    F: Fetcher + ?Sized,
    W: Write,
    I: IntoIterator<Item = u32>,
{
    let site = Url::parse(&config.site)
        .map_err(|_| HarvestError::Config(format!("invalid site URL: {}", config.site)))?;

    info!(site = %config.site, concurrency = config.concurrency, "Index crawl starting");

    let mut report = IndexReport::default();
    let site_ref = &site;

    let mut results = stream::iter(pages)
        .map(|page| async move { (page, crawl_listing_page(fetcher, config, site_ref, page).await) })
        .buffered(config.concurrency.max(1));

    while let Some((page, result)) = results.next().await {
        let urls = match result {
            Ok(urls) => urls,
            Err(e) => {
                error!(page = page, error = %e, "Listing request failed");
                report.failed_pages.push(page);
                continue;
            }
        };

        report.pages_crawled += 1;

        if urls.len() != config.expected_anchors {
            warn!(
                page = page,
                found = urls.len(),
                expected = config.expected_anchors,
                "Unexpected number of places on listing page"
            );
            report.anomalies.push(ListingAnomaly {
                page,
                found: urls.len(),
                expected: config.expected_anchors,
            });
        }

        for url in urls {
            writeln!(out, "{}", IndexEntry::new(page, url)).map_err(HarvestError::Sink)?;
            report.entries_written += 1;
        }
    }

    out.flush().map_err(HarvestError::Sink)?;

    info!(
        pages_crawled = report.pages_crawled,
        pages_failed = report.failed_pages.len(),
        entries = report.entries_written,
        anomalies = report.anomalies.len(),
        "Index crawl completed"
    );

    Ok(report)
}

/// Crawl into an index file. `append` keeps existing lines; otherwise the
/// file is truncated first.
pub async fn crawl_index_to_file<F, I>(
    fetcher: &F,
    config: &HarvestConfig,
    pages: I,
    path: &Path,
    append: bool,
) -> Result<IndexReport>
where
    F: Fetcher + ?Sized,
    I: IntoIterator<Item = u32>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| HarvestError::io(parent, e))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)
        .map_err(|e| HarvestError::io(path, e))?;

    let mut out = BufWriter::new(file);
    crawl_index(fetcher, config, pages, &mut out).await
}

async fn crawl_listing_page<F: Fetcher + ?Sized>(
    fetcher: &F,
    config: &HarvestConfig,
    site: &Url,
    page: u32,
) -> FetchResult<Vec<String>> {
    let url = config.listing_url(page);
    let html = fetch_with_deadline(fetcher, &url, config.request_timeout()).await?;
    parse_listing(&html, page, site)
}
