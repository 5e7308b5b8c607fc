//! Command-line driver for the harvest stages.
//!
//! Each subcommand runs one stage with artifact paths defaulting to the
//! configured data directory. Reports go to stdout, as JSON with `--json`.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use place_harvest::fetchers::FetcherExt;
use place_harvest::{
    crawl_index_to_file, extract_directory, fetch_places, merge_tables, normalize,
    preprocess_corpus, read_index, HarvestConfig, HttpFetcher, RateLimitedFetcher,
};

#[derive(Parser)]
#[command(name = "harvest")]
#[command(about = "Harvest place pages into a normalized text corpus")]
struct Cli {
    /// Base site URL
    #[arg(long, global = true)]
    site: Option<String>,

    /// Root directory for artifacts
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Maximum requests in flight
    #[arg(long, global = true)]
    concurrency: Option<usize>,

    /// Requests per second against one host
    #[arg(long, global = true)]
    rps: Option<u32>,

    /// Per-request deadline in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Print reports as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl listing pages into the index file
    Crawl {
        /// Pages to crawl, e.g. `1-20` or `1,3,5-7`
        #[arg(long, default_value = "1")]
        pages: String,

        /// Index file to write
        #[arg(long)]
        out: Option<PathBuf>,

        /// Keep existing index lines
        #[arg(long)]
        append: bool,
    },

    /// Fetch and store every indexed place page
    Fetch {
        #[arg(long)]
        index: Option<PathBuf>,

        /// Raw page storage root
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Extract one table per stored place page
    Extract {
        #[arg(long)]
        root: Option<PathBuf>,

        /// Output directory for per-place tables
        #[arg(long)]
        tables: Option<PathBuf>,
    },

    /// Merge per-place tables into one table
    Merge {
        #[arg(long)]
        tables: Option<PathBuf>,

        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Normalize the name and description columns of a merged table
    Preprocess {
        #[arg(long)]
        input: Option<PathBuf>,

        /// Defaults to `processed_<input>` beside the input
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the normalized tokens of a text
    Normalize { text: String },
}

impl Cli {
    fn config(&self) -> Result<HarvestConfig> {
        let mut config = HarvestConfig::from_env().context("Failed to load configuration")?;

        if let Some(site) = &self.site {
            config = config.with_site(site.as_str());
        }
        if let Some(dir) = &self.data_dir {
            config = config.with_data_dir(dir);
        }
        if let Some(concurrency) = self.concurrency {
            config = config.with_concurrency(concurrency);
        }
        if let Some(rps) = self.rps {
            config = config.with_requests_per_second(rps);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_request_timeout_secs(secs);
        }

        config.validated().context("Invalid configuration")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,place_harvest=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;

    match &cli.command {
        Commands::Crawl { pages, out, append } => {
            let pages = parse_pages(pages)?;
            let out = out.clone().unwrap_or_else(|| config.index_path());
            let fetcher = http_fetcher(&config)?;

            let report = crawl_index_to_file(&fetcher, &config, pages, &out, *append)
                .await
                .with_context(|| format!("Failed to crawl into {}", out.display()))?;

            print_report(cli.json, &report, || {
                format!(
                    "Crawled {} pages ({} failed), wrote {} entries to {}",
                    report.pages_crawled,
                    report.failed_pages.len(),
                    report.entries_written,
                    out.display()
                )
            })
        }

        Commands::Fetch { index, root } => {
            let index = index.clone().unwrap_or_else(|| config.index_path());
            let root = root.clone().unwrap_or_else(|| config.html_root());
            let entries = read_index(&index)
                .with_context(|| format!("Failed to read index {}", index.display()))?;
            let fetcher = http_fetcher(&config)?;

            let cancel = CancellationToken::new();
            let on_signal = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("Interrupted, cancelling outstanding fetches");
                    on_signal.cancel();
                }
            });

            let report = fetch_places(&fetcher, &config, &entries, &root, &cancel).await;

            print_report(cli.json, &report, || {
                format!(
                    "Stored {} pages under {} ({} short, {} failed)",
                    report.stored.len(),
                    root.display(),
                    report.short_responses.len(),
                    report.failed_urls.len()
                )
            })
        }

        Commands::Extract { root, tables } => {
            let root = root.clone().unwrap_or_else(|| config.html_root());
            let tables = tables.clone().unwrap_or_else(|| config.tables_dir());

            let report = extract_directory(&root, &tables, &config.site)
                .with_context(|| format!("Failed to extract pages under {}", root.display()))?;

            print_report(cli.json, &report, || {
                format!(
                    "Extracted {} records into {} ({} null fields, {} failed files)",
                    report.records,
                    tables.display(),
                    report.missing_fields,
                    report.failed_files.len()
                )
            })
        }

        Commands::Merge { tables, out } => {
            let tables = tables.clone().unwrap_or_else(|| config.tables_dir());
            let out = out.clone().unwrap_or_else(|| config.merged_path());

            let report = merge_tables(&tables, &out)
                .with_context(|| format!("Failed to merge tables in {}", tables.display()))?;

            print_report(cli.json, &report, || {
                format!(
                    "Merged {} rows into {} ({} tables skipped)",
                    report.rows,
                    report.output.display(),
                    report.skipped_files.len()
                )
            })
        }

        Commands::Preprocess { input, out } => {
            let input = input.clone().unwrap_or_else(|| config.merged_path());

            let report = preprocess_corpus(&input, out.as_deref())
                .with_context(|| format!("Failed to preprocess {}", input.display()))?;

            print_report(cli.json, &report, || {
                format!(
                    "Preprocessed {} rows into {} ({} passed through)",
                    report.rows,
                    report.output.display(),
                    report.short_rows
                )
            })
        }

        Commands::Normalize { text } => {
            let tokens = normalize(Some(text.as_str()));
            print_report(cli.json, &tokens, || tokens.join(" "))
        }
    }
}

fn http_fetcher(config: &HarvestConfig) -> Result<RateLimitedFetcher<HttpFetcher>> {
    let fetcher = HttpFetcher::from_config(config).context("Failed to build HTTP client")?;
    Ok(fetcher.rate_limited(config.requests_per_second))
}

fn print_report<T: Serialize>(json: bool, report: &T, summary: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}", summary());
    }
    Ok(())
}

/// Parse a page list such as `1-20` or `1,3,5-7`.
fn parse_pages(list: &str) -> Result<Vec<u32>> {
    let mut pages = Vec::new();
    for part in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.split_once('-') {
            Some((start, end)) => {
                let start: u32 = start.trim().parse().with_context(|| format!("Bad page range: {}", part))?;
                let end: u32 = end.trim().parse().with_context(|| format!("Bad page range: {}", part))?;
                if start == 0 || end < start {
                    bail!("Bad page range: {}", part);
                }
                pages.extend(start..=end);
            }
            None => {
                let page: u32 = part.parse().with_context(|| format!("Bad page number: {}", part))?;
                if page == 0 {
                    bail!("Page numbers start at 1");
                }
                pages.push(page);
            }
        }
    }
    if pages.is_empty() {
        bail!("No pages given");
    }
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pages() {
        assert_eq!(parse_pages("1-3").unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_pages("1,3,5-6").unwrap(), vec![1, 3, 5, 6]);
        assert_eq!(parse_pages(" 7 ").unwrap(), vec![7]);
    }

    #[test]
    fn test_parse_pages_rejects_bad_input() {
        assert!(parse_pages("").is_err());
        assert!(parse_pages("0").is_err());
        assert!(parse_pages("5-2").is_err());
        assert!(parse_pages("a-b").is_err());
    }

    #[test]
    fn test_cli_parses_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["harvest", "crawl", "--pages", "1-2", "--concurrency", "1", "--json"]);
        assert_eq!(cli.concurrency, Some(1));
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Crawl { append: false, .. }));
    }
}
