//! Index artifact entries: one discovered place per line.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::error::{HarvestError, Result};

/// One discovered place: the listing page it appeared on and its URL.
///
/// Rendered as `<page> <url>`. URLs are not escaped, so a URL containing a
/// space cannot be read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub page: u32,
    pub url: String,
}

impl IndexEntry {
    pub fn new(page: u32, url: impl Into<String>) -> Self {
        Self {
            page,
            url: url.into(),
        }
    }

    /// Parse one index line. Returns `None` for blank or malformed lines.
    pub fn parse(line: &str) -> Option<Self> {
        let (page, url) = line.trim_end_matches(['\r', '\n']).split_once(' ')?;
        let page = page.parse().ok()?;
        if url.is_empty() || url.contains(' ') {
            return None;
        }
        Some(Self::new(page, url))
    }
}

impl fmt::Display for IndexEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.page, self.url)
    }
}

/// Read an index artifact, skipping lines that do not parse.
pub fn read_index(path: &Path) -> Result<Vec<IndexEntry>> {
    let text = fs::read_to_string(path).map_err(|e| HarvestError::io(path, e))?;

    let mut entries = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match IndexEntry::parse(line) {
            Some(entry) => entries.push(entry),
            None => warn!(line = lineno + 1, content = %line, "Skipping malformed index line"),
        }
    }
    Ok(entries)
}
