//! Tab-separated tables.
//!
//! Cells holding a tab, a quote or a line break are quoted with doubled inner
//! quotes; everything else is written verbatim. The reader accepts the same
//! convention plus CRLF line endings.

use std::fs;
use std::io::{self, Write};
use std::mem::take;
use std::path::{Path, PathBuf};

use crate::error::{TableError, TableResult};

pub const SEP: char = '\t';

/* ---------------- Cell rendering ---------------- */

/// Render a list the way the merged tables have always stored list columns:
/// `['a', 'b']`, each item quoted like a literal string.
pub fn render_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let rendered: Vec<String> = items.into_iter().map(|s| quote_item(s.as_ref())).collect();
    format!("[{}]", rendered.join(", "))
}

fn quote_item(item: &str) -> String {
    // Single quotes unless the item contains one and no double quote.
    let quote = if item.contains('\'') && !item.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(item.len() + 2);
    out.push(quote);
    for ch in item.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Null renders as an empty cell.
pub fn render_optional(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str) -> bool {
    field.contains(SEP) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[String]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, "{}", SEP)?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/* ---------------- Parsing ---------------- */

/// Minimal TSV parser (quotes + CRLF tolerant).
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut field = String::new();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if matches!(chars.peek(), Some('"')) {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            c if c == SEP && !in_quotes => row.push(take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) {
                    chars.next();
                }
                row.push(take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    // Flush a trailing row without a final newline.
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

/* ---------------- Tables ---------------- */

/// A header row plus data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Parse table text; the first row is the header.
    pub fn parse(text: &str) -> Option<Self> {
        let mut rows = parse_rows(text);
        if rows.is_empty() {
            return None;
        }
        let headers = rows.remove(0);
        Some(Self { headers, rows })
    }

    /// Read a table from disk.
    pub fn read(path: &Path) -> TableResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).ok_or_else(|| TableError::Empty {
            path: path.to_path_buf(),
        })
    }

    /// Write the table to disk, creating parent directories.
    pub fn write(&self, path: &Path) -> TableResult<()> {
        let io_err = |source| TableError::Io {
            path: PathBuf::from(path),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let mut buf = Vec::new();
        self.write_to(&mut buf).map_err(io_err)?;
        fs::write(path, buf).map_err(io_err)
    }

    /// Serialize the table to any writer.
    pub fn write_to<W: Write>(&self, mut w: W) -> io::Result<()> {
        write_row(&mut w, &self.headers)?;
        for row in &self.rows {
            write_row(&mut w, row)?;
        }
        Ok(())
    }

    /// Index of a named column.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at `row` in the named column.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column(column)?;
        self.rows.get(row)?.get(idx).map(String::as_str)
    }
}
