//! Merging per-place tables.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{HarvestError, Result};
use crate::tsv::Table;
use crate::types::record::FIELD_NAMES;
use crate::types::report::MergeReport;

/// Header of the leading row-number column in the merged table.
pub const MERGED_INDEX_HEADER: &str = "";

/// `*.tsv` files directly under `dir`, in path order.
pub fn table_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| HarvestError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| HarvestError::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "tsv") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Concatenate every record table in `tables_dir` into one table at `out`.
///
/// The merged table carries a leading unnamed column numbering the rows from
/// zero. Tables that cannot be read or whose header is not the record header
/// are skipped and reported.
pub fn merge_tables(tables_dir: &Path, out: &Path) -> Result<MergeReport> {
    let files = table_files(tables_dir)?;
    info!(tables = files.len(), dir = %tables_dir.display(), "Merge starting");

    let mut headers = vec![MERGED_INDEX_HEADER.to_string()];
    headers.extend(FIELD_NAMES.iter().map(|name| name.to_string()));
    let mut merged = Table::new(headers);
    let mut report = MergeReport::default();

    for path in files {
        let table = match Table::read(&path) {
            Ok(table) => table,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unreadable table");
                report.skipped_files.push(path);
                continue;
            }
        };

        if table.headers != FIELD_NAMES {
            warn!(path = %path.display(), "Skipping table with unexpected header");
            report.skipped_files.push(path);
            continue;
        }

        for mut row in table.rows {
            row.resize(FIELD_NAMES.len(), String::new());
            let mut numbered = Vec::with_capacity(row.len() + 1);
            numbered.push(merged.rows.len().to_string());
            numbered.append(&mut row);
            merged.rows.push(numbered);
        }
    }

    merged.write(out)?;
    report.rows = merged.rows.len();
    report.output = out.to_path_buf();

    info!(
        rows = report.rows,
        skipped = report.skipped_files.len(),
        out = %out.display(),
        "Merge completed"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::record::PlaceRecord;

    fn record(slug: &str, name: &str) -> PlaceRecord {
        let mut record = PlaceRecord::new(format!("https://example.com/places/{}", slug));
        record.place_name = Some(name.to_string());
        record.place_tags = Some(vec!["ruins".to_string()]);
        record
    }

    #[test]
    fn test_merge_numbers_rows_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let tables = dir.path().join("tables");
        record("b-place", "Bravo").export_tsv(&tables).unwrap();
        record("a-place", "Alpha").export_tsv(&tables).unwrap();
        let out = dir.path().join("merged.tsv");

        let report = merge_tables(&tables, &out).unwrap();

        assert_eq!(report.rows, 2);
        assert!(report.skipped_files.is_empty());

        let merged = Table::read(&out).unwrap();
        assert_eq!(merged.headers[0], "");
        assert_eq!(merged.headers.len(), FIELD_NAMES.len() + 1);
        assert_eq!(merged.cell(0, ""), Some("0"));
        assert_eq!(merged.cell(0, "placeName"), Some("Alpha"));
        assert_eq!(merged.cell(1, ""), Some("1"));
        assert_eq!(merged.cell(1, "placeName"), Some("Bravo"));
        assert_eq!(merged.cell(1, "placeTags"), Some("['ruins']"));
        assert_eq!(merged.cell(1, "placeAddress"), Some(""));
    }

    #[test]
    fn test_merge_skips_foreign_tables() {
        let dir = tempfile::tempdir().unwrap();
        record("a-place", "Alpha").export_tsv(dir.path()).unwrap();
        fs::write(dir.path().join("other.tsv"), "x\ty\n1\t2\n").unwrap();
        fs::write(dir.path().join("empty.tsv"), "").unwrap();
        let out = dir.path().join("out").join("merged.tsv");

        let report = merge_tables(dir.path(), &out).unwrap();

        assert_eq!(report.rows, 1);
        assert_eq!(report.skipped_files.len(), 2);
        assert!(out.exists());
    }

    #[test]
    fn test_merge_missing_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = merge_tables(&dir.path().join("absent"), &dir.path().join("m.tsv"));
        assert!(matches!(result, Err(HarvestError::Io { .. })));
    }
}
