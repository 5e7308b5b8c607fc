//! Normalizing the free-text columns of a merged table.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Result, TableError};
use crate::normalize::normalize;
use crate::tsv::{render_list, Table};
use crate::types::report::PreprocessReport;

/// Columns whose text is replaced by its normalized token list.
pub const NORMALIZED_COLUMNS: [&str; 2] = ["placeName", "placeDesc"];

/// Default output path: `processed_<file name>` beside the input.
pub fn processed_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("processed_{}", name))
}

/// Derive a copy of the merged table at `input` in which the name and
/// description columns hold normalized token lists.
///
/// Every other cell is copied unchanged and the input file is never touched.
/// An empty cell is treated as missing text and becomes an empty list.
pub fn preprocess_corpus(input: &Path, output: Option<&Path>) -> Result<PreprocessReport> {
    let mut table = Table::read(input)?;

    let columns = NORMALIZED_COLUMNS
        .iter()
        .map(|name| {
            table.column(name).ok_or_else(|| TableError::MissingColumn {
                column: name.to_string(),
                path: input.to_path_buf(),
            })
        })
        .collect::<std::result::Result<Vec<usize>, TableError>>()?;
    let widest = columns.iter().copied().max().unwrap_or_default();

    info!(rows = table.rows.len(), input = %input.display(), "Preprocessing starting");

    let mut report = PreprocessReport::default();
    for (i, row) in table.rows.iter_mut().enumerate() {
        if row.len() <= widest {
            debug!(row = i, cells = row.len(), "Row too short, passing through");
            report.short_rows += 1;
            continue;
        }
        for &col in &columns {
            let cell = row[col].as_str();
            let tokens = normalize((!cell.is_empty()).then_some(cell));
            row[col] = render_list(tokens);
        }
    }
    report.rows = table.rows.len();

    let output = output.map(Path::to_path_buf).unwrap_or_else(|| processed_path(input));
    table.write(&output)?;
    report.output = output;

    info!(
        rows = report.rows,
        short_rows = report.short_rows,
        out = %report.output.display(),
        "Preprocessing completed"
    );

    Ok(report)
}
