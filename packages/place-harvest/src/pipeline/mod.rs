//! Table-level stages that run after extraction.
//!
//! - [`merge`] concatenates per-place tables into one merged table
//! - [`preprocess`] normalizes the free-text columns of a merged table

pub mod merge;
pub mod preprocess;

pub use merge::{merge_tables, table_files, MERGED_INDEX_HEADER};
pub use preprocess::{preprocess_corpus, processed_path, NORMALIZED_COLUMNS};
