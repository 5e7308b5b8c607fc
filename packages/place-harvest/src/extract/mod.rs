//! Field extraction from stored place pages.
//!
//! [`extract_record`] runs every rule in [`rules`] against one parsed page and
//! folds the results into a [`PlaceRecord`]. A rule that finds nothing or
//! trips over unexpected markup leaves its field null; the other fields are
//! unaffected.

mod markup;
pub mod rules;

use scraper::Html;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::error::{FieldResult, HarvestError, Result};
use crate::types::record::{slug_from_path, PlaceRecord};
use crate::types::report::ExtractReport;

/// Resolve one rule result to a field value, logging why it is null.
fn settle<T>(field: &'static str, slug: &str, result: FieldResult<T>) -> Option<T> {
    match result {
        Ok(Some(value)) => Some(value),
        Ok(None) => {
            debug!(slug = %slug, field = field, "Field marker absent");
            None
        }
        Err(e) => {
            debug!(slug = %slug, field = field, error = %e, "Field extraction failed");
            None
        }
    }
}

/// Extract one record from raw page markup.
///
/// `base` is the site the page came from; the record URL is rebuilt as
/// `<base>/places/<slug>`.
pub fn extract_record(html: &str, slug: &str, base: &str) -> PlaceRecord {
    let doc = Html::parse_document(html);
    let mut record = PlaceRecord::new(format!(
        "{}/places/{}",
        base.trim_end_matches('/'),
        slug
    ));

    record.place_name = settle("placeName", slug, rules::place_name(&doc));
    record.place_tags = settle("placeTags", slug, rules::place_tags(&doc));
    record.num_people_visited = settle("numPeopleVisited", slug, rules::num_people_visited(&doc));
    record.num_people_want = settle("numPeopleWant", slug, rules::num_people_want(&doc));
    record.place_desc = settle("placeDesc", slug, rules::place_desc(&doc));
    record.place_short_desc = settle("placeShortDesc", slug, rules::place_short_desc(&doc));
    record.place_nearby = settle("placeNearby", slug, rules::place_nearby(&doc));
    record.place_address = settle("placeAddress", slug, rules::place_address(&doc));

    if let Some((alt, long)) = settle("placeCoordinates", slug, rules::place_coordinates(&doc)) {
        record.place_alt = Some(alt);
        record.place_long = Some(long);
    }

    record.place_editors = settle("placeEditors", slug, rules::place_editors(&doc));
    record.place_pub_date = settle("placePubDate", slug, rules::place_pub_date(&doc));
    record.place_related_lists =
        settle("placeRelatedLists", slug, rules::place_related_lists(&doc));
    record.place_related_places =
        settle("placeRelatedPlaces", slug, rules::place_related_places(&doc));

    record
}

/// Extract the record for one stored page, keyed by its file name.
///
/// Invalid UTF-8 is replaced rather than rejected; stored bodies are whatever
/// the server sent.
pub fn extract_file(path: &Path, base: &str) -> Result<PlaceRecord> {
    let slug = slug_from_path(path).ok_or_else(|| {
        HarvestError::io(
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "no slug in file name"),
        )
    })?;
    let bytes = fs::read(path).map_err(|e| HarvestError::io(path, e))?;
    let html = String::from_utf8_lossy(&bytes);
    Ok(extract_record(&html, &slug, base))
}

/// Stored pages under `root`, as `page_<n>/<slug>.html`, in path order.
pub fn stored_pages(root: &Path) -> Result<Vec<PathBuf>> {
    let mut pages = Vec::new();
    let buckets = fs::read_dir(root).map_err(|e| HarvestError::io(root, e))?;

    for bucket in buckets {
        let bucket = bucket.map_err(|e| HarvestError::io(root, e))?.path();
        let is_bucket = bucket.is_dir()
            && bucket
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("page_"));
        if !is_bucket {
            continue;
        }

        let files = fs::read_dir(&bucket).map_err(|e| HarvestError::io(&bucket, e))?;
        for file in files {
            let file = file.map_err(|e| HarvestError::io(&bucket, e))?.path();
            if file.extension().is_some_and(|ext| ext == "html") {
                pages.push(file);
            }
        }
    }

    pages.sort();
    Ok(pages)
}

/// Extract every stored page under `root` and export one table per place
/// into `tables_dir`. A page that cannot be read or exported is reported and
/// skipped.
pub fn extract_directory(root: &Path, tables_dir: &Path, base: &str) -> Result<ExtractReport> {
    let pages = stored_pages(root)?;
    info!(pages = pages.len(), root = %root.display(), "Extraction starting");

    let mut report = ExtractReport::default();
    for path in pages {
        let record = match extract_file(&path, base) {
            Ok(record) => record,
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to read stored page");
                report.failed_files.push(path);
                continue;
            }
        };

        let missing = record.missing_fields();
        if missing > 0 {
            debug!(url = %record.place_url, missing = missing, "Record has null fields");
        }

        match record.export_tsv(tables_dir) {
            Ok(_) => {
                report.records += 1;
                report.missing_fields += missing;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to export record");
                report.failed_files.push(path);
            }
        }
    }

    info!(
        records = report.records,
        missing_fields = report.missing_fields,
        failed = report.failed_files.len(),
        "Extraction completed"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    const PAGE: &str = include_str!("../../tests/fixtures/place_page.html");
    const BASE: &str = "https://www.atlasobscura.com";

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_full_record() {
        let record = extract_record(PAGE, "the-lost-city", BASE);

        assert_eq!(record.place_name.as_deref(), Some("The Lost City"));
        assert_eq!(record.place_tags, Some(strings(&["ruins", "ancient cities"])));
        assert_eq!(record.num_people_visited.as_deref(), Some("1204"));
        assert_eq!(record.num_people_want.as_deref(), Some("8731"));
        assert_eq!(
            record.place_desc.as_deref(),
            Some("Deep in the jungle lies a city.It predates Machu Picchu.")
        );
        assert_eq!(
            record.place_short_desc.as_deref(),
            Some("An ancient city reached by 1200 stone steps.")
        );
        assert_eq!(
            record.place_nearby,
            Some(BTreeSet::from(["Caves".to_string(), "Falls".to_string()]))
        );
        assert_eq!(
            record.place_address.as_deref(),
            Some("Sierra Nevada Magdalena Colombia")
        );
        assert_eq!(record.place_alt.as_deref(), Some("11.0383"));
        assert_eq!(record.place_long.as_deref(), Some("-73.9253"));
        assert_eq!(record.place_editors, Some(strings(&["Ann", "Bo", "Cy", "Di"])));
        assert_eq!(record.place_pub_date.as_deref(), Some("March 3 2016"));
        assert_eq!(record.place_related_places, Some(strings(&["Petra", "Angkor Wat"])));
        assert_eq!(record.place_related_lists, Some(strings(&["Lost Cities"])));
        assert_eq!(
            record.place_url,
            "https://www.atlasobscura.com/places/the-lost-city"
        );
        assert_eq!(record.missing_fields(), 0);
    }

    #[test]
    fn test_missing_address_only_nulls_address() {
        let start = PAGE.find("<address").unwrap();
        let end = PAGE.find("</address>").unwrap() + "</address>".len();
        let html = format!("{}{}", &PAGE[..start], &PAGE[end..]);

        let record = extract_record(&html, "the-lost-city", BASE);

        assert_eq!(record.place_address, None);
        assert_eq!(record.missing_fields(), 1);
        assert_eq!(record.place_name.as_deref(), Some("The Lost City"));
    }

    #[test]
    fn test_bad_coordinates_null_both() {
        let html = PAGE.replace("11.0383, -73.9253", "invalid");
        let record = extract_record(&html, "the-lost-city", BASE);

        assert_eq!(record.place_alt, None);
        assert_eq!(record.place_long, None);
        assert_eq!(record.missing_fields(), 2);
    }

    #[test]
    fn test_empty_page_yields_url_only() {
        let record = extract_record("<html></html>", "nothing-here", "https://example.com/");

        assert_eq!(record.place_url, "https://example.com/places/nothing-here");
        assert_eq!(record.place_name, None);
        // Tags and nearby are collections, so an empty page gives empty lists.
        assert_eq!(record.place_tags, Some(vec![]));
        assert_eq!(record.place_nearby, Some(BTreeSet::new()));
        assert_eq!(record.missing_fields(), 12);
    }

    #[test]
    fn test_extract_directory_exports_tables() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("html");
        let tables = dir.path().join("tables");
        fs::create_dir_all(root.join("page_1")).unwrap();
        fs::create_dir_all(root.join("page_2")).unwrap();
        fs::write(root.join("page_1").join("the-lost-city.html"), PAGE).unwrap();
        fs::write(root.join("page_2").join("empty-place.html"), "<html></html>").unwrap();
        fs::write(root.join("page_2").join("notes.txt"), "ignored").unwrap();
        fs::write(root.join("stray.html"), PAGE).unwrap();

        let report = extract_directory(&root, &tables, BASE).unwrap();

        assert_eq!(report.records, 2);
        assert_eq!(report.missing_fields, 12);
        assert!(report.failed_files.is_empty());
        assert!(tables.join("the-lost-city.tsv").exists());
        assert!(tables.join("empty-place.tsv").exists());
    }

    #[test]
    fn test_extract_directory_missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = extract_directory(&dir.path().join("absent"), dir.path(), BASE);
        assert!(matches!(result, Err(HarvestError::Io { .. })));
    }
}
