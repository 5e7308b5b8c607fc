//! Place records - one per scraped place page.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{TableError, TableResult};
use crate::tsv::{self, render_list, render_optional};

/// Path segment that precedes every place slug.
pub const PLACES_PREFIX: &str = "places/";

/// Canonical column order for every record table.
pub const FIELD_NAMES: [&str; 15] = [
    "placeName",
    "placeTags",
    "numPeopleVisited",
    "numPeopleWant",
    "placeDesc",
    "placeShortDesc",
    "placeNearby",
    "placeAddress",
    "placeAlt",
    "placeLong",
    "placeEditors",
    "placePubDate",
    "placeRelatedLists",
    "placeRelatedPlaces",
    "placeURL",
];

/// Structured fields scraped from one place page.
///
/// Every field except `place_url` is independently optional; `place_url` is
/// rebuilt from the slug the page was stored under.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRecord {
    pub place_name: Option<String>,
    pub place_tags: Option<Vec<String>>,
    pub num_people_visited: Option<String>,
    pub num_people_want: Option<String>,
    pub place_desc: Option<String>,
    pub place_short_desc: Option<String>,
    pub place_nearby: Option<BTreeSet<String>>,
    pub place_address: Option<String>,
    pub place_alt: Option<String>,
    pub place_long: Option<String>,
    pub place_editors: Option<Vec<String>>,
    pub place_pub_date: Option<String>,
    pub place_related_lists: Option<Vec<String>>,
    pub place_related_places: Option<Vec<String>>,
    #[serde(rename = "placeURL")]
    pub place_url: String,
}

impl PlaceRecord {
    /// An empty record for the given canonical URL.
    pub fn new(place_url: impl Into<String>) -> Self {
        Self {
            place_url: place_url.into(),
            ..Default::default()
        }
    }

    /// Slug this record is keyed by.
    pub fn slug(&self) -> Option<&str> {
        slug_from_url(&self.place_url)
    }

    /// Number of the 14 scraped fields that came back null.
    pub fn missing_fields(&self) -> usize {
        [
            self.place_name.is_none(),
            self.place_tags.is_none(),
            self.num_people_visited.is_none(),
            self.num_people_want.is_none(),
            self.place_desc.is_none(),
            self.place_short_desc.is_none(),
            self.place_nearby.is_none(),
            self.place_address.is_none(),
            self.place_alt.is_none(),
            self.place_long.is_none(),
            self.place_editors.is_none(),
            self.place_pub_date.is_none(),
            self.place_related_lists.is_none(),
            self.place_related_places.is_none(),
        ]
        .into_iter()
        .filter(|missing| *missing)
        .count()
    }

    /// Value row in `FIELD_NAMES` order. Lists use their textual list form,
    /// nulls are empty cells.
    pub fn to_row(&self) -> Vec<String> {
        fn list(items: &Option<Vec<String>>) -> String {
            items.as_ref().map(render_list).unwrap_or_default()
        }

        vec![
            render_optional(self.place_name.as_deref()),
            list(&self.place_tags),
            render_optional(self.num_people_visited.as_deref()),
            render_optional(self.num_people_want.as_deref()),
            render_optional(self.place_desc.as_deref()),
            render_optional(self.place_short_desc.as_deref()),
            self.place_nearby.as_ref().map(render_list).unwrap_or_default(),
            render_optional(self.place_address.as_deref()),
            render_optional(self.place_alt.as_deref()),
            render_optional(self.place_long.as_deref()),
            list(&self.place_editors),
            render_optional(self.place_pub_date.as_deref()),
            list(&self.place_related_lists),
            list(&self.place_related_places),
            self.place_url.clone(),
        ]
    }

    /// Write the header row followed by this record's value row.
    pub fn write_tsv<W: Write>(&self, mut w: W) -> io::Result<()> {
        let header: Vec<String> = FIELD_NAMES.iter().map(|s| s.to_string()).collect();
        tsv::write_row(&mut w, &header)?;
        tsv::write_row(&mut w, &self.to_row())
    }

    /// Export to `<dir>/<slug>.tsv`, creating `dir` when needed.
    pub fn export_tsv(&self, dir: &Path) -> TableResult<PathBuf> {
        let slug = self.slug().unwrap_or("unknown");
        let path = dir.join(format!("{}.tsv", slug));
        let io_err = |source| TableError::Io {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(dir).map_err(io_err)?;
        let mut buf = Vec::new();
        self.write_tsv(&mut buf).map_err(io_err)?;
        fs::write(&path, buf).map_err(io_err)?;
        Ok(path)
    }
}

/// Slug of a place URL: the text after `places/`, up to any query or fragment.
///
/// Returns `None` when there is no `places/` segment or the remainder is not
/// a single path segment.
pub fn slug_from_url(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once(PLACES_PREFIX)?;
    let slug = rest
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');
    if slug.is_empty() || slug.contains('/') {
        return None;
    }
    Some(slug)
}

/// Slug of a stored page: its file name without the `.html` extension.
pub fn slug_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PlaceRecord {
        PlaceRecord {
            place_name: Some("The Lost City".into()),
            place_tags: Some(vec!["ruins".into(), "jungle".into()]),
            num_people_visited: Some("1204".into()),
            num_people_want: Some("8731".into()),
            place_desc: Some("Deep in the jungle.".into()),
            place_short_desc: Some("An ancient city".into()),
            place_nearby: Some(["Falls".to_string(), "Caves".to_string()].into()),
            place_address: Some("Sierra Nevada Colombia".into()),
            place_alt: Some("11.0383".into()),
            place_long: Some("-73.9253".into()),
            place_editors: Some(vec!["Ann".into(), "Bo".into()]),
            place_pub_date: Some("March 3 2016".into()),
            place_related_lists: Some(vec!["Lost Cities".into()]),
            place_related_places: Some(vec!["Petra".into()]),
            place_url: "https://www.atlasobscura.com/places/the-lost-city".into(),
        }
    }

    #[test]
    fn test_row_order_matches_field_names() {
        let row = sample().to_row();
        assert_eq!(row.len(), FIELD_NAMES.len());
        assert_eq!(row[0], "The Lost City");
        assert_eq!(row[1], "['ruins', 'jungle']");
        assert_eq!(row[6], "['Caves', 'Falls']");
        assert_eq!(row[14], "https://www.atlasobscura.com/places/the-lost-city");
    }

    #[test]
    fn test_tsv_roundtrip_recovers_scalars() {
        let record = sample();
        let mut buf = Vec::new();
        record.write_tsv(&mut buf).unwrap();

        let table = tsv::Table::parse(&String::from_utf8(buf).unwrap()).unwrap();
        assert_eq!(table.headers, FIELD_NAMES.to_vec());
        assert_eq!(table.rows.len(), 1);

        assert_eq!(table.cell(0, "placeName"), record.place_name.as_deref());
        assert_eq!(table.cell(0, "numPeopleVisited"), Some("1204"));
        assert_eq!(table.cell(0, "numPeopleWant"), Some("8731"));
        assert_eq!(table.cell(0, "placeDesc"), record.place_desc.as_deref());
        assert_eq!(table.cell(0, "placeAlt"), Some("11.0383"));
        assert_eq!(table.cell(0, "placeLong"), Some("-73.9253"));
        assert_eq!(table.cell(0, "placePubDate"), Some("March 3 2016"));
        assert_eq!(table.cell(0, "placeURL"), Some(record.place_url.as_str()));

        // List fields come back as their textual form only.
        assert_eq!(table.cell(0, "placeEditors"), Some("['Ann', 'Bo']"));
    }

    #[test]
    fn test_description_with_newlines_stays_one_row() {
        let mut record = sample();
        record.place_desc = Some("First paragraph.\nSecond\tparagraph.".into());

        let mut buf = Vec::new();
        record.write_tsv(&mut buf).unwrap();
        let table = tsv::Table::parse(&String::from_utf8(buf).unwrap()).unwrap();

        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.cell(0, "placeDesc"), record.place_desc.as_deref());
    }

    #[test]
    fn test_nulls_render_empty() {
        let record = PlaceRecord::new("https://www.atlasobscura.com/places/x");
        let row = record.to_row();
        assert!(row[..14].iter().all(String::is_empty));
        assert_eq!(record.missing_fields(), 14);
        assert_eq!(sample().missing_fields(), 0);
    }

    #[test]
    fn test_export_tsv_uses_slug() {
        let dir = tempfile::tempdir().unwrap();
        let path = sample().export_tsv(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("the-lost-city.tsv"));
        assert!(fs::read_to_string(path).unwrap().starts_with("placeName\tplaceTags"));
    }

    #[test]
    fn test_slug_from_url() {
        assert_eq!(
            slug_from_url("https://www.atlasobscura.com/places/the-lost-city"),
            Some("the-lost-city")
        );
        assert_eq!(slug_from_url("https://e.com/places/x/?ref=list"), Some("x"));
        assert_eq!(slug_from_url("https://e.com/things/x"), None);
        assert_eq!(slug_from_url("https://e.com/places/"), None);
        assert_eq!(slug_from_url("https://e.com/places/a/b"), None);
    }

    #[test]
    fn test_slug_from_path() {
        assert_eq!(
            slug_from_path(Path::new("data/html/page_3/the-lost-city.html")),
            Some("the-lost-city".to_string())
        );
    }
}
