//! One rule per record field.
//!
//! Every rule reads the parsed page and returns `Ok(None)` when its marker is
//! absent, `Err` when the markup has an unexpected shape, and `Ok(Some(..))`
//! otherwise. Rules share nothing, so one rule failing cannot affect another.

use scraper::{ElementRef, Html};
use std::collections::BTreeSet;
use tracing::trace;

use super::markup::{
    has_class, next_element_sibling, select_all, select_nth, select_within, strip_tags, text,
    trimmed_text,
};
use crate::error::{ExtractionError, FieldResult};

const ACTION_COUNT: &str = "div.item-action-count";
const CARD_GRID: &str = "div.CardRecircSection__card-grid";
const CARD_HEADING: &str = "h3.Card__heading";
const CONTRIBUTORS_LIST: &str = "div.DDPContributorsList";
const CONTRIBUTOR_CLASS: &str = "DDPContributorsList__contributor";
const POPOVER_TRIGGER: &str = "a.DDPContributorsList__popover-trigger";

/// Card grid holding related places. Positional: the page exposes no
/// semantic marker that tells the grids apart. Places before lists is the
/// order the site renders the grids in.
pub const RELATED_PLACES_GRID: usize = 1;

/// Card grid holding related lists. Positional, see [`RELATED_PLACES_GRID`].
pub const RELATED_LISTS_GRID: usize = 2;

/// Contributors list that carries the visible editors.
const VISIBLE_EDITORS_LIST: usize = 1;

pub fn place_name(doc: &Html) -> FieldResult<String> {
    Ok(select_nth(doc, "h1.DDPage__header-title", 0)?.map(text))
}

pub fn place_tags(doc: &Html) -> FieldResult<Vec<String>> {
    let tags = select_all(doc, "a.itemTags__link.js-item-tags-link")?;
    Ok(Some(tags.into_iter().map(trimmed_text).collect()))
}

pub fn num_people_visited(doc: &Html) -> FieldResult<String> {
    Ok(select_nth(doc, ACTION_COUNT, 0)?.map(text))
}

pub fn num_people_want(doc: &Html) -> FieldResult<String> {
    Ok(select_nth(doc, ACTION_COUNT, 1)?.map(text))
}

/// Every paragraph in the body container, joined with no separator.
pub fn place_desc(doc: &Html) -> FieldResult<String> {
    let Some(body) = select_nth(doc, "div#place-body", 0)? else {
        return Ok(None);
    };
    let paragraphs = select_within(body, "p")?;
    Ok(Some(paragraphs.into_iter().map(text).collect()))
}

pub fn place_short_desc(doc: &Html) -> FieldResult<String> {
    Ok(select_nth(doc, "h3.DDPage__header-dek", 0)?.map(text))
}

pub fn place_nearby(doc: &Html) -> FieldResult<BTreeSet<String>> {
    let titles = select_all(doc, "div.DDPageSiderailRecirc__item-title")?;
    Ok(Some(titles.into_iter().map(text).collect()))
}

pub fn place_address(doc: &Html) -> FieldResult<String> {
    const MARKER: &str = "address.DDPageSiderail__address";

    let Some(address) = select_nth(doc, MARKER, 0)? else {
        return Ok(None);
    };
    let block = select_within(address, "div")?
        .into_iter()
        .next()
        .ok_or_else(|| ExtractionError::MissingMarker {
            marker: format!("{} div", MARKER),
        })?;
    Ok(Some(strip_tags(block)))
}

/// `(alt, long)` from a single `"<alt>, <long>"` text; both or neither.
pub fn place_coordinates(doc: &Html) -> FieldResult<(String, String)> {
    const MARKER: &str = "div.DDPageSiderail__coordinates";

    let Some(coordinates) = select_nth(doc, MARKER, 0)? else {
        return Ok(None);
    };
    split_coordinates(text(coordinates).trim())
        .map(Some)
        .ok_or_else(|| ExtractionError::ShapeMismatch {
            marker: MARKER.to_string(),
            detail: "expected exactly two comma-separated parts".to_string(),
        })
}

/// Split `"40.7128, -74.0060"` into its two parts.
pub fn split_coordinates(raw: &str) -> Option<(String, String)> {
    let mut parts = raw.split(", ");
    match (parts.next(), parts.next(), parts.next()) {
        (Some(alt), Some(long), None) => Some((alt.to_string(), long.to_string())),
        _ => None,
    }
}

/// Visible contributors followed by the ones hidden behind the popover.
pub fn place_editors(doc: &Html) -> FieldResult<Vec<String>> {
    let Some(list) = select_nth(doc, CONTRIBUTORS_LIST, VISIBLE_EDITORS_LIST)? else {
        return Ok(None);
    };

    let mut editors: Vec<String> = list
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "a" && has_class(*el, CONTRIBUTOR_CLASS))
        .map(text)
        .collect();

    editors.extend(hidden_editors(doc));
    Ok(Some(editors))
}

/// Older page variants have no popover; that is an empty list, not a gap.
fn hidden_editors(doc: &Html) -> Vec<String> {
    let popover = select_nth(doc, POPOVER_TRIGGER, 0)
        .ok()
        .flatten()
        .and_then(next_element_sibling);

    match popover {
        Some(popover) => select_within(popover, "span")
            .map(|spans| spans.into_iter().map(text).collect())
            .unwrap_or_default(),
        None => {
            trace!("No hidden editors popover");
            Vec::new()
        }
    }
}

/// Text of the element after the first section label, commas removed.
pub fn place_pub_date(doc: &Html) -> FieldResult<String> {
    const MARKER: &str = "div.DDP__section-label";

    let Some(label) = select_nth(doc, MARKER, 0)? else {
        return Ok(None);
    };
    let value = next_element_sibling(label).ok_or_else(|| ExtractionError::ShapeMismatch {
        marker: MARKER.to_string(),
        detail: "label has no following element".to_string(),
    })?;
    Ok(Some(text(value).replace(',', "")))
}

pub fn place_related_lists(doc: &Html) -> FieldResult<Vec<String>> {
    card_headings(doc, RELATED_LISTS_GRID)
}

pub fn place_related_places(doc: &Html) -> FieldResult<Vec<String>> {
    card_headings(doc, RELATED_PLACES_GRID)
}

fn card_headings(doc: &Html, grid: usize) -> FieldResult<Vec<String>> {
    let Some(grid) = select_nth(doc, CARD_GRID, grid)? else {
        return Ok(None);
    };
    let headings = select_within(grid, CARD_HEADING)?;
    Ok(Some(headings.into_iter().map(trimmed_text).collect()))
}
