//! Listing page parsing.

use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

use crate::error::{FetchError, FetchResult};

static PLACE_CARD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.content-card.content-card-place").unwrap());

/// Absolute URLs of every place card on a listing page, in document order.
///
/// An anchor without `href` makes the whole page unusable; the caller skips
/// the page rather than writing a partial set.
pub fn parse_listing(html: &str, page: u32, site: &Url) -> FetchResult<Vec<String>> {
    let document = Html::parse_document(html);

    document
        .select(&PLACE_CARD)
        .map(|anchor| {
            let href = anchor
                .value()
                .attr("href")
                .ok_or_else(|| FetchError::MalformedListing {
                    page,
                    reason: "place card without href".to_string(),
                })?;

            site.join(href)
                .map(|u| u.to_string())
                .map_err(|_| FetchError::InvalidUrl {
                    url: href.to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> Url {
        Url::parse("https://www.atlasobscura.com").unwrap()
    }

    #[test]
    fn test_collects_place_cards_in_order() {
        let html = r#"
            <a class="content-card content-card-place" href="/places/a">A</a>
            <a class="content-card" href="/places/not-a-place">X</a>
            <a class="content-card content-card-place" href="https://www.atlasobscura.com/places/b">B</a>
        "#;

        let urls = parse_listing(html, 1, &site()).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://www.atlasobscura.com/places/a",
                "https://www.atlasobscura.com/places/b",
            ]
        );
    }

    #[test]
    fn test_empty_listing() {
        assert!(parse_listing("<html></html>", 1, &site()).unwrap().is_empty());
    }

    #[test]
    fn test_anchor_without_href_is_malformed() {
        let html = r#"<a class="content-card content-card-place">A</a>"#;
        let err = parse_listing(html, 7, &site()).unwrap_err();
        assert!(matches!(err, FetchError::MalformedListing { page: 7, .. }));
    }

    #[test]
    fn test_unresolvable_href_is_invalid_url() {
        let html = r#"<a class="content-card content-card-place" href="http://[oops/places/a">A</a>"#;
        let err = parse_listing(html, 2, &site()).unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { ref url } if url == "http://[oops/places/a"));
    }
}
