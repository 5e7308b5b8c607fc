//! Small helpers over `scraper` shared by the field rules.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use crate::error::ExtractionError;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^<]+?>").unwrap());

pub(crate) fn selector(css: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(css).map_err(|e| ExtractionError::InvalidSelector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

/// All elements matching `css`, in document order.
pub(crate) fn select_all<'a>(doc: &'a Html, css: &str) -> Result<Vec<ElementRef<'a>>, ExtractionError> {
    let sel = selector(css)?;
    Ok(doc.select(&sel).collect())
}

/// The `n`th element matching `css`, if there are that many.
pub(crate) fn select_nth<'a>(
    doc: &'a Html,
    css: &str,
    n: usize,
) -> Result<Option<ElementRef<'a>>, ExtractionError> {
    let sel = selector(css)?;
    Ok(doc.select(&sel).nth(n))
}

/// Descendants of `el` matching `css`.
pub(crate) fn select_within<'a>(
    el: ElementRef<'a>,
    css: &str,
) -> Result<Vec<ElementRef<'a>>, ExtractionError> {
    let sel = selector(css)?;
    Ok(el.select(&sel).collect())
}

/// Concatenated text of every descendant text node.
pub(crate) fn text(el: ElementRef<'_>) -> String {
    el.text().collect()
}

pub(crate) fn trimmed_text(el: ElementRef<'_>) -> String {
    text(el).trim().to_string()
}

/// Next sibling that is an element, skipping text and comments.
pub(crate) fn next_element_sibling(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.next_siblings().find_map(ElementRef::wrap)
}

pub(crate) fn has_class(el: ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

/// Serialized markup with every tag replaced by a single space, trimmed.
pub(crate) fn strip_tags(el: ElementRef<'_>) -> String {
    TAG.replace_all(&el.html(), " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags() {
        let doc = Html::parse_fragment("<div>Main St<br>Springfield <b>USA</b></div>");
        let div = select_nth(&doc, "div", 0).unwrap().unwrap();
        assert_eq!(strip_tags(div), "Main St Springfield  USA");
    }

    #[test]
    fn test_next_element_sibling_skips_text() {
        let doc = Html::parse_fragment("<p><a id=\"x\">t</a>\n  <span>s</span></p>");
        let a = select_nth(&doc, "a#x", 0).unwrap().unwrap();
        let sibling = next_element_sibling(a).unwrap();
        assert_eq!(sibling.value().name(), "span");
    }

    #[test]
    fn test_invalid_selector_is_an_error() {
        let doc = Html::parse_fragment("<p></p>");
        assert!(matches!(
            select_all(&doc, "p[["),
            Err(ExtractionError::InvalidSelector { .. })
        ));
    }
}
