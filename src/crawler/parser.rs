//! HTML link extraction
//!
//! Pulls the raw `href` value of every anchor out of a page. Resolution and
//! filtering happen later, in the `url` module.

use scraper::{Html, Selector};

/// Extracts every anchor `href` value from an HTML document
///
/// Values are returned exactly as written in the markup, in document order,
/// with duplicates preserved. Anchors without an `href` attribute are
/// skipped.
///
/// # Example
///
/// ```
/// use link_mapper::crawler::extract_hrefs;
///
/// let html = r#"<html><body><a href="/b">B</a><a name="x">X</a><a href="/b">B</a></body></html>"#;
/// assert_eq!(extract_hrefs(html), vec!["/b", "/b"]);
/// ```
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}
