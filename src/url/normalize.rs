use crate::UrlError;
use url::Url;

/// Resolves a raw href against the page it was found on
///
/// Resolution follows the WHATWG URL standard (`Url::join`): absolute hrefs
/// replace the base entirely, scheme-relative and path-relative hrefs borrow
/// the missing parts from it, and dot segments are collapsed. Query strings
/// and fragments are kept exactly as written.
///
/// Surrounding whitespace is trimmed first, matching how browsers read the
/// attribute.
///
/// # Arguments
///
/// * `href` - The raw `href` attribute value
/// * `base` - The absolute URL of the page containing the link
///
/// # Returns
///
/// * `Ok(Url)` - The absolute URL
/// * `Err(UrlError)` - The href cannot be parsed even with the base
///
/// # Examples
///
/// ```
/// use link_mapper::url::normalize_link;
/// use url::Url;
///
/// let base = Url::parse("https://en.wikipedia.org/wiki/Havana").unwrap();
/// let url = normalize_link("../wiki/Cuba#History", &base).unwrap();
/// assert_eq!(url.as_str(), "https://en.wikipedia.org/wiki/Cuba#History");
/// ```
pub fn normalize_link(href: &str, base: &Url) -> Result<Url, UrlError> {
    base.join(href.trim())
        .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))
}

/// Parses the absolute seed URL a crawl starts from
///
/// Only HTTP and HTTPS seeds can be fetched, so other schemes are rejected.
pub fn parse_seed(seed: &str) -> Result<Url, UrlError> {
    let url = Url::parse(seed.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    Ok(url)
}
