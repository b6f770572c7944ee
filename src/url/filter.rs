//! Link eligibility rules
//!
//! A link goes through two gates. The cheap [`LinkFilter::prefilter`] runs on
//! the raw href before any parsing; [`LinkFilter::is_eligible`] runs on the
//! resolved URL and decides whether it may join the frontier.

use crate::config::FilterConfig;
use crate::crawler::Frontier;
use url::Url;

/// Static predicate set deciding which links are followed
#[derive(Debug, Clone)]
pub struct LinkFilter {
    allow: Vec<String>,
    deny: Vec<String>,
    max_href_length: usize,
}

impl LinkFilter {
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            allow: config.allow.clone(),
            deny: config.deny.clone(),
            max_href_length: config.max_href_length,
        }
    }

    /// Checks a raw href before normalization
    ///
    /// Rejects empty hrefs, same-page anchors (`#...`), script pseudo-URLs
    /// (`javascript:...`) and hrefs at or above the length bound, which
    /// counts characters rather than bytes.
    pub fn prefilter(&self, href: &str) -> bool {
        !href.is_empty()
            && !href.starts_with('#')
            && !href.starts_with("javascript:")
            && href.chars().count() < self.max_href_length
    }

    /// Checks the allow and deny lists against a resolved URL
    ///
    /// Only HTTP(S) URLs can be fetched, so anything else is refused here too.
    pub fn is_allowed(&self, url: &Url) -> bool {
        if url.scheme() != "http" && url.scheme() != "https" {
            return false;
        }

        let url_str = url.as_str();

        let allowed = self.allow.is_empty() || self.allow.iter().any(|p| url_str.contains(p));
        allowed && !self.deny.iter().any(|p| url_str.contains(p))
    }

    /// Decides whether a resolved URL may be queued
    ///
    /// All conditions must hold: the URL passes the allow and deny lists, has
    /// not been visited, and is not already waiting in the frontier. Nothing
    /// is mutated; the caller performs the enqueue.
    pub fn is_eligible(&self, url: &Url, frontier: &Frontier) -> bool {
        let url_str = url.as_str();
        self.is_allowed(url) && !frontier.is_visited(url_str) && !frontier.is_pending(url_str)
    }
}

impl Default for LinkFilter {
    fn default() -> Self {
        Self::new(&FilterConfig::default())
    }
}
