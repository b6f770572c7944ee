use crate::state::CrawlState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One visited page and the links found on it
///
/// Serialized as `{ "page": "...", "links": ["...", ...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Absolute URL of the page as it was fetched
    pub page: String,

    /// Every resolved link on the page, in document order
    pub links: Vec<String>,
}

impl PageRecord {
    pub fn new(page: impl Into<String>, links: Vec<String>) -> Self {
        Self {
            page: page.into(),
            links,
        }
    }
}

/// Everything a finished crawl hands back to its caller
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Page records in round completion order
    pub records: Vec<PageRecord>,

    /// Why the loop stopped: `Drained` or `BudgetReached`
    pub stop_reason: CrawlState,

    /// Pages fetched successfully
    pub pages_visited: usize,

    /// Pages dropped after exhausting their retries
    pub pages_dropped: usize,

    /// Hrefs that could not be resolved to a URL
    pub invalid_links: usize,

    /// URLs still pending when the loop stopped
    pub pending_remaining: usize,

    /// Rounds processed
    pub rounds: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}
