/// Per-run crawl session
///
/// Owns everything that changes while a crawl runs. One session is built at
/// the start of a run and owned by the coordinator; nothing is shared
/// between runs.
use crate::crawler::{CrawlReport, Frontier, PageRecord};
use crate::state::CrawlState;
use chrono::{DateTime, Utc};
use url::Url;

#[derive(Debug)]
pub struct CrawlSession {
    /// Pending and visited URLs
    pub frontier: Frontier,

    /// Accumulated page records, in merge order
    pub records: Vec<PageRecord>,

    /// URLs dropped after exhausting their retries
    pub pages_dropped: usize,

    /// Hrefs that failed to resolve
    pub invalid_links: usize,

    /// Rounds processed so far
    pub rounds: usize,

    started_at: DateTime<Utc>,
}

impl CrawlSession {
    /// Starts a session whose frontier holds only the seed
    pub fn new(seed: &Url) -> Self {
        Self {
            frontier: Frontier::seed(seed.as_str()),
            records: Vec::new(),
            pages_dropped: 0,
            invalid_links: 0,
            rounds: 0,
            started_at: Utc::now(),
        }
    }

    pub fn visited_count(&self) -> usize {
        self.frontier.visited_count()
    }

    /// Closes the session into the report handed to the caller
    pub fn into_report(self, stop_reason: CrawlState) -> CrawlReport {
        CrawlReport {
            pages_visited: self.frontier.visited_count(),
            pending_remaining: self.frontier.len(),
            records: self.records,
            stop_reason,
            pages_dropped: self.pages_dropped,
            invalid_links: self.invalid_links,
            rounds: self.rounds,
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }
}
