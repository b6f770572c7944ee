//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the round-based crawl loop:
//! - Withdrawing a bounded batch of URLs from the frontier
//! - Running one fetch, extract and resolve pipeline per URL concurrently
//! - Merging the settled results into the frontier and page records
//! - Stopping when the frontier drains or the page budget is reached

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::{fetch_with_retry, FetchOutcome, HttpTransport, RetryPolicy, Transport};
use crate::crawler::parser::extract_hrefs;
use crate::crawler::{CrawlReport, PageRecord};
use crate::state::{CrawlSession, CrawlState};
use crate::url::{normalize_link, parse_seed, LinkFilter};
use crate::CrawlError;
use futures::stream::{FuturesUnordered, StreamExt};
use url::Url;

/// What one pipeline produced for one URL
#[derive(Debug)]
enum PageOutcome {
    /// Fetched; `links` are the resolved hrefs in document order
    Visited {
        url: String,
        links: Vec<Url>,
        invalid_links: usize,
    },

    /// Every fetch attempt failed
    Dropped { url: String },
}

/// Main crawler coordinator structure
pub struct Coordinator<T: Transport> {
    config: CrawlerConfig,
    policy: RetryPolicy,
    filter: LinkFilter,
    transport: T,
    session: CrawlSession,
    state: CrawlState,
}

impl Coordinator<HttpTransport> {
    /// Creates a coordinator that fetches over HTTP
    pub fn new(config: &Config) -> Result<Self, CrawlError> {
        let transport = HttpTransport::from_config(&config.fetch)?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> Coordinator<T> {
    /// Creates a coordinator on top of any page transport
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Seeded and ready to run
    /// * `Err(CrawlError)` - The seed URL is not an absolute HTTP(S) URL
    pub fn with_transport(config: &Config, transport: T) -> Result<Self, CrawlError> {
        let seed = parse_seed(&config.seed)?;
        tracing::info!("Seeding frontier with {}", seed);

        Ok(Self {
            config: config.crawler.clone(),
            policy: RetryPolicy::from_config(&config.fetch),
            filter: LinkFilter::new(&config.filter),
            transport,
            session: CrawlSession::new(&seed),
            state: CrawlState::Running,
        })
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    pub fn session(&self) -> &CrawlSession {
        &self.session
    }

    /// Runs rounds until the frontier drains or the page budget is reached
    ///
    /// Rounds are strictly sequential: every pipeline of a round settles
    /// before the next round starts, and the loop pauses for the configured
    /// inter-round delay in between.
    pub async fn run(mut self) -> Result<CrawlReport, CrawlError> {
        tracing::info!(
            "Starting crawl: max {} pages, {} concurrent",
            self.config.max_pages,
            self.config.concurrency
        );

        loop {
            if let Some(reason) = self.stop_reason() {
                self.transition(reason)?;
                break;
            }

            self.transition(CrawlState::Running)?;
            self.run_round().await;

            tracing::info!(
                "{}/{} pages crawled",
                self.session.visited_count(),
                self.config.max_pages
            );

            if self.stop_reason().is_none() {
                tokio::time::sleep(self.config.inter_round_delay()).await;
            }
        }

        let reason = self.state;
        self.transition(CrawlState::Done)?;

        tracing::info!(
            "Crawl finished ({}): {} pages visited, {} records, {} dropped",
            reason,
            self.session.visited_count(),
            self.session.records.len(),
            self.session.pages_dropped
        );

        Ok(self.session.into_report(reason))
    }

    /// Processes one round and returns the number of pages visited in it
    pub async fn run_round(&mut self) -> usize {
        self.session.rounds += 1;

        // Never withdraw more than the remaining budget can absorb
        let remaining = self
            .config
            .max_pages
            .saturating_sub(self.session.visited_count());
        let width = self.config.concurrency.min(remaining);
        let batch = self.session.frontier.withdraw_batch(width);

        let urls: Vec<String> = batch
            .into_iter()
            .filter(|url| {
                let seen = self.session.frontier.is_visited(url);
                if seen {
                    tracing::debug!("Skipping already visited {}", url);
                }
                !seen
            })
            .collect();

        tracing::debug!(
            "Round {}: visiting {} URLs ({} pending)",
            self.session.rounds,
            urls.len(),
            self.session.frontier.len()
        );

        let mut pipelines: FuturesUnordered<_> = urls
            .into_iter()
            .map(|url| visit_page(&self.transport, &self.policy, &self.filter, url))
            .collect();

        // Completion order, not withdrawal order
        let mut outcomes = Vec::new();
        while let Some(outcome) = pipelines.next().await {
            outcomes.push(outcome);
        }
        drop(pipelines);

        self.merge(outcomes)
    }

    /// Folds a settled round into the session
    ///
    /// All fetched pages are marked visited before any link is enqueued, so a
    /// page linking to a sibling from the same round never re-queues it.
    fn merge(&mut self, outcomes: Vec<PageOutcome>) -> usize {
        let mut visited = 0;

        for outcome in &outcomes {
            if let PageOutcome::Visited { url, .. } = outcome {
                self.session.frontier.mark_visited(url);
                visited += 1;
            }
        }

        for outcome in outcomes {
            match outcome {
                PageOutcome::Visited {
                    url,
                    links,
                    invalid_links,
                } => {
                    self.session.invalid_links += invalid_links;

                    let mut queued = 0;
                    for link in &links {
                        if self.filter.is_eligible(link, &self.session.frontier)
                            && self.session.frontier.enqueue(link.as_str())
                        {
                            queued += 1;
                        }
                    }

                    tracing::debug!(
                        "{}: {} links, {} queued",
                        url,
                        links.len(),
                        queued
                    );

                    if !links.is_empty() {
                        let links = links.into_iter().map(String::from).collect();
                        self.session.records.push(PageRecord::new(url, links));
                    }
                }
                PageOutcome::Dropped { url } => {
                    self.session.pages_dropped += 1;
                    tracing::debug!("Dropped {}", url);
                }
            }
        }

        visited
    }

    fn stop_reason(&self) -> Option<CrawlState> {
        if self.session.visited_count() >= self.config.max_pages {
            Some(CrawlState::BudgetReached)
        } else if self.session.frontier.is_empty() {
            Some(CrawlState::Drained)
        } else {
            None
        }
    }

    fn transition(&mut self, next: CrawlState) -> Result<(), CrawlError> {
        if !self.state.can_transition_to(next) {
            return Err(CrawlError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        if self.state != next {
            tracing::debug!("Crawl state {} -> {}", self.state, next);
        }
        self.state = next;
        Ok(())
    }
}

/// Fetches one page and resolves the links on it
///
/// Touches no shared state: the result is merged by the coordinator once the
/// whole round has settled.
async fn visit_page<T: Transport>(
    transport: &T,
    policy: &RetryPolicy,
    filter: &LinkFilter,
    url: String,
) -> PageOutcome {
    let body = match fetch_with_retry(transport, &url, policy).await {
        FetchOutcome::Fetched { body, .. } => body,
        FetchOutcome::Failed { .. } => return PageOutcome::Dropped { url },
    };

    let base = match Url::parse(&url) {
        Ok(base) => base,
        Err(e) => {
            tracing::warn!("Fetched URL {} no longer parses: {}", url, e);
            return PageOutcome::Visited {
                url,
                links: Vec::new(),
                invalid_links: 0,
            };
        }
    };

    let mut links = Vec::new();
    let mut invalid_links = 0;
    for href in extract_hrefs(&body) {
        if !filter.prefilter(&href) {
            continue;
        }
        match normalize_link(&href, &base) {
            Ok(link) => links.push(link),
            Err(e) => {
                tracing::debug!("Invalid URL on {}: {}", url, e);
                invalid_links += 1;
            }
        }
    }

    PageOutcome::Visited {
        url,
        links,
        invalid_links,
    }
}
