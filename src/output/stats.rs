//! Statistics for a finished crawl
//!
//! Computed from the in-memory report and printed once at the end of a run.

use crate::crawler::{CrawlReport, PageRecord};
use crate::state::CrawlState;
use std::collections::HashSet;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// Why the crawl stopped
    pub stop_reason: CrawlState,

    /// Pages fetched successfully
    pub pages_visited: usize,

    /// Pages that produced a record
    pub pages_recorded: usize,

    /// Pages dropped after exhausting their retries
    pub pages_dropped: usize,

    /// Links across all records, duplicates included
    pub total_links: usize,

    /// Distinct link targets across all records
    pub unique_links: usize,

    /// Hrefs that could not be resolved
    pub invalid_links: usize,

    /// URLs still waiting when the crawl stopped
    pub pending_remaining: usize,

    pub rounds: usize,
    pub duration_seconds: i64,
}

impl CrawlStatistics {
    /// Builds statistics from a finished crawl
    pub fn from_report(report: &CrawlReport) -> Self {
        Self {
            stop_reason: report.stop_reason,
            pages_visited: report.pages_visited,
            pages_recorded: report.records.len(),
            pages_dropped: report.pages_dropped,
            total_links: count_links(&report.records),
            unique_links: count_unique_links(&report.records),
            invalid_links: report.invalid_links,
            pending_remaining: report.pending_remaining,
            rounds: report.rounds,
            duration_seconds: report.duration_seconds(),
        }
    }

    /// Share of fetch attempts (by URL) that succeeded, as a percentage
    pub fn success_rate(&self) -> f64 {
        let attempted = self.pages_visited + self.pages_dropped;
        if attempted == 0 {
            return 0.0;
        }
        (self.pages_visited as f64 / attempted as f64) * 100.0
    }
}

fn count_links(records: &[PageRecord]) -> usize {
    records.iter().map(|r| r.links.len()).sum()
}

fn count_unique_links(records: &[PageRecord]) -> usize {
    records
        .iter()
        .flat_map(|r| r.links.iter())
        .collect::<HashSet<_>>()
        .len()
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Stopped because: {}", stats.stop_reason);
    println!("  Rounds: {}", stats.rounds);
    println!("  Duration: {} seconds", stats.duration_seconds);
    println!();

    println!("Pages:");
    println!("  Visited: {}", stats.pages_visited);
    println!("  Recorded: {}", stats.pages_recorded);
    println!("  Dropped after retries: {}", stats.pages_dropped);
    println!("  Still pending: {}", stats.pending_remaining);
    println!();

    println!("Links:");
    println!("  Total: {}", stats.total_links);
    println!("  Unique targets: {}", stats.unique_links);
    println!("  Invalid hrefs: {}", stats.invalid_links);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} pages fetched)",
        stats.success_rate(),
        stats.pages_visited,
        stats.pages_visited + stats.pages_dropped
    );
}
