//! Crawl frontier and visited set
//!
//! Pending URLs are kept in discovery order and withdrawn from the front in
//! batches. A `HashSet` mirrors the pending queue so membership checks stay
//! O(1) at tens of thousands of entries.

use std::collections::{HashSet, VecDeque};

/// Discovered-but-unvisited URLs plus the set of visited URLs
///
/// The pending and visited sets are disjoint at all times: `enqueue` refuses
/// visited URLs and `mark_visited` drops any pending copy.
#[derive(Debug, Default)]
pub struct Frontier {
    /// Pending URLs in withdrawal order
    queue: VecDeque<String>,

    /// Membership index for `queue`
    pending: HashSet<String>,

    /// URLs fetched successfully in this run
    visited: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier holding exactly one pending URL
    pub fn seed(url: impl Into<String>) -> Self {
        let mut frontier = Self::default();
        frontier.enqueue(url);
        frontier
    }

    /// Adds a URL unless it is already pending or visited
    ///
    /// Returns true if the URL was added.
    pub fn enqueue(&mut self, url: impl Into<String>) -> bool {
        let url = url.into();
        if self.visited.contains(&url) || self.pending.contains(&url) {
            return false;
        }

        self.pending.insert(url.clone());
        self.queue.push_back(url);
        true
    }

    /// Removes up to `n` URLs from the front of the queue
    ///
    /// Every returned URL is gone from the pending set when this returns.
    pub fn withdraw_batch(&mut self, n: usize) -> Vec<String> {
        let take = n.min(self.queue.len());
        let batch: Vec<String> = self.queue.drain(..take).collect();
        for url in &batch {
            self.pending.remove(url);
        }
        batch
    }

    /// Records a successful fetch
    ///
    /// Returns false if the URL had already been visited.
    pub fn mark_visited(&mut self, url: &str) -> bool {
        if self.pending.remove(url) {
            self.queue.retain(|queued| queued != url);
        }
        self.visited.insert(url.to_string())
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn is_pending(&self, url: &str) -> bool {
        self.pending.contains(url)
    }

    /// Returns true if no URL is waiting to be visited
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of pending URLs
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Iterates over pending URLs in withdrawal order
    pub fn pending(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().map(String::as_str)
    }

    /// Returns true if the pending and visited sets share no URL
    pub fn is_disjoint(&self) -> bool {
        self.pending.is_disjoint(&self.visited)
    }
}
