//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: lifecycle of the orchestration loop (running, drained, budget reached, done)
//! - `CrawlSession`: the frontier, results and counters owned by one run

mod crawl_state;
mod session;

// Re-export main types
pub use crawl_state::CrawlState;
pub use session::CrawlSession;
