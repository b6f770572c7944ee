//! Output module for persisting crawl results
//!
//! This module handles:
//! - Writing the page-to-links artifact as JSON
//! - Reading the artifact back
//! - Summarizing a finished crawl

mod json;
pub mod stats;
mod traits;

pub use json::{load_artifact, JsonOutputHandler};
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{OutputError, OutputHandler, OutputResult};
