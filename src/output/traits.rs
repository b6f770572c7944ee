//! Output handler traits and types
//!
//! This module defines the trait interface for result writers and the
//! errors they report.

use crate::crawler::PageRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for result writers
///
/// A handler receives the full, ordered page records once, when the crawl
/// has finished. Writing replaces whatever the destination held before.
pub trait OutputHandler {
    /// Persists every page record
    fn write(&self, records: &[PageRecord]) -> OutputResult<()>;

    /// Human-readable name of where the records go, for log messages
    fn destination(&self) -> String;
}
