//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry and exponential backoff
//! - HTML link extraction
//! - Frontier and visited-set management
//! - Round-based crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod record;

pub use coordinator::Coordinator;
pub use fetcher::{
    build_http_client, fetch_with_retry, Backoff, FetchError, FetchOutcome, HttpTransport,
    RetryPolicy, Transport,
};
pub use frontier::Frontier;
pub use parser::extract_hrefs;
pub use record::{CrawlReport, PageRecord};

use crate::config::Config;
use crate::output::{JsonOutputHandler, OutputHandler};
use crate::CrawlError;
use std::path::Path;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Seed the frontier
/// 3. Run rounds until the frontier drains or the page budget is reached
/// 4. Write the page-to-links artifact
///
/// A failed artifact write is logged and does not fail the crawl: the
/// report is returned either way.
///
/// # Example
///
/// ```no_run
/// use link_mapper::config::Config;
/// use link_mapper::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = crawl(Config::default()).await?;
/// println!("{} pages recorded", report.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: Config) -> Result<CrawlReport, CrawlError> {
    let coordinator = Coordinator::new(&config)?;
    let handler = JsonOutputHandler::new(Path::new(&config.output.artifact_path));
    run_crawl(coordinator, &handler).await
}

/// Runs a coordinator to completion and hands the result to an output handler
pub async fn run_crawl<T: Transport, H: OutputHandler>(
    coordinator: Coordinator<T>,
    handler: &H,
) -> Result<CrawlReport, CrawlError> {
    let report = coordinator.run().await?;

    match handler.write(&report.records) {
        Ok(()) => tracing::info!(
            "Data successfully written to {} ({} pages)",
            handler.destination(),
            report.records.len()
        ),
        Err(e) => tracing::error!("Error writing to {}: {}", handler.destination(), e),
    }

    Ok(report)
}
