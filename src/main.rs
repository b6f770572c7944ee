//! Link Mapper main entry point
//!
//! This is the command-line interface for the Link Mapper crawler and its
//! publishing server.

use clap::Parser;
use link_mapper::config::{load_config_with_hash, validate, Config};
use link_mapper::crawler::crawl;
use link_mapper::output::{print_statistics, CrawlStatistics};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Link Mapper: maps which pages link where
///
/// Link Mapper crawls outward from a seed page in bounded concurrent rounds,
/// records the links found on every visited page, and writes the mapping to
/// a JSON file. With --serve it publishes that file and a viewer page.
#[derive(Parser, Debug)]
#[command(name = "link-mapper")]
#[command(version)]
#[command(about = "Maps page-to-link relationships from a seed page", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Seed URL to start crawling from
    #[arg(long, value_name = "URL")]
    seed: Option<String>,

    /// Maximum number of pages to visit
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Number of pages fetched concurrently per round
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Where to write the page-to-links JSON artifact
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with = "serve")]
    dry_run: bool,

    /// Serve the artifact and viewer page instead of crawling
    #[arg(long)]
    serve: bool,

    /// Address for --serve to bind (host:port)
    #[arg(long, value_name = "ADDR", requires = "serve")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match load_effective_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.serve {
        link_mapper::server::serve(&config).await?;
    } else {
        handle_crawl(config, cli.quiet).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("link_mapper=info,warn"),
            1 => EnvFilter::new("link_mapper=debug,info"),
            2 => EnvFilter::new("link_mapper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn load_effective_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(seed) = &cli.seed {
        config.seed = seed.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.concurrency = concurrency;
    }
    if let Some(output) = &cli.output {
        config.output.artifact_path = output.display().to_string();
    }
    if let Some(bind) = &cli.bind {
        config.server.bind = bind.clone();
    }

    validate(&config)?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Link Mapper Dry Run ===\n");

    println!("Seed: {}", config.seed);

    println!("\nCrawler Configuration:");
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Concurrency: {}", config.crawler.concurrency);
    println!(
        "  Inter-round delay: {}ms",
        config.crawler.inter_round_delay_ms
    );

    println!("\nFetch:");
    println!("  Max attempts: {}", config.fetch.max_attempts);
    println!(
        "  Backoff: {}ms x{}",
        config.fetch.initial_backoff_ms, config.fetch.backoff_multiplier
    );
    println!("  Max redirects: {}", config.fetch.max_redirects);
    println!("  Timeout: {}s", config.fetch.timeout_secs);
    println!("  User agent: {}", config.fetch.user_agent);

    println!("\nFilter:");
    println!("  Allow ({}):", config.filter.allow.len());
    for pattern in &config.filter.allow {
        println!("    - {}", pattern);
    }
    println!("  Deny ({}):", config.filter.deny.len());
    for pattern in &config.filter.deny {
        println!("    - {}", pattern);
    }
    println!("  Max href length: {}", config.filter.max_href_length);

    println!("\nOutput:");
    println!("  Artifact: {}", config.output.artifact_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, quiet: bool) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Seed URL: {}", config.seed);

    match crawl(config).await {
        Ok(report) => {
            if !quiet {
                print_statistics(&CrawlStatistics::from_report(&report));
            }
            tracing::info!("Crawl completed.");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
