use serde::Deserialize;
use std::time::Duration;

/// Seed page used when neither the config file nor the CLI names one
pub const DEFAULT_SEED: &str = "https://en.wikipedia.org/wiki/Battle_of_Havana_(1748)?wprov=sfti1";

/// Main configuration structure for Link Mapper
///
/// Every section carries serde defaults, so an empty file (or no file at
/// all) is equivalent to `Config::default()`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Absolute URL the frontier is seeded with
    pub seed: String,
    pub crawler: CrawlerConfig,
    pub fetch: FetchConfig,
    pub filter: FilterConfig,
    pub output: OutputConfig,
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED.to_string(),
            crawler: CrawlerConfig::default(),
            fetch: FetchConfig::default(),
            filter: FilterConfig::default(),
            output: OutputConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

/// Crawl loop configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Hard cap on the number of visited pages
    pub max_pages: usize,

    /// Number of pages fetched concurrently in one round
    pub concurrency: usize,

    /// Pause between rounds (milliseconds)
    pub inter_round_delay_ms: u64,
}

impl CrawlerConfig {
    pub fn inter_round_delay(&self) -> Duration {
        Duration::from_millis(self.inter_round_delay_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 10_000,
            concurrency: 10,
            inter_round_delay_ms: 500,
        }
    }
}

/// HTTP fetch and retry configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetchConfig {
    /// Total attempts per URL, including the first one
    pub max_attempts: u32,

    /// Delay before the second attempt (milliseconds)
    pub initial_backoff_ms: u64,

    /// Factor applied to the delay after every failed attempt
    pub backoff_multiplier: u32,

    /// Redirect hops followed before the fetch counts as failed
    pub max_redirects: usize,

    /// Whole-request timeout (seconds)
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 1000,
            backoff_multiplier: 2,
            max_redirects: 5,
            timeout_secs: 30,
            user_agent: format!("link-mapper/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Link eligibility configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct FilterConfig {
    /// A URL must contain at least one of these to be queued (empty allows all)
    pub allow: Vec<String>,

    /// A URL containing any of these is never queued
    pub deny: Vec<String>,

    /// Raw hrefs must be strictly shorter than this
    pub max_href_length: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            allow: vec!["wikipedia".to_string()],
            deny: ["Special:", "User:", "Help:", "Main_Page", "github.com"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_href_length: 2000,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path of the JSON page-to-links artifact
    pub artifact_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            artifact_path: "pageLinkMapping.json".to_string(),
        }
    }
}

/// Publishing server configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct ServerConfig {
    /// Address the server binds to (host:port)
    pub bind: String,

    /// Static viewer document served at `/`
    pub viewer_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            viewer_path: "public/index.html".to_string(),
        }
    }
}
