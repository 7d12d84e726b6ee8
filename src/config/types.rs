use serde::Deserialize;

/// Main configuration structure for Backmap
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub blacklist: BlacklistConfig,
}

/// Remote store connection and table names
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the store HTTP API
    pub endpoint: String,

    /// Table holding page records and the backlink graph
    #[serde(rename = "main-table")]
    pub main_table: String,

    /// Table holding the frontier queue
    #[serde(rename = "queue-table")]
    pub queue_table: String,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Entry-point URL, crawled (forced) whenever the frontier is empty
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// When set, only this host and its sub-domains are followed
    #[serde(rename = "scope-root")]
    pub scope_root: Option<String>,

    /// Whether canonical keys carry the URL path (per-page rows) or only
    /// the reversed host (one row per site)
    #[serde(rename = "store-sub-pages")]
    pub store_sub_pages: bool,

    /// Whether the raw HTML body is persisted alongside the metadata
    #[serde(rename = "store-full-document")]
    pub store_full_document: bool,

    /// Number of concurrent crawl attempts per round
    pub parallelism: usize,

    /// Maximum number of rounds before the crawl stops
    #[serde(rename = "max-rounds")]
    pub max_rounds: u32,

    /// Time budget for one page fetch (milliseconds)
    #[serde(rename = "fetch-timeout-ms", default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
}

fn default_fetch_timeout_ms() -> u64 {
    5000
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Blacklist persistence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BlacklistConfig {
    /// Path to the line-delimited blacklist log
    pub path: String,
}
