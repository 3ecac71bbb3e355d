use serde::Deserialize;

/// Main configuration structure for Classifind
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    pub crawl: CrawlConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Marketplace the adapter talks to
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Site root, e.g. "http://www.avito.ru"
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Region path segment every search is scoped to
    pub location: String,
}

/// Search space and filters for one crawl session
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Each entry is one search, given as its list of terms
    pub queries: Vec<Vec<String>>,

    /// Categories every query is run against
    pub categories: Vec<String>,

    /// Upper bound on pages fetched per (query, category) pair
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Lowest accepted price (inclusive)
    #[serde(rename = "min-price", default)]
    pub min_price: u64,

    /// Highest accepted price (inclusive); zero or negative disables the bound
    #[serde(rename = "max-price", default)]
    pub max_price: i64,

    /// Pause between page fetches (milliseconds)
    #[serde(rename = "page-delay", default = "default_page_delay")]
    pub page_delay: u64,
}

fn default_page_delay() -> u64 {
    1000
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

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Directory that receives one subdirectory of photos per item
    #[serde(rename = "photo-dir")]
    pub photo_dir: String,
}
