//! Crawler module: the incremental crawl and deduplication loop
//!
//! This module contains:
//! - [`CrawlParams`], the immutable search space of one session
//! - [`CrawlSession`], which pages through results, keeps the known-items
//!   set and triggers persistence and photo downloads
//! - Photo download helpers

mod page;
mod photos;
mod session;

pub use page::PageItems;
pub use photos::{download_photo, photo_file_name};
pub use session::CrawlSession;

use crate::config::Config;
use crate::item::PriceRange;
use std::path::PathBuf;
use std::time::Duration;

/// Search space and filters for one crawl session
#[derive(Debug, Clone)]
pub struct CrawlParams {
    /// Each entry is one search, given as its list of terms
    pub queries: Vec<Vec<String>>,
    pub categories: Vec<String>,
    /// Upper bound on pages fetched per (query, category) pair
    pub max_pages: u32,
    pub price: PriceRange,
    /// Pause after each page that produced new items
    pub page_delay: Duration,
    /// Root directory for per-item photo directories
    pub photo_dir: PathBuf,
}

impl CrawlParams {
    pub fn from_config(config: &Config) -> Self {
        Self {
            queries: config.crawl.queries.clone(),
            categories: config.crawl.categories.clone(),
            max_pages: config.crawl.max_pages,
            price: PriceRange::from_bounds(config.crawl.min_price, config.crawl.max_price),
            page_delay: Duration::from_millis(config.crawl.page_delay),
            photo_dir: PathBuf::from(&config.output.photo_dir),
        }
    }

    /// Number of (query, category) pairs the session will page through
    pub fn pair_count(&self) -> usize {
        self.queries.len() * self.categories.len()
    }
}
