//! Configuration module for Classifind
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use classifind::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("classifind.toml")).unwrap();
//! println!("Crawling up to {} pages per query", config.crawl.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlConfig, OutputConfig, SiteConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
