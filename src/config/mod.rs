//! Configuration module for Folio-Crawl
//!
//! This module handles loading, parsing, and validating TOML configuration files,
//! and defines the per-run crawl options supplied on the command line.
//!
//! # Example
//!
//! ```no_run
//! use folio_crawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("folio.toml")).unwrap();
//! println!("Fetch timeout: {}s", config.crawler.fetch_timeout_secs);
//! ```

mod options;
mod parser;
mod types;
mod validation;

// Re-export types
pub use options::CrawlOptions;
pub use types::{Config, CrawlerConfig, OutputConfig, SinkKind, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
