//! Backmap: a polite breadth-first backlink mapper
//!
//! This crate implements a single-process web crawler that walks pages out
//! from a seed URL, extracts inter-page links, and persists page metadata and
//! a backlink graph into an external wide-column store reached over HTTP.

pub mod blacklist;
pub mod config;
pub mod crawler;
pub mod store;
pub mod url;

use thiserror::Error;

/// Main error type for Backmap operations
#[derive(Debug, Error)]
pub enum BackmapError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for Backmap operations
pub type Result<T> = std::result::Result<T, BackmapError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use blacklist::Blacklist;
pub use config::Config;
pub use url::{canonicalize, reverse_domain, LinkFilter};
