//! Configuration module for Backmap
//!
//! Configuration is loaded once at startup from a TOML file, validated, and
//! never mutated at runtime.

mod parser;
mod types;
mod validation;

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{BlacklistConfig, Config, CrawlerConfig, StoreConfig, UserAgentConfig};
pub use validation::validate;
