//! Configuration module for Certfetch
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so an absent file means `Config::default()`.
//!
//! # Example
//!
//! ```no_run
//! use certfetch::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("certfetch.toml")).unwrap();
//! println!("Retrying up to {} times", config.retry.max_attempts);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BatchConfig, Config, PortalConfig, RetryConfig, DEFAULT_BASE_URL, DEFAULT_FIELD_PREFIX,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
