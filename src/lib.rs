//! Certfetch: a batch retriever for public high-school certificate records
//!
//! This crate looks up certificate detail pages on the SEP portal by numeric
//! identifier, extracts the certificate fields from each page, and aggregates
//! the outcomes of whole batches of sequential identifiers.

pub mod certificate;
pub mod config;
pub mod output;
pub mod pipeline;
pub mod state;

use thiserror::Error;

/// Numeric key addressing one certificate lookup on the portal
pub type Identifier = u64;

/// Main error type for Certfetch operations
///
/// Only infrastructure problems surface here. Failures of individual
/// identifiers are reported as [`state::ItemOutcome::FetchFailed`].
#[derive(Debug, Error)]
pub enum CertError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Batch {batch_index} with size {batch_size} exceeds the identifier space")]
    BatchRange { batch_index: u64, batch_size: u64 },

    #[error("Worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("No outcome was collected for identifier {identifier}")]
    MissingOutcome { identifier: Identifier },

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

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid field selector: {0}")]
    InvalidSelector(String),
}

/// A single failed attempt to reach the portal
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(String),
}

impl TransportError {
    /// Returns the failure kind used in log lines and failure reasons
    pub fn kind(&self) -> pipeline::TransportErrorKind {
        match self {
            Self::Connect(_) => pipeline::TransportErrorKind::Connect,
            Self::Timeout => pipeline::TransportErrorKind::Timeout,
            Self::Request(_) => pipeline::TransportErrorKind::Request,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::Connect(error.to_string())
        } else {
            Self::Request(error.to_string())
        }
    }
}

/// Result type alias for Certfetch operations
pub type Result<T> = std::result::Result<T, CertError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use certificate::{CertificateRecord, Field, FieldLocator};
pub use config::Config;
pub use pipeline::{BatchOrchestrator, CancelSignal, ExecutionMode, HttpTransport, Resolver};
pub use state::{BatchResult, BatchStatistics, FailureReason, ItemOutcome};
