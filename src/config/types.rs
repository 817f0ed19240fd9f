use serde::Deserialize;
use std::time::Duration;

/// Default detail endpoint; the identifier is appended as decimal digits
pub const DEFAULT_BASE_URL: &str =
    "http://www.pace.sep.gob.mx/certificadosdgb/certificadoremesadetalles/";

/// Default id prefix shared by every certificate field node
pub const DEFAULT_FIELD_PREFIX: &str = "#_s_com_dgb_sep_domain_CertificadoRemesaDetalle_";

/// Main configuration structure for Certfetch
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub portal: PortalConfig,
    pub retry: RetryConfig,
    pub batch: BatchConfig,
}

/// Where and how certificate pages are requested
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Endpoint the identifier is appended to
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Selector prefix of the certificate field nodes
    #[serde(rename = "field-prefix")]
    pub field_prefix: String,

    /// Per-request timeout (milliseconds)
    #[serde(rename = "request-timeout-ms")]
    pub request_timeout_ms: u64,

    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl PortalConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            field_prefix: DEFAULT_FIELD_PREFIX.to_string(),
            request_timeout_ms: 10_000,
            user_agent: format!("certfetch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Retry behavior for transient network failures
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per identifier, including the first one
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Fixed delay between attempts (milliseconds); 0 retries immediately
    #[serde(rename = "backoff-ms")]
    pub backoff_ms: u64,
}

impl RetryConfig {
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            backoff_ms: 0,
        }
    }
}

/// Batch sizing and parallelism
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of sequential identifiers in one batch
    #[serde(rename = "batch-size")]
    pub batch_size: u64,

    /// Upper bound on concurrent lookups; 0 uses the host's parallelism
    #[serde(rename = "max-workers")]
    pub max_workers: usize,
}

impl BatchConfig {
    /// Resolves the effective worker count for concurrent batches
    pub fn worker_count(&self) -> usize {
        if self.max_workers > 0 {
            return self.max_workers;
        }

        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_workers: 0,
        }
    }
}
