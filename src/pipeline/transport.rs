//! Network transport for certificate pages
//!
//! The fetcher reaches the portal through the `Transport` trait so the retry
//! logic can be exercised with scripted transports. `HttpTransport` is the
//! reqwest-backed implementation used in production.

use crate::config::PortalConfig;
use crate::TransportError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::fmt;

/// Classification of a failed attempt, as reported in logs and outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorKind {
    /// Connection could not be established
    Connect,
    /// No response within the request timeout
    Timeout,
    /// Any other failure while sending or reading the response
    Request,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Connect => "connect",
            Self::Timeout => "timeout",
            Self::Request => "request",
        };
        f.write_str(s)
    }
}

/// Performs a single GET and returns the response body
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches `url` once, without retrying
    ///
    /// Any HTTP status counts as a response: the body is returned and the
    /// extractor decides whether it holds a certificate.
    async fn get(&self, url: &str) -> Result<String, TransportError>;
}

/// Builds an HTTP client with the portal's timeout and user agent
///
/// # Arguments
///
/// * `config` - The portal configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use certfetch::config::PortalConfig;
/// use certfetch::pipeline::build_http_client;
///
/// let client = build_http_client(&PortalConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &PortalConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.request_timeout())
        .connect_timeout(config.request_timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport configured from the portal settings
    pub fn new(config: &PortalConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Wraps an already configured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String, TransportError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(url, status = status.as_u16(), "Non-success status from portal");
        }

        Ok(response.text().await?)
    }
}
