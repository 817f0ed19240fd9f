//! Page fetcher with bounded retry
//!
//! This module handles requesting the detail page of one identifier:
//! - Building the request URL from the base endpoint
//! - Retrying transient network failures up to the attempt ceiling
//! - Logging every failed attempt and the terminal failure

use crate::pipeline::retry::{RetryPolicy, RetryState};
use crate::pipeline::transport::{Transport, TransportErrorKind};
use crate::{Identifier, TransportError};

/// A fetched detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    url: String,
    body: String,
}

impl Document {
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
        }
    }

    /// URL the document was fetched from
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Raw HTML body
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Result of a fetch attempt or of a whole fetch sequence
#[derive(Debug)]
pub enum FetchOutcome {
    /// The portal answered; whether it holds a certificate is decided later
    Success(Document),

    /// A single attempt failed at the network level
    TransientFailure(TransportError),

    /// Every allowed attempt failed
    ExhaustedRetries {
        attempts: u32,
        last_error: TransportError,
    },
}

/// Fetches detail pages by identifier
#[derive(Debug, Clone)]
pub struct Fetcher<T> {
    transport: T,
    base_url: String,
    policy: RetryPolicy,
}

impl<T: Transport> Fetcher<T> {
    /// Creates a fetcher that appends identifiers to `base_url`
    pub fn new(transport: T, base_url: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            policy,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Builds the request URL: the identifier in decimal, without padding
    pub fn url_for(&self, identifier: Identifier) -> String {
        format!("{}{}", self.base_url, identifier)
    }

    /// Fetches the page for `identifier`, retrying transient failures
    ///
    /// # Returns
    ///
    /// * `FetchOutcome::Success` - The first attempt that got a response
    /// * `FetchOutcome::ExhaustedRetries` - All attempts failed
    ///
    /// `TransientFailure` is never returned; it only drives the retry state.
    pub async fn fetch(&self, identifier: Identifier) -> FetchOutcome {
        let url = self.url_for(identifier);
        let mut state = RetryState::start();

        loop {
            state = match state {
                RetryState::Attempting(attempt) => {
                    if attempt > 1 && !self.policy.backoff.is_zero() {
                        tokio::time::sleep(self.policy.backoff).await;
                    }

                    let outcome = self.attempt(identifier, &url, attempt).await;
                    RetryState::Attempting(attempt).transition(outcome, &self.policy)
                }
                RetryState::Succeeded(document) => return FetchOutcome::Success(document),
                RetryState::Exhausted {
                    attempts,
                    last_error,
                } => {
                    tracing::error!(
                        identifier,
                        attempts,
                        kind = %last_error.kind(),
                        error = %last_error,
                        "Connection error on {}",
                        identifier
                    );
                    return FetchOutcome::ExhaustedRetries {
                        attempts,
                        last_error,
                    };
                }
            };
        }
    }

    /// Performs one GET and classifies its result
    async fn attempt(&self, identifier: Identifier, url: &str, attempt: u32) -> FetchOutcome {
        match self.transport.get(url).await {
            Ok(body) => {
                tracing::debug!(identifier, attempt, "Opened URL {}", url);
                FetchOutcome::Success(Document::new(url, body))
            }
            Err(error) => {
                let kind = error.kind();
                let message = match kind {
                    TransportErrorKind::Timeout => "Timeout on page",
                    TransportErrorKind::Connect => "Failed to retrieve page",
                    TransportErrorKind::Request => "Request failed for page",
                };
                tracing::warn!(
                    identifier,
                    attempt,
                    max_attempts = self.policy.max_attempts,
                    kind = %kind,
                    error = %error,
                    "{} {}",
                    message,
                    identifier
                );
                FetchOutcome::TransientFailure(error)
            }
        }
    }
}
