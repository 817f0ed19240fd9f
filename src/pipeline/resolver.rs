//! Single-identifier resolution: fetch, then extract

use crate::certificate::{extract, FieldLocator};
use crate::config::Config;
use crate::pipeline::{CancelSignal, FetchOutcome, Fetcher, RetryPolicy, Transport};
use crate::state::{FailureReason, ItemOutcome};
use crate::{ConfigError, Identifier};

/// Turns an identifier into an [`ItemOutcome`]
///
/// Holds no mutable state, so one resolver can serve many identifiers
/// concurrently.
#[derive(Debug)]
pub struct Resolver<T> {
    fetcher: Fetcher<T>,
    locator: FieldLocator,
}

impl<T: Transport> Resolver<T> {
    pub fn new(fetcher: Fetcher<T>, locator: FieldLocator) -> Self {
        Self { fetcher, locator }
    }

    /// Builds a resolver from the portal and retry settings
    pub fn from_config(transport: T, config: &Config) -> Result<Self, ConfigError> {
        let locator = FieldLocator::new(&config.portal.field_prefix)?;
        let fetcher = Fetcher::new(
            transport,
            config.portal.base_url.clone(),
            RetryPolicy::from(&config.retry),
        );
        Ok(Self::new(fetcher, locator))
    }

    pub fn fetcher(&self) -> &Fetcher<T> {
        &self.fetcher
    }

    /// Fetches and extracts the certificate for `identifier`
    ///
    /// Exhausted retries become `FetchFailed` without running the extractor.
    pub async fn resolve(&self, identifier: Identifier) -> ItemOutcome {
        match self.fetcher.fetch(identifier).await {
            FetchOutcome::Success(document) => extract(&document, identifier, &self.locator),
            FetchOutcome::ExhaustedRetries {
                attempts,
                last_error,
            } => ItemOutcome::FetchFailed {
                identifier,
                reason: FailureReason::Network {
                    attempts,
                    last_error: last_error.kind(),
                },
            },
            FetchOutcome::TransientFailure(error) => ItemOutcome::FetchFailed {
                identifier,
                reason: FailureReason::Network {
                    attempts: 1,
                    last_error: error.kind(),
                },
            },
        }
    }

    /// Like [`resolve`](Self::resolve), but abandons the lookup once `cancel` fires
    pub async fn resolve_or_cancel(
        &self,
        identifier: Identifier,
        cancel: &CancelSignal,
    ) -> ItemOutcome {
        if cancel.is_cancelled() {
            return ItemOutcome::cancelled(identifier);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(identifier, "Lookup cancelled");
                ItemOutcome::cancelled(identifier)
            }
            outcome = self.resolve(identifier) => outcome,
        }
    }
}
