//! Batch orchestration - resolves a numbered range of identifiers
//!
//! This module contains the batch driver, which:
//! - Computes the identifier range of a batch
//! - Resolves every identifier sequentially or on a bounded worker pool
//! - Reassembles outcomes in ascending identifier order
//! - Summarizes and logs failures

use crate::config::{BatchConfig, Config};
use crate::pipeline::{CancelSignal, HttpTransport, Resolver, Transport};
use crate::state::{BatchResult, ItemOutcome};
use crate::{CertError, Identifier};
use chrono::Utc;
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// How the identifiers of a batch are dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One identifier at a time, in ascending order
    Sequential,

    /// Up to the configured worker count at once
    Concurrent,
}

impl From<bool> for ExecutionMode {
    /// Maps a "concurrent" flag to a mode
    fn from(concurrent: bool) -> Self {
        if concurrent {
            Self::Concurrent
        } else {
            Self::Sequential
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => f.write_str("sequential"),
            Self::Concurrent => f.write_str("concurrent"),
        }
    }
}

/// Runs batches of identifier lookups
pub struct BatchOrchestrator<T> {
    resolver: Arc<Resolver<T>>,
    config: BatchConfig,
}

impl BatchOrchestrator<HttpTransport> {
    /// Builds an orchestrator that talks to the portal over HTTP
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid or the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, CertError> {
        crate::config::validate(config)?;
        let transport = HttpTransport::new(&config.portal)?;
        let resolver = Resolver::from_config(transport, config)?;
        Ok(Self::new(resolver, config.batch.clone()))
    }
}

impl<T: Transport + 'static> BatchOrchestrator<T> {
    pub fn new(resolver: Resolver<T>, config: BatchConfig) -> Self {
        Self {
            resolver: Arc::new(resolver),
            config,
        }
    }

    /// Number of identifiers in every batch
    pub fn batch_size(&self) -> u64 {
        self.config.batch_size
    }

    /// Upper bound on concurrent lookups in concurrent mode
    pub fn worker_count(&self) -> usize {
        self.config.worker_count()
    }

    /// Inclusive identifier range covered by `batch_index`
    ///
    /// # Errors
    ///
    /// Returns `CertError::BatchRange` if the range does not fit the
    /// identifier space or the batch size is zero.
    pub fn identifier_range(
        &self,
        batch_index: u64,
    ) -> Result<RangeInclusive<Identifier>, CertError> {
        let batch_size = self.config.batch_size;
        let out_of_range = || CertError::BatchRange {
            batch_index,
            batch_size,
        };

        let start = batch_index.checked_mul(batch_size).ok_or_else(out_of_range)?;
        let end = batch_size
            .checked_sub(1)
            .and_then(|span| start.checked_add(span))
            .ok_or_else(out_of_range)?;

        Ok(start..=end)
    }

    /// Resolves a single identifier outside of any batch
    pub async fn resolve(&self, identifier: Identifier) -> ItemOutcome {
        self.resolver.resolve(identifier).await
    }

    /// Resolves every identifier of `batch_index`
    ///
    /// Item failures are part of the returned result; only infrastructure
    /// problems produce an error.
    pub async fn run_batch(
        &self,
        batch_index: u64,
        mode: ExecutionMode,
    ) -> Result<BatchResult, CertError> {
        self.run_batch_with_cancel(batch_index, mode, &CancelSignal::new())
            .await
    }

    /// Like [`run_batch`](Self::run_batch), stopping early once `cancel` fires
    ///
    /// Identifiers left unresolved are reported as cancelled failures, so the
    /// result still holds one outcome per identifier.
    pub async fn run_batch_with_cancel(
        &self,
        batch_index: u64,
        mode: ExecutionMode,
        cancel: &CancelSignal,
    ) -> Result<BatchResult, CertError> {
        let range = self.identifier_range(batch_index)?;
        let first = *range.start();
        let started_at = Utc::now();
        let timer = Instant::now();

        tracing::info!(
            batch = batch_index,
            first,
            last = *range.end(),
            mode = %mode,
            "Starting batch number {}",
            batch_index
        );

        let outcomes = match mode {
            ExecutionMode::Sequential => self.run_sequential(range, cancel).await,
            ExecutionMode::Concurrent => self.run_concurrent(range, cancel).await?,
        };

        let result = BatchResult::new(batch_index, first, outcomes, started_at, timer.elapsed());

        tracing::info!(
            batch = batch_index,
            found = result.stats.found,
            not_found = result.stats.not_found,
            failed = result.stats.failed,
            elapsed_ms = result.elapsed.as_millis() as u64,
            "Completed batch number {}",
            batch_index
        );
        result.log_failures();

        Ok(result)
    }

    async fn run_sequential(
        &self,
        range: RangeInclusive<Identifier>,
        cancel: &CancelSignal,
    ) -> Vec<ItemOutcome> {
        let mut outcomes = Vec::new();
        for identifier in range {
            outcomes.push(self.resolver.resolve_or_cancel(identifier, cancel).await);
        }
        outcomes
    }

    /// Fans the range out over a per-batch worker pool
    ///
    /// Each outcome lands in the slot at `identifier - first`, so completion
    /// order does not affect the result order.
    async fn run_concurrent(
        &self,
        range: RangeInclusive<Identifier>,
        cancel: &CancelSignal,
    ) -> Result<Vec<ItemOutcome>, CertError> {
        let first = *range.start();
        let workers = self.worker_count().max(1);
        let semaphore = Arc::new(Semaphore::new(workers));
        let mut tasks = JoinSet::new();

        tracing::debug!(workers, "Dispatching batch to worker pool");

        for identifier in range.clone() {
            let resolver = Arc::clone(&self.resolver);
            let semaphore = Arc::clone(&semaphore);
            let cancel = cancel.clone();

            tasks.spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => resolver.resolve_or_cancel(identifier, &cancel).await,
                    Err(_) => ItemOutcome::cancelled(identifier),
                };
                (identifier, outcome)
            });
        }

        let mut slots: Vec<Option<ItemOutcome>> = range.clone().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            let (identifier, outcome) = joined?;
            if let Some(slot) = usize::try_from(identifier - first)
                .ok()
                .and_then(|position| slots.get_mut(position))
            {
                *slot = Some(outcome);
            }
        }

        range
            .zip(slots)
            .map(|(identifier, slot)| slot.ok_or(CertError::MissingOutcome { identifier }))
            .collect()
    }
}
