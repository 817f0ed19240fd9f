//! Batch-level results and failure statistics

use crate::state::{FailureReason, ItemOutcome};
use crate::Identifier;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Outcome counts for one batch
///
/// `failed` merges every failure kind; the `failed_*` fields split it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchStatistics {
    pub total: u64,
    pub found: u64,
    pub not_found: u64,
    pub failed: u64,
    pub failed_network: u64,
    pub failed_page_shape: u64,
    pub failed_cancelled: u64,
}

impl BatchStatistics {
    /// Counts the outcomes of a batch
    pub fn from_outcomes(outcomes: &[ItemOutcome]) -> Self {
        let mut stats = Self {
            total: outcomes.len() as u64,
            ..Self::default()
        };

        for outcome in outcomes {
            match outcome {
                ItemOutcome::Found(_) => stats.found += 1,
                ItemOutcome::NotFound { .. } => stats.not_found += 1,
                ItemOutcome::FetchFailed { reason, .. } => {
                    stats.failed += 1;
                    match reason {
                        FailureReason::Network { .. } => stats.failed_network += 1,
                        FailureReason::PageShape { .. } => stats.failed_page_shape += 1,
                        FailureReason::Cancelled => stats.failed_cancelled += 1,
                    }
                }
            }
        }

        stats
    }

    /// Failed outcomes as a percentage of the batch size
    pub fn failure_rate(&self) -> f64 {
        percentage(self.failed, self.total)
    }

    /// Found outcomes as a percentage of the batch size
    pub fn found_rate(&self) -> f64 {
        percentage(self.found, self.total)
    }
}

fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}

/// The ordered outcomes of one batch plus derived statistics
///
/// `outcomes[i]` always belongs to identifier `first_identifier + i`.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub batch_index: u64,
    pub first_identifier: Identifier,
    pub outcomes: Vec<ItemOutcome>,
    pub stats: BatchStatistics,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl BatchResult {
    pub fn new(
        batch_index: u64,
        first_identifier: Identifier,
        outcomes: Vec<ItemOutcome>,
        started_at: DateTime<Utc>,
        elapsed: Duration,
    ) -> Self {
        let stats = BatchStatistics::from_outcomes(&outcomes);

        Self {
            batch_index,
            first_identifier,
            outcomes,
            stats,
            started_at,
            completed_at: Utc::now(),
            elapsed,
        }
    }

    /// Returns the outcome for `identifier`, if it belongs to this batch
    pub fn outcome(&self, identifier: Identifier) -> Option<&ItemOutcome> {
        let position = identifier.checked_sub(self.first_identifier)?;
        self.outcomes.get(usize::try_from(position).ok()?)
    }

    /// Iterates over the extracted records in identifier order
    pub fn records(&self) -> impl Iterator<Item = &crate::CertificateRecord> {
        self.outcomes.iter().filter_map(ItemOutcome::record)
    }

    /// Identifiers that ended in a failure, in ascending order
    pub fn failed_identifiers(&self) -> Vec<Identifier> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.is_failed())
            .map(ItemOutcome::identifier)
            .collect()
    }

    /// Average number of identifiers resolved per second
    pub fn items_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.stats.total as f64 / secs
        } else {
            0.0
        }
    }

    /// Logs the failure summary when at least one identifier failed
    pub fn log_failures(&self) {
        if self.stats.failed == 0 {
            return;
        }

        tracing::warn!(
            batch = self.batch_index,
            failed = self.stats.failed,
            network = self.stats.failed_network,
            page_shape = self.stats.failed_page_shape,
            cancelled = self.stats.failed_cancelled,
            "{} elements could not be obtained",
            self.stats.failed
        );
        tracing::warn!(
            batch = self.batch_index,
            failure_rate = self.stats.failure_rate(),
            "{:.1}% failure rate",
            self.stats.failure_rate()
        );
    }
}
