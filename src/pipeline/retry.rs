//! Bounded retry state machine for page fetches
//!
//! ```text
//! Attempting(1) --failure--> Attempting(2) --failure--> ... --failure--> Exhausted
//!       |                          |                          |
//!    success                    success                    success
//!       v                          v                          v
//!   Succeeded                  Succeeded                  Succeeded
//! ```

use crate::config::RetryConfig;
use crate::pipeline::{Document, FetchOutcome};
use crate::TransportError;
use std::time::Duration;

/// How many attempts a fetch gets and how long to wait between them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,

    /// Delay before each retry
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Retries immediately, up to `max_attempts` total attempts
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff: Duration::ZERO,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            backoff: config.backoff(),
        }
    }
}

/// State of one identifier's fetch sequence
#[derive(Debug)]
pub enum RetryState {
    /// About to make the given attempt (1-based)
    Attempting(u32),

    /// An attempt returned a document
    Succeeded(Document),

    /// Every attempt failed
    Exhausted {
        attempts: u32,
        last_error: TransportError,
    },
}

impl RetryState {
    /// The state before the first attempt
    pub fn start() -> Self {
        Self::Attempting(1)
    }

    /// Advances the state with the outcome of the current attempt
    ///
    /// Terminal states are returned unchanged.
    pub fn transition(self, outcome: FetchOutcome, policy: &RetryPolicy) -> Self {
        let attempt = match self {
            Self::Attempting(attempt) => attempt,
            terminal => return terminal,
        };

        match outcome {
            FetchOutcome::Success(document) => Self::Succeeded(document),
            FetchOutcome::TransientFailure(_) if attempt < policy.max_attempts => {
                Self::Attempting(attempt + 1)
            }
            FetchOutcome::TransientFailure(last_error) => Self::Exhausted {
                attempts: attempt,
                last_error,
            },
            FetchOutcome::ExhaustedRetries {
                attempts,
                last_error,
            } => Self::Exhausted {
                attempts,
                last_error,
            },
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Attempting(_))
    }
}
