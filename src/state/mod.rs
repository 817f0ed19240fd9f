//! Result types for identifier lookups and batches
//!
//! This module contains:
//! - `ItemOutcome`: the result of resolving one identifier
//! - `BatchResult`: the ordered outcomes of a batch with its statistics

mod batch;
mod outcome;

pub use batch::{BatchResult, BatchStatistics};
pub use outcome::{FailureReason, ItemOutcome};
