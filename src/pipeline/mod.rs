//! Retrieval pipeline for certificate pages
//!
//! This module contains the batch retrieval logic, including:
//! - The network transport and its reqwest implementation
//! - Page fetching with a bounded retry state machine
//! - Single-identifier resolution (fetch, then extract)
//! - Batch orchestration over a per-batch worker pool
//! - Cooperative cancellation of running batches

mod cancel;
mod fetcher;
mod orchestrator;
mod resolver;
mod retry;
mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use cancel::CancelSignal;
pub use fetcher::{Document, FetchOutcome, Fetcher};
pub use orchestrator::{BatchOrchestrator, ExecutionMode};
pub use resolver::Resolver;
pub use retry::{RetryPolicy, RetryState};
pub use transport::{build_http_client, HttpTransport, Transport, TransportErrorKind};
