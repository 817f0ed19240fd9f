//! Per-identifier outcome definitions
//!
//! This module defines every result a single identifier lookup can end in.

use crate::certificate::{CertificateRecord, Field};
use crate::pipeline::TransportErrorKind;
use crate::Identifier;
use serde::Serialize;
use std::fmt;

/// The result of resolving one identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
    /// A complete certificate was extracted
    Found(CertificateRecord),

    /// The portal has no certificate under this identifier
    NotFound { identifier: Identifier },

    /// The certificate could not be obtained
    FetchFailed {
        identifier: Identifier,
        reason: FailureReason,
    },
}

/// Why an identifier ended in [`ItemOutcome::FetchFailed`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    /// Every attempt failed at the network level
    Network {
        attempts: u32,
        last_error: TransportErrorKind,
    },

    /// The record exists but a field node is missing from the page
    PageShape { missing: Field },

    /// The batch was cancelled before this identifier resolved
    Cancelled,
}

impl ItemOutcome {
    /// Returns the identifier this outcome belongs to
    pub fn identifier(&self) -> Identifier {
        match self {
            Self::Found(record) => record.identifier,
            Self::NotFound { identifier } | Self::FetchFailed { identifier, .. } => *identifier,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::FetchFailed { .. })
    }

    /// Returns the extracted record, if any
    pub fn record(&self) -> Option<&CertificateRecord> {
        match self {
            Self::Found(record) => Some(record),
            _ => None,
        }
    }

    /// Returns the failure reason, if the lookup failed
    pub fn failure(&self) -> Option<FailureReason> {
        match self {
            Self::FetchFailed { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    /// Builds the outcome reported for identifiers abandoned by cancellation
    pub fn cancelled(identifier: Identifier) -> Self {
        Self::FetchFailed {
            identifier,
            reason: FailureReason::Cancelled,
        }
    }
}

impl fmt::Display for ItemOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(record) => write!(f, "{}: found (folio {})", record.identifier, record.folio),
            Self::NotFound { identifier } => write!(f, "{}: not found", identifier),
            Self::FetchFailed { identifier, reason } => {
                write!(f, "{}: failed ({})", identifier, reason)
            }
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network {
                attempts,
                last_error,
            } => write!(f, "{} after {} attempts", last_error, attempts),
            Self::PageShape { missing } => write!(f, "page missing {}", missing),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}
