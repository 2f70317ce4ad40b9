//! Error taxonomy of a scan.
//!
//! Only [`ScanError`] ever reaches the caller of a batch. Everything a single
//! target can run into is a [`SessionError`], which the executor folds into
//! a terminal state and a diagnostic line.

use std::net::Ipv4Addr;

use thiserror::Error;

/// Conditions that abort a whole batch before any task is launched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("malformed target '{term}': {reason}")]
    MalformedTarget { term: String, reason: String },

    #[error("unknown method '{0}', expected Get or Walk")]
    UnknownMethod(String),

    #[error("unknown SNMP version '{0}', expected 1, 2c or 3")]
    UnknownVersion(String),
}

impl ScanError {
    pub fn malformed(term: &str, reason: impl Into<String>) -> Self {
        Self::MalformedTarget {
            term: term.to_string(),
            reason: reason.into(),
        }
    }
}

/// Per-target failures. Never fatal to the batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("{target}: error connecting: {reason}")]
    Connect { target: Ipv4Addr, reason: String },

    #[error("{target}: request failed: {reason}")]
    Query { target: Ipv4Addr, reason: String },

    #[error("{target}: error walking device: {reason}")]
    Walk { target: Ipv4Addr, reason: String },
}

impl SessionError {
    pub fn target(&self) -> Ipv4Addr {
        match self {
            Self::Connect { target, .. } | Self::Query { target, .. } | Self::Walk { target, .. } => {
                *target
            }
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
