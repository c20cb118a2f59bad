//! # Error Types
//!
//! Errors raised by the ledger and storage collaborators.

use thiserror::Error;

/// Collaborator failure, as seen by the subsystems.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Object, field or blob does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transport failure.
    #[error("Network error: {0}")]
    Network(String),

    /// The collaborator timed out.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The node answered with a JSON-RPC error.
    #[error("RPC error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// Error message.
        message: String,
    },

    /// The response did not have the expected shape.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Signing or submission was refused; carries the raw message.
    #[error("Submission failed: {0}")]
    Submission(String),
}

impl LedgerError {
    /// Is this a "does not exist" answer, as opposed to a transient failure?
    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::NotFound(_))
    }

    /// Could retrying plausibly succeed?
    pub fn is_transient(&self) -> bool {
        matches!(self, LedgerError::Network(_) | LedgerError::Timeout(_))
    }
}
