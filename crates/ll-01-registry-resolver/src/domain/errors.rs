//! # Domain Errors
//!
//! Error types for registry resolution. Only whole-resolution failures are
//! errors; per-item problems are logged and skipped.

use shared_types::LedgerError;
use thiserror::Error;

/// Registry resolver error types.
#[derive(Debug, Clone, Error)]
pub enum ResolverError {
    /// The configured registry object does not exist.
    #[error("Registry not found: {0}")]
    RegistryNotFound(String),

    /// The registry exists but is not the expected structured object.
    #[error("Registry {registry_id} is malformed: {reason}")]
    RegistryMalformed {
        /// Registry object id.
        registry_id: String,
        /// What was wrong.
        reason: String,
    },

    /// A collaborator call needed by the whole resolution failed.
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
