//! # Domain Errors
//!
//! Operation-level failures of the marketplace. Per-event problems while
//! reading feeds are logged and skipped, never surfaced here.

use shared_types::{LedgerError, UnknownLicenseType};
use thiserror::Error;

/// Why a submitted transaction did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionFailure {
    /// The user declined to sign. Informational.
    #[error("Transaction rejected by user")]
    UserRejected,

    /// Not enough funds for payment plus fees.
    #[error("Insufficient balance")]
    InsufficientBalance,

    /// Transport failure or timeout; retrying may succeed.
    #[error("Network error: {0}")]
    Network(String),

    /// Executed, but the ledger reported a failure status.
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// Anything else; carries the raw message.
    #[error("Transaction failed: {0}")]
    Unknown(String),
}

const REJECTION_MARKERS: &[&str] = &["rejected", "denied", "declined", "cancelled", "canceled"];
const BALANCE_MARKERS: &[&str] = &["insufficient", "not enough", "balance too low"];
const NETWORK_MARKERS: &[&str] = &["network", "timeout", "timed out", "connection", "failed to fetch"];

impl TransactionFailure {
    /// Classify a raw collaborator message.
    pub fn classify(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        let has = |markers: &[&str]| markers.iter().any(|m| lower.contains(m));
        if has(REJECTION_MARKERS) {
            TransactionFailure::UserRejected
        } else if has(BALANCE_MARKERS) {
            TransactionFailure::InsufficientBalance
        } else if has(NETWORK_MARKERS) {
            TransactionFailure::Network(raw.to_string())
        } else {
            TransactionFailure::Unknown(raw.to_string())
        }
    }

    /// Classify a failed `sign_and_submit` call.
    pub fn from_ledger(error: &LedgerError) -> Self {
        match error {
            LedgerError::Network(msg) | LedgerError::Timeout(msg) => {
                TransactionFailure::Network(msg.clone())
            }
            LedgerError::Submission(msg) | LedgerError::Rpc { message: msg, .. } => {
                Self::classify(msg)
            }
            other => Self::classify(&other.to_string()),
        }
    }

    /// Worth retrying (under the caller's one-in-flight discipline)?
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransactionFailure::Network(_))
    }

    /// Informational rather than an error to show.
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, TransactionFailure::UserRejected)
    }
}

/// Marketplace error types.
#[derive(Debug, Clone, Error)]
pub enum MarketplaceError {
    /// A required identifier is not configured.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The referenced object does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected locally before any network call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// License symbol outside the closed set.
    #[error(transparent)]
    InvalidLicense(#[from] UnknownLicenseType),

    /// The transaction was submitted and failed.
    #[error(transparent)]
    Transaction(#[from] TransactionFailure),

    /// A read needed by the operation failed.
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl MarketplaceError {
    /// Map a read failure on `id`, keeping "absent" distinct from transient.
    pub fn from_read(id: &str, error: LedgerError) -> Self {
        if error.is_not_found() {
            MarketplaceError::NotFound(id.to_string())
        } else {
            MarketplaceError::Ledger(error)
        }
    }
}
