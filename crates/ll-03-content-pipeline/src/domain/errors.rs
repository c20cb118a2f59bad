//! # Domain Errors
//!
//! Operation-level failures of the content pipeline. A failed decryption is
//! not an error; see [`DecryptOutcome`](super::DecryptOutcome).

use shared_crypto::CryptoError;
use shared_types::LedgerError;
use thiserror::Error;

/// Content pipeline error types.
#[derive(Debug, Clone, Error)]
pub enum ContentError {
    /// Empty content id or incomplete key material; nothing was fetched.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Sealing new content failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// No blob is stored under the content id.
    #[error("Content not found: {0}")]
    NotFound(String),

    /// The storage collaborator failed.
    #[error("Storage error: {0}")]
    Storage(LedgerError),
}

impl ContentError {
    /// Map a storage failure for `content_id`.
    pub fn from_storage(content_id: &str, error: LedgerError) -> Self {
        if error.is_not_found() {
            ContentError::NotFound(content_id.to_string())
        } else {
            ContentError::Storage(error)
        }
    }
}
