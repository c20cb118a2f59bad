//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption failed (authentication check did not pass)
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// Invalid nonce length
    #[error("Invalid nonce length: expected {expected}, got {actual}")]
    InvalidNonceLength {
        /// Expected nonce length in bytes
        expected: usize,
        /// Actual nonce length in bytes
        actual: usize,
    },

    /// Envelope shorter than a nonce
    #[error("Envelope too short: {len} bytes")]
    EnvelopeTooShort {
        /// Actual envelope length in bytes
        len: usize,
    },
}
