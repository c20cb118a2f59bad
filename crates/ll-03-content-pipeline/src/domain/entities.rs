//! # Domain Entities
//!
//! What a caller supplies (key material) and what it gets back (an outcome).

use serde::{Deserialize, Serialize};
use shared_crypto::EnvelopeFormat;
use std::fmt;

/// Domain parameters the content key is derived from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMaterial {
    /// Task that owns the content.
    pub task_id: String,
    /// Address of the task's creator.
    pub creator: String,
}

impl KeyMaterial {
    /// Bundle key material.
    pub fn new(task_id: impl Into<String>, creator: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            creator: creator.into(),
        }
    }

    /// Both parts present?
    pub fn is_complete(&self) -> bool {
        !self.task_id.trim().is_empty() && !self.creator.trim().is_empty()
    }
}

/// Why no plaintext was produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecryptFailure {
    /// Authentication failed: wrong key or corrupted data.
    Authentication {
        /// Layout the blob was read as.
        format: EnvelopeFormat,
    },
    /// The blob is too short to hold a nonce.
    Truncated {
        /// Blob length.
        len: usize,
    },
}

impl fmt::Display for DecryptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecryptFailure::Authentication { format } => {
                write!(f, "authentication failed ({:?} envelope): wrong key or corrupted data", format)
            }
            DecryptFailure::Truncated { len } => write!(f, "blob of {} bytes is too short", len),
        }
    }
}

/// Result of a fetch-and-decrypt.
///
/// Callers must branch on this: `Failed` is never an empty success.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecryptOutcome {
    /// Decrypted content.
    Plaintext {
        /// Layout the blob was read as.
        format: EnvelopeFormat,
        /// Plaintext bytes.
        bytes: Vec<u8>,
    },
    /// No plaintext.
    Failed(DecryptFailure),
}

impl DecryptOutcome {
    /// Plaintext, if decryption succeeded.
    pub fn plaintext(&self) -> Option<&[u8]> {
        match self {
            DecryptOutcome::Plaintext { bytes, .. } => Some(bytes),
            DecryptOutcome::Failed(_) => None,
        }
    }

    /// Did decryption succeed?
    pub fn is_plaintext(&self) -> bool {
        matches!(self, DecryptOutcome::Plaintext { .. })
    }
}
