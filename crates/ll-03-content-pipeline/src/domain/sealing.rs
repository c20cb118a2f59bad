//! # Open / Seal
//!
//! Pure functions over blob bytes. The legacy fallback is kept as-is: bytes
//! without the tag are always read as `nonce ‖ ciphertext`, which means an
//! unencrypted blob is reported as an authentication failure rather than
//! recognised. Do not add heuristics here without a format version bump.

use shared_crypto::{
    derive_content_key, parse_envelope, seal_envelope, seal_with_random_nonce, CryptoError, Nonce,
    SecretKey,
};
use tracing::debug;

use super::{DecryptFailure, DecryptOutcome, KeyMaterial};

/// Derive the key for `material` under `domain`.
pub fn content_key(domain: &str, material: &KeyMaterial) -> SecretKey {
    derive_content_key(domain, &material.task_id, &material.creator)
}

/// Detect the envelope and decrypt.
pub fn open_content(bytes: &[u8], key: &SecretKey) -> DecryptOutcome {
    let envelope = match parse_envelope(bytes) {
        Ok(envelope) => envelope,
        Err(_) => return DecryptOutcome::Failed(DecryptFailure::Truncated { len: bytes.len() }),
    };
    debug!(
        "[ll-03] {:?} envelope, {} ciphertext bytes",
        envelope.format,
        envelope.ciphertext.len()
    );
    match envelope.open(key) {
        Ok(plaintext) => DecryptOutcome::Plaintext {
            format: envelope.format,
            bytes: plaintext,
        },
        Err(_) => DecryptOutcome::Failed(DecryptFailure::Authentication {
            format: envelope.format,
        }),
    }
}

/// Seal plaintext in the tagged format under a fresh nonce.
pub fn seal_content(plaintext: &[u8], key: &SecretKey) -> Result<Vec<u8>, CryptoError> {
    seal_with_random_nonce(plaintext, key)
}

/// Seal plaintext in the tagged format under a caller-chosen nonce.
pub fn seal_content_with_nonce(
    plaintext: &[u8],
    key: &SecretKey,
    nonce: &Nonce,
) -> Result<Vec<u8>, CryptoError> {
    seal_envelope(plaintext, key, nonce)
}
