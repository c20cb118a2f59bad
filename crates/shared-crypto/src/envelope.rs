//! # Encryption Envelope
//!
//! Byte-level framing of encrypted content:
//!
//! ```text
//! tagged:  [ TAG (8) | nonce (24) | ciphertext ... ]
//! legacy:  [ nonce (24) | ciphertext ... ]
//! ```
//!
//! Detection only looks at the leading tag. Anything that does not start with
//! it is read as the legacy layout, so untagged plaintext is indistinguishable
//! from legacy ciphertext and will simply fail authentication.

use crate::symmetric::{decrypt, encrypt_with_nonce, Nonce, SecretKey, NONCE_LEN};
use crate::CryptoError;

/// Length of the format tag.
pub const TAG_LEN: usize = 8;

/// Fixed ASCII tag of the tagged format.
pub const ENVELOPE_TAG: [u8; TAG_LEN] = *b"LLENCv01";

/// Detected envelope layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvelopeFormat {
    /// Tag, nonce, ciphertext.
    Tagged,
    /// Nonce, ciphertext.
    Legacy,
}

/// A parsed envelope borrowing its ciphertext.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope<'a> {
    /// Detected layout.
    pub format: EnvelopeFormat,
    /// Nonce.
    pub nonce: Nonce,
    /// Ciphertext including the authentication tag.
    pub ciphertext: &'a [u8],
}

impl Envelope<'_> {
    /// Authenticate and decrypt.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::DecryptionFailed` on a wrong key or corrupted data.
    pub fn open(&self, key: &SecretKey) -> Result<Vec<u8>, CryptoError> {
        decrypt(key, self.ciphertext, &self.nonce)
    }
}

/// Split raw bytes into nonce and ciphertext.
///
/// # Errors
///
/// Returns `CryptoError::EnvelopeTooShort` when fewer than [`NONCE_LEN`] bytes
/// remain for the legacy layout.
pub fn parse_envelope(bytes: &[u8]) -> Result<Envelope<'_>, CryptoError> {
    if bytes.len() >= TAG_LEN + NONCE_LEN && bytes[..TAG_LEN] == ENVELOPE_TAG {
        let (nonce, ciphertext) = bytes[TAG_LEN..].split_at(NONCE_LEN);
        return Ok(Envelope {
            format: EnvelopeFormat::Tagged,
            nonce: Nonce::from_slice(nonce)?,
            ciphertext,
        });
    }
    if bytes.len() < NONCE_LEN {
        return Err(CryptoError::EnvelopeTooShort { len: bytes.len() });
    }
    let (nonce, ciphertext) = bytes.split_at(NONCE_LEN);
    Ok(Envelope {
        format: EnvelopeFormat::Legacy,
        nonce: Nonce::from_slice(nonce)?,
        ciphertext,
    })
}

/// Encrypt and frame plaintext in the tagged format.
///
/// # Errors
///
/// Returns `CryptoError::EncryptionFailed` if encryption fails.
pub fn seal_envelope(
    plaintext: &[u8],
    key: &SecretKey,
    nonce: &Nonce,
) -> Result<Vec<u8>, CryptoError> {
    let ciphertext = encrypt_with_nonce(key, nonce, plaintext)?;
    let mut out = Vec::with_capacity(TAG_LEN + NONCE_LEN + ciphertext.len());
    out.extend_from_slice(&ENVELOPE_TAG);
    out.extend_from_slice(nonce.as_bytes());
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// [`seal_envelope`] under a fresh random nonce.
///
/// # Errors
///
/// Returns `CryptoError::EncryptionFailed` if encryption fails.
pub fn seal_with_random_nonce(plaintext: &[u8], key: &SecretKey) -> Result<Vec<u8>, CryptoError> {
    seal_envelope(plaintext, key, &Nonce::generate())
}
