//! # Symmetric Encryption
//!
//! XChaCha20-Poly1305 with a 24-byte nonce.
//!
//! ## Security Properties
//!
//! - **XChaCha20-Poly1305**: 192-bit nonce, safe to generate at random
//! - A failed authentication check is reported, never partially decrypted

use crate::CryptoError;
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use zeroize::Zeroize;

/// Key length in bytes.
pub const KEY_LEN: usize = 32;

/// Nonce length in bytes.
pub const NONCE_LEN: usize = 24;

/// Secret key (256-bit).
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretKey([u8; KEY_LEN]);

impl SecretKey {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Generate random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
        Self(bytes)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

/// Nonce for encryption.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nonce([u8; NONCE_LEN]);

impl Nonce {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; NONCE_LEN]) -> Self {
        Self(bytes)
    }

    /// Create from a slice of exactly [`NONCE_LEN`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; NONCE_LEN] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidNonceLength {
                    expected: NONCE_LEN,
                    actual: bytes.len(),
                })?;
        Ok(Self(array))
    }

    /// Generate random nonce.
    pub fn generate() -> Self {
        let mut bytes = [0u8; NONCE_LEN];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
        Self(bytes)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }
}

/// Encrypt plaintext under a fresh random nonce.
///
/// Returns (ciphertext, nonce).
///
/// # Errors
///
/// Returns `CryptoError::EncryptionFailed` if encryption fails.
pub fn encrypt(key: &SecretKey, plaintext: &[u8]) -> Result<(Vec<u8>, Nonce), CryptoError> {
    let nonce = Nonce::generate();
    let ciphertext = encrypt_with_nonce(key, &nonce, plaintext)?;
    Ok((ciphertext, nonce))
}

/// Encrypt plaintext under a caller-chosen nonce.
///
/// # Errors
///
/// Returns `CryptoError::EncryptionFailed` if encryption fails.
pub fn encrypt_with_nonce(
    key: &SecretKey,
    nonce: &Nonce,
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());
    cipher
        .encrypt(XNonce::from_slice(nonce.as_bytes()), plaintext)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))
}

/// Decrypt ciphertext.
///
/// # Errors
///
/// Returns `CryptoError::DecryptionFailed` if the authentication check fails.
pub fn decrypt(key: &SecretKey, ciphertext: &[u8], nonce: &Nonce) -> Result<Vec<u8>, CryptoError> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());

    cipher
        .decrypt(XNonce::from_slice(nonce.as_bytes()), ciphertext)
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
}
