//! # Shared Crypto - Content Envelope Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `envelope` | tag ‖ nonce ‖ ciphertext framing | Format detection, sealing |
//! | `hashing` | SHA-256 | Deterministic content-key derivation |
//! | `symmetric` | XChaCha20-Poly1305 | Authenticated encryption |
//!
//! ## Security Properties
//!
//! - **XChaCha20-Poly1305**: 192-bit nonce, constant-time, authenticated
//! - **SHA-256**: Collision-resistant key derivation over domain ‖ task ‖ creator
//! - Key material is zeroized on drop

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod envelope;
pub mod errors;
pub mod hashing;
pub mod symmetric;

// Re-exports
pub use envelope::{
    parse_envelope, seal_envelope, seal_with_random_nonce, Envelope, EnvelopeFormat,
    ENVELOPE_TAG, TAG_LEN,
};
pub use errors::CryptoError;
pub use hashing::{derive_content_key, sha256};
pub use symmetric::{decrypt, encrypt, encrypt_with_nonce, Nonce, SecretKey, KEY_LEN, NONCE_LEN};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
