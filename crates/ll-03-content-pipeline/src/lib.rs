//! # LL-03 Content Pipeline
//!
//! Fetches encrypted content blobs and decrypts them with a key derived from
//! the owning task.
//!
//! **Subsystem ID:** 3
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Flow
//!
//! ```text
//! content_id ──get_blob──→ bytes ──parse_envelope──→ (nonce, ciphertext)
//!                                                          │
//! (domain, task_id, creator) ──SHA-256──→ key ──XChaCha20-Poly1305──→ DecryptOutcome
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! ll-03-content-pipeline/
//! ├── domain/          # KeyMaterial, DecryptOutcome, open/seal, errors
//! ├── ports/           # ContentPipelineApi
//! └── application/     # ContentPipelineService
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod application;
pub mod domain;
pub mod ports;

// Re-exports
pub use application::ContentPipelineService;
pub use domain::{
    content_key, open_content, seal_content, ContentError, DecryptFailure, DecryptOutcome,
    KeyMaterial,
};
pub use ports::ContentPipelineApi;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
