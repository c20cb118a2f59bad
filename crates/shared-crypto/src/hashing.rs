//! # Content Key Derivation
//!
//! Keys are derived deterministically, so any party that knows the domain
//! parameters can recompute them:
//!
//! ```text
//! key = SHA-256(domain ‖ lowercase(task_id) ‖ lowercase(creator))
//! ```

use crate::symmetric::SecretKey;
use sha2::{Digest, Sha256};

/// SHA-256 output (256-bit).
pub type Hash = [u8; 32];

/// One-shot SHA-256.
pub fn sha256(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}

/// Derive the content key for a task's blob.
pub fn derive_content_key(domain: &str, task_id: &str, creator: &str) -> SecretKey {
    let mut hasher = Sha256::new();
    hasher.update(domain.as_bytes());
    hasher.update(task_id.to_lowercase().as_bytes());
    hasher.update(creator.to_lowercase().as_bytes());
    SecretKey::from_bytes(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_derivation_is_case_insensitive() {
        let a = derive_content_key("d", "0xABC", "0xDEF");
        let b = derive_content_key("d", "0xabc", "0xdef");
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_derivation_is_concatenation() {
        let key = derive_content_key("dom", "0xt", "0xc");
        assert_eq!(key.as_bytes(), &sha256(b"dom0xt0xc"));
    }

    #[test]
    fn test_different_creator_different_key() {
        let a = derive_content_key("d", "0x1", "0xaaa");
        let b = derive_content_key("d", "0x1", "0xbbb");
        assert_ne!(a.as_bytes(), b.as_bytes());
    }
}
