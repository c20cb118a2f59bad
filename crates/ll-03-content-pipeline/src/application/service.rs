//! # Content Pipeline Service

use async_trait::async_trait;
use shared_types::{BlobStore, LedgerConfig};
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::{
    content_key, open_content, seal_content, ContentError, DecryptOutcome, KeyMaterial,
};
use crate::ports::ContentPipelineApi;

/// Content Pipeline Service - fetch, detect, derive, decrypt.
pub struct ContentPipelineService<B: BlobStore> {
    /// Process-wide configuration (key domain).
    config: Arc<LedgerConfig>,
    /// Storage client.
    store: B,
}

impl<B: BlobStore> ContentPipelineService<B> {
    /// Create a pipeline over a storage client.
    pub fn new(config: Arc<LedgerConfig>, store: B) -> Self {
        Self { config, store }
    }

    /// Seal plaintext for upload under the key derived from `material`.
    pub fn seal(&self, plaintext: &[u8], material: &KeyMaterial) -> Result<Vec<u8>, ContentError> {
        validate(material)?;
        let key = content_key(&self.config.content.key_domain, material);
        Ok(seal_content(plaintext, &key)?)
    }
}

fn validate(material: &KeyMaterial) -> Result<(), ContentError> {
    if material.is_complete() {
        Ok(())
    } else {
        Err(ContentError::Validation(
            "task id and creator are both required".to_string(),
        ))
    }
}

#[async_trait]
impl<B: BlobStore> ContentPipelineApi for ContentPipelineService<B> {
    async fn fetch_and_decrypt(
        &self,
        content_id: &str,
        material: &KeyMaterial,
    ) -> Result<DecryptOutcome, ContentError> {
        if content_id.trim().is_empty() {
            return Err(ContentError::Validation("content id is empty".to_string()));
        }
        validate(material)?;

        let bytes = self
            .store
            .get_blob(content_id)
            .await
            .map_err(|e| ContentError::from_storage(content_id, e))?;

        let key = content_key(&self.config.content.key_domain, material);
        let outcome = open_content(&bytes, &key);
        match &outcome {
            DecryptOutcome::Plaintext { format, bytes } => {
                info!("[ll-03] Decrypted {} ({:?}, {} bytes)", content_id, format, bytes.len())
            }
            DecryptOutcome::Failed(reason) => {
                warn!("[ll-03] Could not decrypt {}: {}", content_id, reason)
            }
        }
        Ok(outcome)
    }
}
