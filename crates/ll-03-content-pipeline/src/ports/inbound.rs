//! # Inbound Ports
//!
//! API trait defining what the Content Pipeline can do.

use async_trait::async_trait;

use crate::domain::{ContentError, DecryptOutcome, KeyMaterial};

/// Content Pipeline API - inbound port.
#[async_trait]
pub trait ContentPipelineApi: Send + Sync {
    /// Fetch a blob and decrypt it with the key derived from `material`.
    ///
    /// Storage failures are errors; a failed authentication check is a
    /// [`DecryptOutcome::Failed`] value.
    async fn fetch_and_decrypt(
        &self,
        content_id: &str,
        material: &KeyMaterial,
    ) -> Result<DecryptOutcome, ContentError>;
}
