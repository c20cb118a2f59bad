//! HTTP blob store client.
//!
//! Reads blobs from a storage aggregator at `GET {base}/v1/blobs/{id}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared_types::{BlobStore, LedgerConfig, LedgerError};
use tracing::debug;

/// Storage client over HTTP.
pub struct HttpBlobStore {
    client: Client,
    base_url: String,
}

impl HttpBlobStore {
    /// Create a client for the configured aggregator.
    pub fn new(config: &LedgerConfig) -> Result<Self, LedgerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.rpc_timeout_secs))
            .build()
            .map_err(|e| LedgerError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.storage_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL of one blob.
    pub fn blob_url(&self, content_id: &str) -> String {
        format!("{}/v1/blobs/{}", self.base_url, content_id)
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn get_blob(&self, content_id: &str) -> Result<Vec<u8>, LedgerError> {
        let url = self.blob_url(content_id);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                LedgerError::Timeout(e.to_string())
            } else {
                LedgerError::Network(e.to_string())
            }
        })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(LedgerError::NotFound(content_id.to_string()));
        }
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LedgerError::Network(format!("HTTP {}: {}", status, body)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LedgerError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
