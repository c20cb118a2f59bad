//! Command execution.
//!
//! Wires the collaborators into the subsystem services once and runs CLI
//! commands against them. Output goes to the supplied writer as JSON (or raw
//! plaintext for `decrypt`); logs go to stderr.

use std::io::Write;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use ll_01_registry_resolver::{RegistryResolverApi, RegistryResolverService};
use ll_02_marketplace::{MarketplaceFeedApi, MarketplaceService};
use ll_03_content_pipeline::{
    ContentPipelineApi, ContentPipelineService, DecryptOutcome, KeyMaterial,
};
use shared_types::{BlobStore, LedgerConfig, LedgerReader};
use tracing::info;

use crate::cli::Command;

/// All subsystem services over one pair of collaborators.
pub struct LedgerRuntime<L: LedgerReader + Clone, B: BlobStore> {
    config: Arc<LedgerConfig>,
    resolver: RegistryResolverService<L>,
    marketplace: MarketplaceService<L>,
    content: ContentPipelineService<B>,
}

impl<L: LedgerReader + Clone, B: BlobStore> LedgerRuntime<L, B> {
    /// Wire the services.
    pub fn new(config: Arc<LedgerConfig>, ledger: L, store: B) -> Self {
        Self {
            resolver: RegistryResolverService::new(config.clone(), ledger.clone()),
            marketplace: MarketplaceService::read_only(config.clone(), ledger),
            content: ContentPipelineService::new(config.clone(), store),
            config,
        }
    }

    /// Run one command, writing its output to `out`.
    pub async fn execute(&self, command: Command, out: &mut dyn Write) -> Result<()> {
        let window = self.config.marketplace.listing_window;
        match command {
            Command::Tasks => {
                let snapshot = self
                    .resolver
                    .resolve_registry()
                    .await
                    .context("resolving the task registry")?;
                write_json(out, &snapshot)
            }
            Command::Listings { limit } => {
                let listings = self
                    .marketplace
                    .fetch_listings(limit.unwrap_or(window))
                    .await
                    .context("reading marketplace listings")?;
                write_json(out, &listings)
            }
            Command::Purchases { buyer, limit } => {
                let purchases = self
                    .marketplace
                    .fetch_purchases(&buyer, limit.unwrap_or(window))
                    .await
                    .with_context(|| format!("reading purchases of {}", buyer))?;
                write_json(out, &purchases)
            }
            Command::Decrypt {
                content_id,
                task_id,
                creator,
                out: path,
            } => {
                let material = KeyMaterial::new(task_id, creator);
                let outcome = self
                    .content
                    .fetch_and_decrypt(&content_id, &material)
                    .await
                    .with_context(|| format!("fetching content {}", content_id))?;
                let plaintext = match outcome {
                    DecryptOutcome::Plaintext { bytes, .. } => bytes,
                    DecryptOutcome::Failed(reason) => {
                        bail!("content {} could not be decrypted: {}", content_id, reason)
                    }
                };
                match path {
                    Some(path) => {
                        std::fs::write(&path, &plaintext)
                            .with_context(|| format!("writing {}", path.display()))?;
                        info!("Wrote {} bytes to {}", plaintext.len(), path.display());
                    }
                    None => out.write_all(&plaintext).context("writing plaintext")?,
                }
                Ok(())
            }
        }
    }
}

fn write_json<T: serde::Serialize>(out: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("encoding output")?;
    writeln!(out).context("writing output")?;
    Ok(())
}
