//! # Inbound Ports
//!
//! Write API (transactions) and read API (event feeds), split so a caller
//! without a signer can still read.

use async_trait::async_trait;
use shared_types::{ListingRecord, PurchaseRecord};

use crate::domain::MarketplaceError;

/// Marketplace transactions - inbound port.
///
/// Neither operation is idempotent. A caller must keep at most one submission
/// in flight per logical action and must not retry blindly.
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    /// Buy a listing, paying `payment` split off the fee-paying balance.
    ///
    /// Returns the transaction digest.
    async fn purchase(&self, listing_id: &str, payment: u64) -> Result<String, MarketplaceError>;

    /// List an experience for sale under a license symbol
    /// (`personal`, `commercial`, `exclusive`, `subscription`, `view_only`).
    ///
    /// Returns the transaction digest.
    async fn list(
        &self,
        experience_id: &str,
        price: u64,
        license: &str,
        copies: u64,
    ) -> Result<String, MarketplaceError>;
}

/// Marketplace event feeds - inbound port.
#[async_trait]
pub trait MarketplaceFeedApi: Send + Sync {
    /// Resolve the latest `limit` listing events into listing records.
    async fn fetch_listings(&self, limit: usize) -> Result<Vec<ListingRecord>, MarketplaceError>;

    /// Resolve `buyer`'s purchases among the latest `limit` purchase events.
    async fn fetch_purchases(
        &self,
        buyer: &str,
        limit: usize,
    ) -> Result<Vec<PurchaseRecord>, MarketplaceError>;
}
