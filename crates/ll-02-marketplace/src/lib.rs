//! # LL-02 Marketplace
//!
//! Listing and purchasing experiences, and reading the marketplace feeds.
//!
//! **Subsystem ID:** 2
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Operations
//!
//! | Operation | Kind | Preconditions (checked before any network call) |
//! |-----------|------|--------------------------------------------------|
//! | `purchase` | write | package configured; listing exists |
//! | `list` | write | package configured; `copies > 0`; known license |
//! | `fetch_listings` | read | package configured |
//! | `fetch_purchases` | read | package configured |
//!
//! Writes are neither idempotent nor retried here. Submission failures are
//! classified into [`TransactionFailure`] so callers can tell a declined
//! signature from a retryable network error.
//!
//! ## Module Structure
//!
//! ```text
//! ll-02-marketplace/
//! ├── domain/          # Projection, failure taxonomy, entry/event names
//! ├── ports/           # MarketplaceApi, MarketplaceFeedApi
//! └── application/     # MarketplaceService
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod application;
pub mod domain;
pub mod ports;

// Re-exports
pub use application::MarketplaceService;
pub use domain::{
    project_experience, project_listing, project_purchase, MarketplaceError, TransactionFailure,
};
pub use ports::{MarketplaceApi, MarketplaceFeedApi};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
