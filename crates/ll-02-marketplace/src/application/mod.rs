//! # Application Module
//!
//! Application service orchestrating projection and the ledger ports.

pub mod service;

pub use service::MarketplaceService;
