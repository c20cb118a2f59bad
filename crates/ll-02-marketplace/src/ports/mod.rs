//! # Ports Module
//!
//! Inbound APIs of the marketplace. Outbound dependencies are the shared
//! [`LedgerReader`](shared_types::LedgerReader) and
//! [`LedgerWriter`](shared_types::LedgerWriter) ports.

pub mod inbound;

pub use inbound::*;
