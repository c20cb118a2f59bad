//! # Ports Module
//!
//! Inbound API of the resolver. The outbound dependency is the shared
//! [`LedgerReader`](shared_types::LedgerReader) port.

pub mod inbound;

pub use inbound::*;
