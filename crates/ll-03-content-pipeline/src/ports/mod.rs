//! # Ports Module
//!
//! Inbound API of the pipeline. The outbound dependency is the shared
//! [`BlobStore`](shared_types::BlobStore) port.

pub mod inbound;

pub use inbound::*;
