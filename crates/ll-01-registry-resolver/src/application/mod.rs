//! # Application Module
//!
//! Application service orchestrating the domain and the ledger port.

pub mod service;

pub use service::RegistryResolverService;
