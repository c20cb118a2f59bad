//! # Adapters
//!
//! Concrete collaborators: the ledger read client and the blob store.
//! Signing is not provided; the runtime only reads and decrypts.

pub mod blob_store;
pub mod json_rpc;

pub use blob_store::HttpBlobStore;
pub use json_rpc::JsonRpcLedgerClient;
