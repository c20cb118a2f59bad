//! # Ledger Runtime
//!
//! Process wiring for Ledger-Lens: the JSON-RPC ledger client, the HTTP blob
//! store, the command-line surface and the runtime that routes commands to
//! the subsystem services.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod cli;
pub mod runtime;

pub use adapters::{HttpBlobStore, JsonRpcLedgerClient};
pub use cli::{Args, Command};
pub use runtime::LedgerRuntime;
