//! # Shared Types Crate
//!
//! This crate contains the raw ledger object model, the optional-value
//! decoder, the collaborator ports and the domain entities used by every
//! Ledger-Lens subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Decode at the Boundary**: Ledger JSON becomes a [`RawValue`] once, at the
//!   adapter; everything after that is a pure function over the sum type.
//! - **Soft Failure**: Absent or oddly-shaped optional values decode to an empty
//!   default, never to an error.
//! - **Explicit Configuration**: [`LedgerConfig`] is built once at process start
//!   and passed by reference; no subsystem reads the environment itself.

pub mod config;
pub mod decoder;
pub mod entities;
pub mod errors;
pub mod object;
pub mod ports;
pub mod testing;
pub mod transaction;
pub mod value;

pub use config::*;
pub use decoder::*;
pub use entities::*;
pub use errors::*;
pub use object::*;
pub use ports::*;
pub use transaction::*;
pub use value::*;
