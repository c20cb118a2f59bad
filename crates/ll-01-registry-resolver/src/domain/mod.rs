//! # Domain Module
//!
//! Core domain types for registry resolution.

pub mod entities;
pub mod errors;
pub mod projection;

pub use entities::*;
pub use errors::*;
pub use projection::*;
