//! # Domain Module
//!
//! Key material, decryption outcomes, the pure open/seal functions and errors.

pub mod entities;
pub mod errors;
pub mod sealing;

pub use entities::*;
pub use errors::*;
pub use sealing::*;
