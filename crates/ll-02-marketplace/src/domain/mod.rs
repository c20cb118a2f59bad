//! # Domain Module
//!
//! Marketplace projection, event names and the error taxonomy.

pub mod errors;
pub mod projection;

pub use errors::*;
pub use projection::*;

/// Entry function that purchases a listing.
pub const PURCHASE_ENTRY: &str = "purchase_experience";
/// Entry function that lists an experience.
pub const LIST_ENTRY: &str = "list_experience";
/// Event emitted when an experience is listed.
pub const LISTED_EVENT: &str = "ExperienceListed";
/// Event emitted when a listing is purchased.
pub const PURCHASED_EVENT: &str = "ExperiencePurchased";
