//! # Algorithms Module
//!
//! Dynamic-collection walking and the two interpretations built on it.

pub mod collection_walker;

pub use collection_walker::{flatten_bucketed_ids, resolve_role_table, CollectionWalker};
