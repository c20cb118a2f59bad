//! # LL-01 Registry Resolver
//!
//! Reconstructs the flat task set (and each task's role table) from the
//! ledger's two-level object graph.
//!
//! **Subsystem ID:** 1
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! The task registry does not hold tasks directly:
//! - the registry object points at a bucket table,
//! - each bucket (one per status code) holds a vector of task ids,
//! - each task may point at its own role table.
//!
//! This crate walks that indirection, batch-fetches the tasks and projects
//! them into [`TaskEntity`](shared_types::TaskEntity) values.
//!
//! ## Failure Isolation
//!
//! | Failure | Effect |
//! |---------|--------|
//! | Registry missing or malformed | Whole resolution fails |
//! | One bucket unreadable | Bucket skipped, others kept |
//! | One task unprojectable | Task skipped, batch kept |
//! | One role table unreadable | Task keeps no role entry |
//!
//! ## Module Structure
//!
//! ```text
//! ll-01-registry-resolver/
//! ├── domain/          # Projection, snapshot, phases, errors
//! ├── algorithms/      # Dynamic collection walker, bucket flattening
//! ├── ports/           # Inbound API trait
//! └── application/     # RegistryResolverService
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod application;
pub mod domain;
pub mod ports;

// Re-exports
pub use algorithms::{flatten_bucketed_ids, resolve_role_table, CollectionWalker};
pub use application::RegistryResolverService;
pub use domain::{
    project_role_grant, project_task, RegistrySnapshot, ResolverError, ResolverPhase,
};
pub use ports::RegistryResolverApi;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
