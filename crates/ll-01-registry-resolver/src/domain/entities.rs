//! # Domain Entities
//!
//! Resolution phases and the snapshot a resolution produces.

use serde::{Deserialize, Serialize};
use shared_types::{ObjectId, RoleGrant, TaskEntity};
use std::collections::HashMap;
use uuid::Uuid;

/// Phases of one resolution.
///
/// ```text
/// IDLE → FETCHING_REGISTRY → RESOLVING_BUCKETS → FETCHING_ENTITIES → RESOLVING_ROLES → READY
///   │                               │
///   └──────── (no registry) ───────┴──── (no ids) ──────────────────────────────────→ READY
/// any ──(registry missing / malformed / batch read failed)──→ FAILED
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolverPhase {
    /// Not started.
    Idle,
    /// Reading the registry object.
    FetchingRegistry,
    /// Flattening the status buckets.
    ResolvingBuckets,
    /// Batch-fetching and projecting tasks.
    FetchingEntities,
    /// Walking role tables.
    ResolvingRoles,
    /// Done.
    Ready,
    /// Aborted.
    Failed,
}

/// Result of one resolution. Never cached; every call re-reads the ledger.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// Resolution id (also on the tracing span).
    pub resolution_id: Uuid,
    /// Registry that was resolved, if one was configured.
    pub registry_id: Option<ObjectId>,
    /// Successfully projected tasks, in bucket enumeration order.
    pub tasks: Vec<TaskEntity>,
    /// Role grants per task id. Tasks without a role table have no entry.
    pub roles: HashMap<ObjectId, Vec<RoleGrant>>,
    /// Phases visited, in order.
    pub phases: Vec<ResolverPhase>,
}

impl RegistrySnapshot {
    /// Look up a task by id.
    pub fn task(&self, id: &str) -> Option<&TaskEntity> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Role grants of a task; empty when it has none.
    pub fn roles_of(&self, task_id: &str) -> &[RoleGrant] {
        self.roles.get(task_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Did the resolution stop before resolving anything?
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
