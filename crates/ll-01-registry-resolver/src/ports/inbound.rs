//! # Inbound Ports
//!
//! API trait defining what the Registry Resolver can do.

use async_trait::async_trait;
use shared_types::{ObjectId, RoleGrant};

use crate::domain::{RegistrySnapshot, ResolverError};

/// Registry Resolver API - inbound port.
#[async_trait]
pub trait RegistryResolverApi: Send + Sync {
    /// Resolve the configured registry into a task snapshot.
    ///
    /// An unconfigured registry resolves to an empty snapshot, not an error.
    async fn resolve_registry(&self) -> Result<RegistrySnapshot, ResolverError>;

    /// Flatten one status-bucket table into its task ids.
    async fn flatten_buckets(&self, table_id: &str) -> Result<Vec<ObjectId>, ResolverError>;

    /// Read one role table.
    async fn resolve_roles(&self, table_id: &str) -> Result<Vec<RoleGrant>, ResolverError>;
}
