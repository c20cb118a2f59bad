//! # Registry Resolver Service
//!
//! Drives one resolution through the phase machine described on
//! [`ResolverPhase`]. Nothing is cached between calls: every resolution
//! re-reads the ledger, so two calls against the same ledger state return the
//! same tasks.

use async_trait::async_trait;
use futures::future::join_all;
use shared_types::{
    LedgerConfig, LedgerError, LedgerReader, ObjectId, ObjectOptions, RoleGrant, TaskEntity,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::algorithms::{flatten_bucketed_ids, resolve_role_table};
use crate::domain::{project_task, RegistrySnapshot, ResolverError, ResolverPhase};
use crate::ports::RegistryResolverApi;

/// Registry Resolver Service - orchestrates bucket walking, task projection
/// and role resolution.
pub struct RegistryResolverService<L: LedgerReader> {
    /// Process-wide configuration.
    config: Arc<LedgerConfig>,
    /// Ledger read client.
    ledger: L,
}

/// Accumulates one resolution's output.
struct Resolution {
    id: Uuid,
    registry_id: Option<ObjectId>,
    tasks: Vec<TaskEntity>,
    roles: HashMap<ObjectId, Vec<RoleGrant>>,
    phases: Vec<ResolverPhase>,
}

impl Resolution {
    fn new(id: Uuid) -> Self {
        Self {
            id,
            registry_id: None,
            tasks: Vec::new(),
            roles: HashMap::new(),
            phases: vec![ResolverPhase::Idle],
        }
    }

    fn enter(&mut self, phase: ResolverPhase) {
        debug!("[ll-01] Entering {:?}", phase);
        self.phases.push(phase);
    }

    fn into_snapshot(self) -> RegistrySnapshot {
        RegistrySnapshot {
            resolution_id: self.id,
            registry_id: self.registry_id,
            tasks: self.tasks,
            roles: self.roles,
            phases: self.phases,
        }
    }
}

impl<L: LedgerReader> RegistryResolverService<L> {
    /// Create a resolver over a ledger read client.
    pub fn new(config: Arc<LedgerConfig>, ledger: L) -> Self {
        Self { config, ledger }
    }

    /// Configuration this service was built with.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    async fn run(&self, resolution: &mut Resolution) -> Result<(), ResolverError> {
        let Some(registry_id) = self.config.registry_id() else {
            info!("[ll-01] No registry configured, nothing to resolve");
            return Ok(());
        };
        resolution.registry_id = Some(registry_id.to_string());

        resolution.enter(ResolverPhase::FetchingRegistry);
        let table_id = self.fetch_bucket_table_id(registry_id).await?;

        resolution.enter(ResolverPhase::ResolvingBuckets);
        let ids = flatten_bucketed_ids(&self.ledger, &table_id).await?;
        if ids.is_empty() {
            info!("[ll-01] Registry {} has no tasks", registry_id);
            return Ok(());
        }

        resolution.enter(ResolverPhase::FetchingEntities);
        let tasks = self.fetch_tasks(&ids).await?;

        resolution.enter(ResolverPhase::ResolvingRoles);
        resolution.roles = self.fetch_roles(&tasks).await;
        resolution.tasks = tasks;
        Ok(())
    }

    /// Read the registry and return the id of its bucket table.
    async fn fetch_bucket_table_id(&self, registry_id: &str) -> Result<ObjectId, ResolverError> {
        let registry = self
            .ledger
            .get_object(registry_id, ObjectOptions::CONTENT)
            .await
            .map_err(|e| match e {
                LedgerError::NotFound(_) => ResolverError::RegistryNotFound(registry_id.to_string()),
                other => ResolverError::Ledger(other),
            })?;

        let malformed = |reason: &str| ResolverError::RegistryMalformed {
            registry_id: registry_id.to_string(),
            reason: reason.to_string(),
        };

        let content = registry
            .content
            .as_ref()
            .filter(|c| c.is_move_object())
            .ok_or_else(|| malformed("content is not a move object"))?;

        let field = &self.config.resolver.bucket_table_field;
        content
            .field(field)
            .object_id()
            .ok_or_else(|| malformed(&format!("field `{}` carries no table id", field)))
    }

    /// Batch-fetch and project tasks; unprojectable entries are dropped.
    async fn fetch_tasks(&self, ids: &[ObjectId]) -> Result<Vec<TaskEntity>, ResolverError> {
        let results = self
            .ledger
            .multi_get_objects(ids, ObjectOptions::CONTENT)
            .await?;

        let mut tasks = Vec::with_capacity(results.len());
        for (id, result) in ids.iter().zip(results) {
            match result {
                Ok(object) => {
                    if let Some(task) = project_task(&object, &self.config.resolver) {
                        tasks.push(task);
                    }
                }
                Err(e) => warn!("[ll-01] Task {} could not be read: {}", id, e),
            }
        }
        debug!("[ll-01] Projected {}/{} tasks", tasks.len(), ids.len());
        Ok(tasks)
    }

    /// Walk every task's role table concurrently. Unreadable tables are left
    /// out of the map.
    async fn fetch_roles(&self, tasks: &[TaskEntity]) -> HashMap<ObjectId, Vec<RoleGrant>> {
        let walks = tasks.iter().filter_map(|task| {
            let table_id = task.access_control_table_id.as_deref()?;
            Some(async move {
                let grants = resolve_role_table(&self.ledger, table_id).await;
                (task.id.clone(), table_id, grants)
            })
        });

        let mut roles = HashMap::new();
        for (task_id, table_id, grants) in join_all(walks).await {
            match grants {
                Ok(grants) => {
                    roles.insert(task_id, grants);
                }
                Err(e) => warn!(
                    "[ll-01] Role table {} of task {} unreadable: {}",
                    table_id, task_id, e
                ),
            }
        }
        roles
    }
}

#[async_trait]
impl<L: LedgerReader> RegistryResolverApi for RegistryResolverService<L> {
    async fn resolve_registry(&self) -> Result<RegistrySnapshot, ResolverError> {
        let resolution_id = Uuid::new_v4();
        let span = info_span!("resolve_registry", %resolution_id);

        async move {
            let mut resolution = Resolution::new(resolution_id);
            match self.run(&mut resolution).await {
                Ok(()) => {
                    resolution.enter(ResolverPhase::Ready);
                    info!(
                        "[ll-01] Resolved {} tasks ({} with roles)",
                        resolution.tasks.len(),
                        resolution.roles.len()
                    );
                    Ok(resolution.into_snapshot())
                }
                Err(e) => {
                    resolution.enter(ResolverPhase::Failed);
                    error!("[ll-01] Resolution failed after {:?}: {}", resolution.phases, e);
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn flatten_buckets(&self, table_id: &str) -> Result<Vec<ObjectId>, ResolverError> {
        Ok(flatten_bucketed_ids(&self.ledger, table_id).await?)
    }

    async fn resolve_roles(&self, table_id: &str) -> Result<Vec<RoleGrant>, ResolverError> {
        Ok(resolve_role_table(&self.ledger, table_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared_types::testing::InMemoryLedger;
    use shared_types::RawObject;

    fn create_test_service(ledger: Arc<InMemoryLedger>) -> RegistryResolverService<Arc<InMemoryLedger>> {
        RegistryResolverService::new(Arc::new(LedgerConfig::for_testing()), ledger)
    }

    fn registry(ledger: &InMemoryLedger) {
        ledger.insert_object(RawObject::move_object(
            "0xregistry",
            "0xpkg::task_manage::TaskRegistry",
            json!({
                "id": {"id": "0xregistry"},
                "tasks_by_status": {
                    "type": "0x2::table::Table<u8, vector<0x2::object::ID>>",
                    "fields": {"id": {"id": "0xbuckets"}, "size": "2"}
                }
            }),
        ));
    }

    fn task(ledger: &InMemoryLedger, id: &str, status: u8, roles: Option<&str>) {
        let mut fields = json!({
            "title": format!("Task {}", id),
            "creator": "0xC",
            "status": status,
            "created_at": "1700000000000",
        });
        if let Some(table) = roles {
            fields["roles"] = json!({"fields": {"id": {"id": table}, "size": "1"}});
        }
        ledger.insert_object(RawObject::move_object(id, "0xpkg::task_manage::Task", fields));
    }

    fn populated() -> Arc<InMemoryLedger> {
        let ledger = Arc::new(InMemoryLedger::new());
        registry(&ledger);
        ledger.insert_dynamic_field("0xbuckets", "u8", json!(0), json!(["0xT1", "0xT2"]));
        ledger.insert_dynamic_field("0xbuckets", "u8", json!(2), json!(["0xT3"]));
        task(&ledger, "0xT1", 0, Some("0xroles1"));
        task(&ledger, "0xT2", 1, None);
        task(&ledger, "0xT3", 2, None);
        ledger.insert_dynamic_field("0xroles1", "address", json!("0xalice"), json!(1));
        ledger
    }

    #[tokio::test]
    async fn test_unconfigured_registry_is_empty() {
        let ledger = Arc::new(InMemoryLedger::new());
        let mut config = LedgerConfig::for_testing();
        config.registry_id = Some(String::new());
        let service = RegistryResolverService::new(Arc::new(config), ledger.clone());

        let snapshot = service.resolve_registry().await.unwrap();
        assert!(snapshot.is_empty());
        assert!(snapshot.registry_id.is_none());
        assert_eq!(snapshot.phases, vec![ResolverPhase::Idle, ResolverPhase::Ready]);
        assert_eq!(ledger.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_registry_fails() {
        let service = create_test_service(Arc::new(InMemoryLedger::new()));
        let result = service.resolve_registry().await;
        assert!(matches!(result, Err(ResolverError::RegistryNotFound(id)) if id == "0xregistry"));
    }

    #[tokio::test]
    async fn test_registry_without_bucket_field_is_malformed() {
        let ledger = Arc::new(InMemoryLedger::new());
        ledger.insert_object(RawObject::move_object(
            "0xregistry",
            "0xpkg::task_manage::TaskRegistry",
            json!({"id": {"id": "0xregistry"}}),
        ));
        let service = create_test_service(ledger);
        let result = service.resolve_registry().await;
        assert!(matches!(result, Err(ResolverError::RegistryMalformed { .. })));
    }

    #[tokio::test]
    async fn test_transient_registry_read_is_a_ledger_error() {
        let ledger = populated();
        ledger.fail_object("0xregistry");
        let service = create_test_service(ledger);
        let result = service.resolve_registry().await;
        assert!(matches!(result, Err(ResolverError::Ledger(LedgerError::Network(_)))));
    }

    #[tokio::test]
    async fn test_empty_buckets_short_circuit() {
        let ledger = Arc::new(InMemoryLedger::new());
        registry(&ledger);
        let service = create_test_service(ledger);
        let snapshot = service.resolve_registry().await.unwrap();
        assert!(snapshot.is_empty());
        assert_eq!(
            snapshot.phases,
            vec![
                ResolverPhase::Idle,
                ResolverPhase::FetchingRegistry,
                ResolverPhase::ResolvingBuckets,
                ResolverPhase::Ready,
            ]
        );
    }

    #[tokio::test]
    async fn test_full_resolution() {
        let service = create_test_service(populated());
        let snapshot = service.resolve_registry().await.unwrap();

        assert_eq!(snapshot.tasks.len(), 3);
        assert!(snapshot.task("0xT3").unwrap().is_completed);
        assert!(!snapshot.task("0xT2").unwrap().is_completed);
        assert_eq!(snapshot.roles_of("0xT1"), &[RoleGrant { address: "0xalice".into(), role: 1 }]);
        assert!(!snapshot.roles.contains_key("0xT2"));
        assert_eq!(snapshot.phases.last(), Some(&ResolverPhase::Ready));
        assert_eq!(snapshot.phases.len(), 6);
    }

    #[tokio::test]
    async fn test_bad_tasks_are_skipped() {
        let ledger = populated();
        ledger.insert_dynamic_field("0xbuckets", "u8", json!(1), json!(["0xGONE", "0xBROKEN"]));
        ledger.insert_object(RawObject::move_object(
            "0xBROKEN",
            "0xpkg::task_manage::Task",
            json!({"title": "no status"}),
        ));
        let service = create_test_service(ledger);
        let snapshot = service.resolve_registry().await.unwrap();
        assert_eq!(snapshot.tasks.len(), 3);
        assert!(snapshot.task("0xBROKEN").is_none());
    }

    #[tokio::test]
    async fn test_unreadable_role_table_is_omitted() {
        let ledger = populated();
        ledger.fail_object("0xroles1");
        let service = create_test_service(ledger);
        let snapshot = service.resolve_registry().await.unwrap();
        assert_eq!(snapshot.tasks.len(), 3);
        assert!(snapshot.roles.is_empty());
    }

    #[tokio::test]
    async fn test_resolution_is_idempotent() {
        let ledger = populated();
        let service = create_test_service(ledger.clone());
        let first = service.resolve_registry().await.unwrap();
        let calls = ledger.call_count();
        let second = service.resolve_registry().await.unwrap();

        assert_eq!(first.tasks, second.tasks);
        assert_eq!(first.roles, second.roles);
        assert_ne!(first.resolution_id, second.resolution_id);
        assert_eq!(ledger.call_count(), calls * 2);
    }

    #[tokio::test]
    async fn test_api_passthroughs() {
        let service = create_test_service(populated());
        assert_eq!(service.flatten_buckets("0xbuckets").await.unwrap().len(), 3);
        assert_eq!(service.resolve_roles("0xroles1").await.unwrap().len(), 1);
    }
}
