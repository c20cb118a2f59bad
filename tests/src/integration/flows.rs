//! # Integration Flows
//!
//! Exercises the subsystems together over the in-memory ledger and blob
//! store from `shared_types::testing`:
//!
//! 1. **Registry (ll-01)**: registry object → status buckets → tasks → roles
//! 2. **Registry (ll-01) → Content (ll-03)**: a resolved task supplies the key
//!    material for its sealed deliverable
//! 3. **Marketplace (ll-02)**: listing and purchase feeds joined to experiences
//! 4. **Runtime**: the same flows driven through CLI commands

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, Duration};
    use serde_json::{json, Value};

    use shared_types::testing::{InMemoryBlobStore, InMemoryLedger};
    use shared_types::{
        EventId, LedgerConfig, LedgerEvent, LicenseType, RawObject, RawValue, TaskStatus,
    };

    use ledger_runtime::{Command, LedgerRuntime};
    use ll_01_registry_resolver::{RegistryResolverApi, RegistryResolverService, ResolverPhase};
    use ll_02_marketplace::{MarketplaceFeedApi, MarketplaceService};
    use ll_03_content_pipeline::{
        ContentPipelineApi, ContentPipelineService, DecryptFailure, DecryptOutcome, KeyMaterial,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn config() -> Arc<LedgerConfig> {
        Arc::new(LedgerConfig::for_testing())
    }

    /// Registry whose bucket table is `0xbuckets`.
    fn registry(ledger: &InMemoryLedger) {
        ledger.insert_object(RawObject::move_object(
            "0xregistry",
            "0xpkg::task_manage::TaskRegistry",
            json!({
                "id": {"id": "0xregistry"},
                "tasks_by_status": {
                    "type": "0x2::table::Table<u8, vector<0x2::object::ID>>",
                    "fields": {"id": {"id": "0xbuckets"}, "size": "1"}
                }
            }),
        ));
    }

    /// One completed task, "Ship report", owned by `0xCreator`.
    fn single_task_ledger() -> Arc<InMemoryLedger> {
        let ledger = Arc::new(InMemoryLedger::new());
        registry(&ledger);
        ledger.insert_dynamic_field("0xbuckets", "u8", json!(2), json!(["0xT1"]));
        ledger.insert_object(RawObject::move_object(
            "0xT1",
            "0xpkg::task_manage::Task",
            json!({
                "title": "Ship report",
                "creator": "0xCreator",
                "status": 2,
                "created_at": "1700000000000",
                "roles": {"fields": {"id": {"id": "0xroles"}, "size": "2"}}
            }),
        ));
        ledger.insert_dynamic_field("0xroles", "address", json!("0xalice"), json!(1));
        ledger.insert_dynamic_field("0xroles", "address", json!("0xbob"), json!(2));
        ledger
    }

    fn experience(ledger: &InMemoryLedger, id: &str) {
        ledger.insert_object(RawObject::move_object(
            id,
            "0xpkg::experience::Experience",
            json!({
                "skill": "Rust",
                "domain": "Systems",
                "difficulty": 9,
                "creator": "0xC",
                "price": "500",
                "total_rating": "9",
                "rating_count": "2",
                "result_blob_id": "blob-exp"
            }),
        ));
    }

    fn event(ledger: &InMemoryLedger, name: &str, seq: u64, payload: Value) {
        ledger.push_event(LedgerEvent {
            id: EventId {
                tx_digest: format!("Dig{}", seq),
                event_seq: 0,
            },
            event_type: format!("0xpkg::marketplace::{}", name),
            sender: "0xS".into(),
            parsed: RawValue::from(payload),
            timestamp_ms: Some(1_700_000_000_000 + seq),
        });
    }

    // =============================================================================
    // REGISTRY RESOLUTION
    // =============================================================================

    #[tokio::test]
    async fn test_single_completed_task_resolves() {
        let service = RegistryResolverService::new(config(), single_task_ledger());
        let snapshot = service.resolve_registry().await.unwrap();

        assert_eq!(snapshot.tasks.len(), 1);
        let task = &snapshot.tasks[0];
        assert_eq!(task.id, "0xT1");
        assert_eq!(task.title, "Ship report");
        assert_eq!(task.status, TaskStatus::Completed);
        assert!(task.is_completed);

        let created = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        assert_eq!(task.created_at, created);
        assert_eq!(task.due_date, created + Duration::days(7));
        assert_eq!(task.access_control_table_id.as_deref(), Some("0xroles"));

        let roles = snapshot.roles_of("0xT1");
        assert_eq!(roles.len(), 2);
        assert_eq!(roles[0].address, "0xalice");
        assert_eq!(roles[1].role, 2);
        assert_eq!(snapshot.phases.last(), Some(&ResolverPhase::Ready));
    }

    #[tokio::test]
    async fn test_missing_task_does_not_abort_resolution() {
        let ledger = single_task_ledger();
        ledger.insert_dynamic_field("0xbuckets", "u8", json!(0), json!(["0xT404"]));
        let service = RegistryResolverService::new(config(), ledger);

        let snapshot = service.resolve_registry().await.unwrap();
        assert_eq!(snapshot.tasks.len(), 1);
        assert!(snapshot.task("0xT404").is_none());
    }

    // =============================================================================
    // REGISTRY → CONTENT
    // =============================================================================

    #[tokio::test]
    async fn test_task_deliverable_decrypts_with_task_material() {
        let config = config();
        let resolver = RegistryResolverService::new(config.clone(), single_task_ledger());
        let store = Arc::new(InMemoryBlobStore::new());
        let pipeline = ContentPipelineService::new(config, store.clone());

        let snapshot = resolver.resolve_registry().await.unwrap();
        let task = snapshot.task("0xT1").unwrap();
        let material = KeyMaterial::new(task.id.clone(), task.creator.clone());
        store.put("blob-report", pipeline.seal(b"Q3 numbers", &material).unwrap());

        let outcome = pipeline.fetch_and_decrypt("blob-report", &material).await.unwrap();
        assert_eq!(outcome.plaintext(), Some(&b"Q3 numbers"[..]));

        let outsider = KeyMaterial::new(task.id.clone(), "0xMallory");
        let outcome = pipeline.fetch_and_decrypt("blob-report", &outsider).await.unwrap();
        assert!(matches!(
            outcome,
            DecryptOutcome::Failed(DecryptFailure::Authentication { .. })
        ));
    }

    // =============================================================================
    // MARKETPLACE FEEDS
    // =============================================================================

    #[tokio::test]
    async fn test_listing_feed_joins_experience() {
        let ledger = Arc::new(InMemoryLedger::new());
        experience(&ledger, "0xE1");
        ledger.insert_object(RawObject::move_object(
            "0xL1",
            "0xpkg::marketplace::Listing",
            json!({"experience_id": "0xE1", "seller": "0xC", "price": "1200", "license_type": 1}),
        ));
        event(&ledger, "ExperienceListed", 1, json!({"listing_id": "0xL1"}));

        let service = MarketplaceService::read_only(config(), ledger);
        let listings = service.fetch_listings(10).await.unwrap();

        assert_eq!(listings.len(), 1);
        let listing = &listings[0];
        assert_eq!(listing.price, 1200);
        assert_eq!(listing.license_type, LicenseType::from_code(1));
        assert!(listing.active);
        assert_eq!(listing.experience.difficulty, 5);
        assert_eq!(listing.experience.rating, 4.5);
        assert_eq!(listing.experience.content_blob_id.as_deref(), Some("blob-exp"));
        assert_eq!(
            listing.listed_at,
            DateTime::from_timestamp_millis(1_700_000_000_001)
        );
    }

    #[tokio::test]
    async fn test_purchase_feed_is_per_buyer() {
        let ledger = Arc::new(InMemoryLedger::new());
        experience(&ledger, "0xE1");
        event(
            &ledger,
            "ExperiencePurchased",
            1,
            json!({"experience_id": "0xE1", "buyer": "0xB1", "price": "500"}),
        );
        event(
            &ledger,
            "ExperiencePurchased",
            2,
            json!({"experience_id": "0xE1", "buyer": "0xB2", "price": "500"}),
        );

        let service = MarketplaceService::read_only(config(), ledger);
        let purchases = service.fetch_purchases("0xb2", 10).await.unwrap();
        assert_eq!(purchases.len(), 1);
        assert_eq!(purchases[0].purchase_id, "Dig2");
        assert_eq!(purchases[0].seller, "0xC");
        assert_eq!(purchases[0].price_paid, 500);
    }

    // =============================================================================
    // RUNTIME COMMANDS
    // =============================================================================

    #[tokio::test]
    async fn test_runtime_tasks_command() {
        let runtime = LedgerRuntime::new(
            config(),
            single_task_ledger(),
            Arc::new(InMemoryBlobStore::new()),
        );
        let mut out = Vec::new();
        runtime.execute(Command::Tasks, &mut out).await.unwrap();

        let printed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed["tasks"].as_array().unwrap().len(), 1);
        assert_eq!(printed["tasks"][0]["title"], "Ship report");
        assert_eq!(printed["roles"]["0xT1"][0]["address"], "0xalice");
    }

    #[tokio::test]
    async fn test_runtime_reports_missing_registry() {
        let runtime = LedgerRuntime::new(
            config(),
            Arc::new(InMemoryLedger::new()),
            Arc::new(InMemoryBlobStore::new()),
        );
        let err = runtime.execute(Command::Tasks, &mut Vec::new()).await.unwrap_err();
        assert!(format!("{:#}", err).contains("0xregistry"));
    }
}
