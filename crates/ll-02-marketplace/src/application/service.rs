//! # Marketplace Service
//!
//! Builds and submits listing/purchase transactions, and resolves the
//! listing and purchase event feeds into records.
//!
//! Feeds are eventually consistent: an event may reference objects that
//! changed or disappeared after emission. Records reflect the objects as
//! read now, and events whose objects cannot be resolved are skipped.

use async_trait::async_trait;
use futures::future::join_all;
use shared_types::{
    decode_optional_address, decode_optional_string, EventOrder, ExecutionStatus,
    ExperienceEntity, LedgerConfig, LedgerEvent, LedgerReader, LedgerWriter, LicenseType,
    ListingRecord, ObjectOptions, PurchaseRecord, RawObject, TransactionPlan, TxArgument,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::{
    listing_event_ids, project_experience, project_listing, project_purchase, MarketplaceError,
    TransactionFailure, LISTED_EVENT, LIST_ENTRY, PURCHASED_EVENT, PURCHASE_ENTRY,
};
use crate::ports::{MarketplaceApi, MarketplaceFeedApi};

/// Marketplace Service - transactions and feeds.
///
/// `W` is the signer. Read-only callers use [`MarketplaceService::read_only`],
/// which only implements [`MarketplaceFeedApi`].
pub struct MarketplaceService<L: LedgerReader, W = ()> {
    /// Process-wide configuration.
    config: Arc<LedgerConfig>,
    /// Ledger read client.
    ledger: L,
    /// Ledger write client.
    writer: W,
}

impl<L: LedgerReader> MarketplaceService<L> {
    /// Create a service that can read feeds but not submit.
    pub fn read_only(config: Arc<LedgerConfig>, ledger: L) -> Self {
        Self::new(config, ledger, ())
    }
}

impl<L: LedgerReader, W> MarketplaceService<L, W> {
    /// Create a marketplace service.
    pub fn new(config: Arc<LedgerConfig>, ledger: L, writer: W) -> Self {
        Self {
            config,
            ledger,
            writer,
        }
    }

    /// `package::marketplace::name`, or a configuration error.
    fn target(&self, name: &str) -> Result<String, MarketplaceError> {
        self.config.marketplace_target(name).ok_or_else(|| {
            MarketplaceError::Configuration("package identifier is not configured".to_string())
        })
    }

    async fn read_object(&self, id: &str, kind: &str) -> Option<RawObject> {
        match self.ledger.get_object(id, ObjectOptions::CONTENT).await {
            Ok(object) => Some(object),
            Err(e) => {
                warn!("[ll-02] {} {} unresolvable, skipping: {}", kind, id, e);
                None
            }
        }
    }

    async fn read_experience(&self, id: &str) -> Option<ExperienceEntity> {
        project_experience(&self.read_object(id, "Experience").await?)
    }

    async fn resolve_listing(&self, event: &LedgerEvent) -> Option<ListingRecord> {
        let Some((listing_id, experience_id)) = listing_event_ids(event) else {
            warn!("[ll-02] Listing event in {} has no listing id", event.id.tx_digest);
            return None;
        };
        let listing = self.read_object(&listing_id, "Listing").await?;
        let experience_id = experience_id.or_else(|| {
            decode_optional_address(listing.content.as_ref()?.field("experience_id"))
        });
        let Some(experience_id) = experience_id else {
            warn!("[ll-02] Listing {} references no experience", listing_id);
            return None;
        };
        let experience = self.read_experience(&experience_id).await?;
        project_listing(&listing, experience, event)
    }

    async fn resolve_purchase(&self, event: &LedgerEvent) -> Option<PurchaseRecord> {
        let Some(experience_id) = decode_optional_address(event.parsed.get("experience_id")) else {
            warn!("[ll-02] Purchase event in {} has no experience id", event.id.tx_digest);
            return None;
        };
        let experience = self.read_experience(&experience_id).await?;
        Some(project_purchase(event, experience))
    }

    async fn events(&self, name: &str, limit: usize) -> Result<Vec<LedgerEvent>, MarketplaceError> {
        let event_type = self.target(name)?;
        let events = self
            .ledger
            .query_events(&event_type, limit, EventOrder::Descending)
            .await?;
        debug!("[ll-02] {} {} events in window", events.len(), name);
        Ok(events)
    }
}

impl<L: LedgerReader, W: LedgerWriter> MarketplaceService<L, W> {
    async fn submit(&self, action: &str, plan: TransactionPlan) -> Result<String, MarketplaceError> {
        let response = self.writer.sign_and_submit(plan).await.map_err(|e| {
            let failure = TransactionFailure::from_ledger(&e);
            if failure.is_user_rejection() {
                info!("[ll-02] {} declined by user", action);
            } else {
                warn!("[ll-02] {} failed: {}", action, e);
            }
            failure
        })?;

        if let Some(ExecutionStatus::Failure(status)) = response.effects.map(|e| e.status) {
            warn!("[ll-02] {} {} executed with failure: {}", action, response.digest, status);
            return Err(TransactionFailure::ExecutionFailed(status).into());
        }
        info!("[ll-02] {} executed: {}", action, response.digest);
        Ok(response.digest)
    }
}

#[async_trait]
impl<L: LedgerReader, W: LedgerWriter> MarketplaceApi for MarketplaceService<L, W> {
    async fn purchase(&self, listing_id: &str, payment: u64) -> Result<String, MarketplaceError> {
        let target = self.target(PURCHASE_ENTRY)?;

        self.ledger
            .get_object(listing_id, ObjectOptions::CONTENT)
            .await
            .map_err(|e| MarketplaceError::from_read(listing_id, e))?;

        let mut plan = TransactionPlan::new();
        let coin = plan.split_gas(payment);
        plan.move_call(target, vec![TxArgument::Object(listing_id.to_string()), coin]);
        self.submit("Purchase", plan).await
    }

    async fn list(
        &self,
        experience_id: &str,
        price: u64,
        license: &str,
        copies: u64,
    ) -> Result<String, MarketplaceError> {
        let target = self.target(LIST_ENTRY)?;
        if copies == 0 {
            return Err(MarketplaceError::Validation(
                "copies must be greater than zero".to_string(),
            ));
        }
        let license: LicenseType = license.parse()?;

        let mut plan = TransactionPlan::new();
        plan.move_call(
            target,
            vec![
                TxArgument::Object(experience_id.to_string()),
                TxArgument::PureU64(price),
                TxArgument::PureU8(license.code()),
                TxArgument::PureU64(copies),
            ],
        );
        self.submit("Listing", plan).await
    }
}

#[async_trait]
impl<L: LedgerReader, W: Send + Sync> MarketplaceFeedApi for MarketplaceService<L, W> {
    async fn fetch_listings(&self, limit: usize) -> Result<Vec<ListingRecord>, MarketplaceError> {
        let events = self.events(LISTED_EVENT, limit).await?;
        let listings: Vec<ListingRecord> = join_all(events.iter().map(|e| self.resolve_listing(e)))
            .await
            .into_iter()
            .flatten()
            .collect();
        info!("[ll-02] Resolved {}/{} listings", listings.len(), events.len());
        Ok(listings)
    }

    async fn fetch_purchases(
        &self,
        buyer: &str,
        limit: usize,
    ) -> Result<Vec<PurchaseRecord>, MarketplaceError> {
        let events = self.events(PURCHASED_EVENT, limit).await?;
        let mine: Vec<&LedgerEvent> = events
            .iter()
            .filter(|e| decode_optional_string(e.parsed.get("buyer")).eq_ignore_ascii_case(buyer))
            .collect();
        let purchases: Vec<PurchaseRecord> =
            join_all(mine.iter().map(|e| self.resolve_purchase(e)))
                .await
                .into_iter()
                .flatten()
                .collect();
        info!("[ll-02] Resolved {}/{} purchases of {}", purchases.len(), mine.len(), buyer);
        Ok(purchases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared_types::testing::{InMemoryLedger, RecordingWriter};
    use shared_types::{
        EventId, LedgerError, RawValue, SubmitResponse, TransactionEffects, TxCommand,
    };

    type TestService = MarketplaceService<Arc<InMemoryLedger>, Arc<RecordingWriter>>;

    fn create_test_service(
        config: LedgerConfig,
        writer: RecordingWriter,
    ) -> (TestService, Arc<InMemoryLedger>, Arc<RecordingWriter>) {
        let ledger = Arc::new(InMemoryLedger::new());
        let writer = Arc::new(writer);
        let service = MarketplaceService::new(Arc::new(config), ledger.clone(), writer.clone());
        (service, ledger, writer)
    }

    fn experience(ledger: &InMemoryLedger, id: &str) {
        ledger.insert_object(RawObject::move_object(
            id,
            "0xpkg::experience::Experience",
            json!({"skill": "Rust", "creator": "0xC", "price": "500", "rating_count": "0"}),
        ));
    }

    fn push_event(ledger: &InMemoryLedger, name: &str, seq: u64, payload: serde_json::Value) {
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

    #[tokio::test]
    async fn test_list_zero_copies_makes_no_calls() {
        let (service, ledger, writer) =
            create_test_service(LedgerConfig::for_testing(), RecordingWriter::succeeding("D"));
        let result = service.list("0xE1", 100, "personal", 0).await;
        assert!(matches!(result, Err(MarketplaceError::Validation(_))));
        assert_eq!(ledger.call_count(), 0);
        assert_eq!(writer.call_count(), 0);
    }

    #[tokio::test]
    async fn test_list_unknown_license_makes_no_calls() {
        let (service, ledger, writer) =
            create_test_service(LedgerConfig::for_testing(), RecordingWriter::succeeding("D"));
        let result = service.list("0xE1", 100, "rental", 1).await;
        assert!(matches!(result, Err(MarketplaceError::InvalidLicense(_))));
        assert_eq!(ledger.call_count() + writer.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_package_is_configuration_error() {
        let mut config = LedgerConfig::for_testing();
        config.package_id = None;
        let (service, ledger, writer) = create_test_service(config, RecordingWriter::succeeding("D"));

        assert!(matches!(
            service.purchase("0xL1", 10).await,
            Err(MarketplaceError::Configuration(_))
        ));
        assert!(matches!(
            service.list("0xE1", 10, "personal", 1).await,
            Err(MarketplaceError::Configuration(_))
        ));
        assert!(matches!(
            service.fetch_listings(10).await,
            Err(MarketplaceError::Configuration(_))
        ));
        assert_eq!(ledger.call_count() + writer.call_count(), 0);
    }

    #[tokio::test]
    async fn test_list_builds_move_call() {
        let (service, _, writer) =
            create_test_service(LedgerConfig::for_testing(), RecordingWriter::succeeding("DigL"));
        let digest = service.list("0xE1", 2500, "view_only", 3).await.unwrap();
        assert_eq!(digest, "DigL");

        let plans = writer.submitted();
        assert_eq!(
            plans[0].commands,
            vec![TxCommand::MoveCall {
                target: "0xpkg::marketplace::list_experience".into(),
                arguments: vec![
                    TxArgument::Object("0xE1".into()),
                    TxArgument::PureU64(2500),
                    TxArgument::PureU8(4),
                    TxArgument::PureU64(3),
                ],
            }]
        );
    }

    #[tokio::test]
    async fn test_purchase_missing_listing_is_not_found() {
        let (service, _, writer) =
            create_test_service(LedgerConfig::for_testing(), RecordingWriter::succeeding("D"));
        let result = service.purchase("0xL404", 10).await;
        assert!(matches!(result, Err(MarketplaceError::NotFound(id)) if id == "0xL404"));
        assert_eq!(writer.call_count(), 0);
    }

    #[tokio::test]
    async fn test_purchase_splits_payment() {
        let (service, ledger, writer) =
            create_test_service(LedgerConfig::for_testing(), RecordingWriter::succeeding("DigP"));
        ledger.insert_object(RawObject::move_object("0xL1", "0xpkg::marketplace::Listing", json!({})));

        assert_eq!(service.purchase("0xL1", 750).await.unwrap(), "DigP");
        let commands = &writer.submitted()[0].commands;
        assert_eq!(
            commands[0],
            TxCommand::SplitCoins {
                coin: TxArgument::GasCoin,
                amounts: vec![TxArgument::PureU64(750)],
            }
        );
        assert_eq!(
            commands[1],
            TxCommand::MoveCall {
                target: "0xpkg::marketplace::purchase_experience".into(),
                arguments: vec![TxArgument::Object("0xL1".into()), TxArgument::Result(0)],
            }
        );
    }

    #[tokio::test]
    async fn test_purchase_failures_are_classified() {
        let (service, ledger, _) = create_test_service(
            LedgerConfig::for_testing(),
            RecordingWriter::failing(LedgerError::Submission("Insufficient balance for gas".into())),
        );
        ledger.insert_object(RawObject::move_object("0xL1", "0xpkg::marketplace::Listing", json!({})));
        assert!(matches!(
            service.purchase("0xL1", 750).await,
            Err(MarketplaceError::Transaction(TransactionFailure::InsufficientBalance))
        ));
    }

    #[tokio::test]
    async fn test_execution_failure_status() {
        let (service, ledger, _) = create_test_service(
            LedgerConfig::for_testing(),
            RecordingWriter::with_outcome(Ok(SubmitResponse {
                digest: "DigX".into(),
                effects: Some(TransactionEffects {
                    status: ExecutionStatus::Failure("MoveAbort(3)".into()),
                }),
            })),
        );
        ledger.insert_object(RawObject::move_object("0xL1", "0xpkg::marketplace::Listing", json!({})));
        assert!(matches!(
            service.purchase("0xL1", 1).await,
            Err(MarketplaceError::Transaction(TransactionFailure::ExecutionFailed(s))) if s == "MoveAbort(3)"
        ));
    }

    #[tokio::test]
    async fn test_fetch_listings_skips_unresolvable() {
        let (service, ledger, _) =
            create_test_service(LedgerConfig::for_testing(), RecordingWriter::succeeding("D"));
        experience(&ledger, "0xE1");
        ledger.insert_object(RawObject::move_object(
            "0xL1",
            "0xpkg::marketplace::Listing",
            json!({"experience_id": "0xE1", "price": "900", "license_type": 0, "copies_available": "5"}),
        ));
        push_event(&ledger, LISTED_EVENT, 1, json!({"listing_id": "0xL1"}));
        push_event(&ledger, LISTED_EVENT, 2, json!({"listing_id": "0xL404", "experience_id": "0xE1"}));
        push_event(&ledger, LISTED_EVENT, 3, json!({"listing_id": "0xL1", "experience_id": "0xE404"}));

        let listings = service.fetch_listings(10).await.unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].listing_id, "0xL1");
        assert_eq!(listings[0].experience.skill, "Rust");
        assert_eq!(listings[0].price, 900);
        assert_eq!(listings[0].copies_available, 5);
    }

    #[tokio::test]
    async fn test_fetch_purchases_filters_buyer() {
        let (service, ledger, _) =
            create_test_service(LedgerConfig::for_testing(), RecordingWriter::succeeding("D"));
        experience(&ledger, "0xE1");
        push_event(&ledger, PURCHASED_EVENT, 1, json!({"experience_id": "0xE1", "buyer": "0xABC", "price": "500"}));
        push_event(&ledger, PURCHASED_EVENT, 2, json!({"experience_id": "0xE1", "buyer": "0xdef", "price": "500"}));

        let purchases = service.fetch_purchases("0xabc", 10).await.unwrap();
        assert_eq!(purchases.len(), 1);
        assert_eq!(purchases[0].buyer, "0xABC");
        assert_eq!(purchases[0].purchase_id, "Dig1");
        assert_eq!(purchases[0].experience.id, "0xE1");
    }

    #[tokio::test]
    async fn test_read_only_service_reads_feeds() {
        let ledger = Arc::new(InMemoryLedger::new());
        let service = MarketplaceService::read_only(Arc::new(LedgerConfig::for_testing()), ledger);
        assert!(service.fetch_listings(5).await.unwrap().is_empty());
    }
}
