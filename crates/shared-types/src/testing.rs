//! # In-Memory Collaborators
//!
//! Deterministic implementations of the collaborator ports, with call
//! counters and failure injection. Used by unit and end-to-end tests.

use crate::errors::LedgerError;
use crate::object::{
    DynamicFieldInfo, DynamicFieldName, EventOrder, LedgerEvent, ObjectId, ObjectOptions,
    RawObject,
};
use crate::ports::{BlobStore, LedgerReader, LedgerWriter};
use crate::transaction::{SubmitResponse, TransactionPlan};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory ledger read client.
#[derive(Default)]
pub struct InMemoryLedger {
    objects: RwLock<HashMap<ObjectId, RawObject>>,
    fields: RwLock<HashMap<ObjectId, Vec<DynamicFieldInfo>>>,
    events: RwLock<Vec<LedgerEvent>>,
    failing: RwLock<HashSet<ObjectId>>,
    calls: AtomicUsize,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object.
    pub fn insert_object(&self, object: RawObject) {
        self.objects.write().insert(object.object_id.clone(), object);
    }

    /// Attach a dynamic field under `parent`; returns the field object's id.
    pub fn insert_dynamic_field(
        &self,
        parent: &str,
        name_type: &str,
        name_value: serde_json::Value,
        value: serde_json::Value,
    ) -> ObjectId {
        let mut fields = self.fields.write();
        let siblings = fields.entry(parent.to_string()).or_default();
        let child_id = format!("{}::field::{}", parent, siblings.len());
        let object_type = format!("0x2::dynamic_field::Field<{}, _>", name_type);
        siblings.push(DynamicFieldInfo {
            name: DynamicFieldName {
                type_name: name_type.to_string(),
                value: name_value.clone(),
            },
            object_id: child_id.clone(),
            object_type: object_type.clone(),
        });
        self.insert_object(RawObject::move_object(
            child_id.clone(),
            object_type,
            serde_json::json!({
                "id": {"id": child_id},
                "name": name_value,
                "value": value,
            }),
        ));
        child_id
    }

    /// Make every read touching `id` fail with a network error.
    pub fn fail_object(&self, id: &str) {
        self.failing.write().insert(id.to_string());
    }

    /// Record an emitted event (appended as the newest).
    pub fn push_event(&self, event: LedgerEvent) {
        self.events.write().push(event);
    }

    /// Number of collaborator calls served so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn check(&self, id: &str) -> Result<(), LedgerError> {
        if self.failing.read().contains(id) {
            return Err(LedgerError::Network(format!("injected failure for {}", id)));
        }
        Ok(())
    }

    fn lookup(&self, id: &str) -> Result<RawObject, LedgerError> {
        self.check(id)?;
        self.objects
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl LedgerReader for InMemoryLedger {
    async fn get_object(&self, id: &str, _options: ObjectOptions) -> Result<RawObject, LedgerError> {
        self.touch();
        self.lookup(id)
    }

    async fn multi_get_objects(
        &self,
        ids: &[ObjectId],
        _options: ObjectOptions,
    ) -> Result<Vec<Result<RawObject, LedgerError>>, LedgerError> {
        self.touch();
        Ok(ids.iter().map(|id| self.lookup(id)).collect())
    }

    async fn list_dynamic_fields(
        &self,
        parent_id: &str,
    ) -> Result<Vec<DynamicFieldInfo>, LedgerError> {
        self.touch();
        self.check(parent_id)?;
        Ok(self.fields.read().get(parent_id).cloned().unwrap_or_default())
    }

    async fn get_dynamic_field_object(
        &self,
        parent_id: &str,
        name: &DynamicFieldName,
    ) -> Result<RawObject, LedgerError> {
        self.touch();
        let child_id = self
            .fields
            .read()
            .get(parent_id)
            .and_then(|fields| fields.iter().find(|f| &f.name == name))
            .map(|f| f.object_id.clone())
            .ok_or_else(|| LedgerError::NotFound(format!("{}[{}]", parent_id, name.value)))?;
        self.lookup(&child_id)
    }

    async fn query_events(
        &self,
        event_type: &str,
        limit: usize,
        order: EventOrder,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        self.touch();
        let events = self.events.read();
        let matching = events.iter().filter(|e| e.event_type == event_type);
        let window: Vec<LedgerEvent> = match order {
            EventOrder::Ascending => matching.take(limit).cloned().collect(),
            EventOrder::Descending => matching.rev().take(limit).cloned().collect(),
        };
        Ok(window)
    }
}

/// Ledger write client that records plans instead of signing them.
pub struct RecordingWriter {
    outcome: Result<SubmitResponse, LedgerError>,
    submitted: Mutex<Vec<TransactionPlan>>,
}

impl RecordingWriter {
    /// Every submission succeeds with the given digest.
    pub fn succeeding(digest: impl Into<String>) -> Self {
        Self::with_outcome(Ok(SubmitResponse {
            digest: digest.into(),
            effects: None,
        }))
    }

    /// Every submission fails with the given error.
    pub fn failing(error: LedgerError) -> Self {
        Self::with_outcome(Err(error))
    }

    /// Every submission returns the given outcome.
    pub fn with_outcome(outcome: Result<SubmitResponse, LedgerError>) -> Self {
        Self {
            outcome,
            submitted: Mutex::new(Vec::new()),
        }
    }

    /// Plans submitted so far.
    pub fn submitted(&self) -> Vec<TransactionPlan> {
        self.submitted.lock().clone()
    }

    /// Number of submissions so far.
    pub fn call_count(&self) -> usize {
        self.submitted.lock().len()
    }
}

#[async_trait]
impl LedgerWriter for RecordingWriter {
    async fn sign_and_submit(&self, plan: TransactionPlan) -> Result<SubmitResponse, LedgerError> {
        self.submitted.lock().push(plan);
        self.outcome.clone()
    }
}

/// In-memory content store.
#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
    calls: AtomicUsize,
}

impl InMemoryBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a blob.
    pub fn put(&self, content_id: impl Into<String>, bytes: Vec<u8>) {
        self.blobs.write().insert(content_id.into(), bytes);
    }

    /// Number of reads served so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn get_blob(&self, content_id: &str) -> Result<Vec<u8>, LedgerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.blobs
            .read()
            .get(content_id)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(content_id.to_string()))
    }
}
