//! # Collaborator Ports
//!
//! Outbound traits for the external collaborators: the ledger read client,
//! the ledger write client (signer) and the content storage client.

use crate::errors::LedgerError;
use crate::object::{
    DynamicFieldInfo, DynamicFieldName, EventOrder, LedgerEvent, ObjectId, ObjectOptions,
    RawObject,
};
use crate::transaction::{SubmitResponse, TransactionPlan};
use async_trait::async_trait;
use std::sync::Arc;

/// Ledger read client - outbound port.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// Fetch one object.
    async fn get_object(&self, id: &str, options: ObjectOptions) -> Result<RawObject, LedgerError>;

    /// Fetch many objects in one round trip.
    ///
    /// Order-preserving: exactly one entry per input id; individual entries
    /// may be errors.
    async fn multi_get_objects(
        &self,
        ids: &[ObjectId],
        options: ObjectOptions,
    ) -> Result<Vec<Result<RawObject, LedgerError>>, LedgerError>;

    /// Enumerate all dynamic fields under a parent object.
    async fn list_dynamic_fields(&self, parent_id: &str)
        -> Result<Vec<DynamicFieldInfo>, LedgerError>;

    /// Read one dynamic field object. Its content carries `name` and `value`.
    async fn get_dynamic_field_object(
        &self,
        parent_id: &str,
        name: &DynamicFieldName,
    ) -> Result<RawObject, LedgerError>;

    /// Query a bounded window of emitted events of one type.
    async fn query_events(
        &self,
        event_type: &str,
        limit: usize,
        order: EventOrder,
    ) -> Result<Vec<LedgerEvent>, LedgerError>;
}

/// Ledger write client - outbound port.
#[async_trait]
pub trait LedgerWriter: Send + Sync {
    /// Sign, submit and execute a transaction plan.
    async fn sign_and_submit(&self, plan: TransactionPlan) -> Result<SubmitResponse, LedgerError>;
}

/// Content storage client - outbound port.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Fetch the raw bytes stored under a content identifier.
    async fn get_blob(&self, content_id: &str) -> Result<Vec<u8>, LedgerError>;
}

#[async_trait]
impl<T: LedgerReader + ?Sized> LedgerReader for Arc<T> {
    async fn get_object(&self, id: &str, options: ObjectOptions) -> Result<RawObject, LedgerError> {
        (**self).get_object(id, options).await
    }

    async fn multi_get_objects(
        &self,
        ids: &[ObjectId],
        options: ObjectOptions,
    ) -> Result<Vec<Result<RawObject, LedgerError>>, LedgerError> {
        (**self).multi_get_objects(ids, options).await
    }

    async fn list_dynamic_fields(
        &self,
        parent_id: &str,
    ) -> Result<Vec<DynamicFieldInfo>, LedgerError> {
        (**self).list_dynamic_fields(parent_id).await
    }

    async fn get_dynamic_field_object(
        &self,
        parent_id: &str,
        name: &DynamicFieldName,
    ) -> Result<RawObject, LedgerError> {
        (**self).get_dynamic_field_object(parent_id, name).await
    }

    async fn query_events(
        &self,
        event_type: &str,
        limit: usize,
        order: EventOrder,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        (**self).query_events(event_type, limit, order).await
    }
}

#[async_trait]
impl<T: LedgerWriter + ?Sized> LedgerWriter for Arc<T> {
    async fn sign_and_submit(&self, plan: TransactionPlan) -> Result<SubmitResponse, LedgerError> {
        (**self).sign_and_submit(plan).await
    }
}

#[async_trait]
impl<T: BlobStore + ?Sized> BlobStore for Arc<T> {
    async fn get_blob(&self, content_id: &str) -> Result<Vec<u8>, LedgerError> {
        (**self).get_blob(content_id).await
    }
}
