//! # Dynamic Collection Walker
//!
//! A ledger table is a parent object whose rows are dynamic fields. Walking
//! one means: list the children, read each child's `value`, interpret it.
//!
//! The same walk serves two call sites:
//!
//! - [`flatten_bucketed_ids`]: each row is a status bucket holding a vector
//!   of task ids.
//! - [`resolve_role_table`]: each row maps an address to a role code.
//!
//! Child reads run concurrently. A child that cannot be read or interpreted
//! is skipped with a warning; only a failure to list the table itself is an
//! error.

use futures::future::join_all;
use shared_types::{
    DynamicFieldInfo, DynamicFieldName, LedgerError, LedgerReader, ObjectId, RawValue, RoleGrant,
};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::domain::project_role_grant;

/// Walks the dynamic fields of one parent object.
pub struct CollectionWalker<'a, L: ?Sized> {
    ledger: &'a L,
}

impl<'a, L: LedgerReader + ?Sized> CollectionWalker<'a, L> {
    /// Create a walker over a ledger read client.
    pub fn new(ledger: &'a L) -> Self {
        Self { ledger }
    }

    /// Enumerate the rows under `parent_id`.
    pub async fn list_children(&self, parent_id: &str) -> Result<Vec<DynamicFieldInfo>, LedgerError> {
        self.ledger.list_dynamic_fields(parent_id).await
    }

    /// Read one row's value.
    pub async fn read_child(
        &self,
        parent_id: &str,
        name: &DynamicFieldName,
    ) -> Result<RawValue, LedgerError> {
        let object = self.ledger.get_dynamic_field_object(parent_id, name).await?;
        object
            .content
            .as_ref()
            .map(|content| content.field("value").clone())
            .ok_or_else(|| {
                LedgerError::Malformed(format!("dynamic field {} has no content", object.object_id))
            })
    }

    /// Read every row and keep what `interpret` accepts, in enumeration order.
    pub async fn walk<T>(
        &self,
        parent_id: &str,
        interpret: impl Fn(&DynamicFieldInfo, &RawValue) -> Option<T>,
    ) -> Result<Vec<T>, LedgerError> {
        let children = self.list_children(parent_id).await?;
        debug!("[ll-01] Walking {} rows under {}", children.len(), parent_id);

        let values =
            join_all(children.iter().map(|child| self.read_child(parent_id, &child.name))).await;

        let mut out = Vec::with_capacity(children.len());
        for (child, value) in children.iter().zip(values) {
            match value {
                Ok(value) => {
                    if let Some(item) = interpret(child, &value) {
                        out.push(item);
                    }
                }
                Err(e) => {
                    warn!("[ll-01] Skipping row {} of {}: {}", child.object_id, parent_id, e);
                }
            }
        }
        Ok(out)
    }
}

/// Flatten a status-bucket table into a deduplicated id list.
///
/// First occurrence wins; order follows bucket enumeration, which the ledger
/// does not guarantee to be stable.
pub async fn flatten_bucketed_ids<L: LedgerReader + ?Sized>(
    ledger: &L,
    table_id: &str,
) -> Result<Vec<ObjectId>, LedgerError> {
    let buckets = CollectionWalker::new(ledger)
        .walk(table_id, |child, value| {
            let ids = value.id_list();
            if ids.is_none() {
                warn!("[ll-01] Bucket {} is not a list of ids, skipping", child.object_id);
            }
            ids
        })
        .await?;

    let mut seen = HashSet::new();
    Ok(buckets
        .into_iter()
        .flatten()
        .filter(|id| seen.insert(id.clone()))
        .collect())
}

/// Read a role table into grants, one per address (first row wins).
/// Addresses are compared case-insensitively.
pub async fn resolve_role_table<L: LedgerReader + ?Sized>(
    ledger: &L,
    table_id: &str,
) -> Result<Vec<RoleGrant>, LedgerError> {
    let grants = CollectionWalker::new(ledger)
        .walk(table_id, project_role_grant)
        .await?;

    let mut seen = HashSet::new();
    Ok(grants
        .into_iter()
        .filter(|grant| seen.insert(grant.address.to_lowercase()))
        .collect())
}
