//! # Task Projection
//!
//! Maps raw ledger objects into [`TaskEntity`] and [`RoleGrant`] values.
//! Projection fails softly: a rejected object yields `None` and a warning,
//! never an error.

use chrono::{DateTime, Duration, Utc};
use shared_types::{
    decode_optional_address, decode_optional_instant, decode_optional_string,
    decode_optional_u64, DynamicFieldInfo, RawObject, RawValue, ResolverSettings, RoleGrant,
    TaskEntity, TaskStatus,
};
use tracing::warn;

/// Priority used when the ledger has none.
pub const DEFAULT_PRIORITY: u8 = 0;

/// Project one task object.
///
/// Returns `None` when the content is absent, is not a structured object, or
/// carries no parseable status code.
pub fn project_task(object: &RawObject, settings: &ResolverSettings) -> Option<TaskEntity> {
    let id = &object.object_id;
    let Some(content) = object.content.as_ref() else {
        warn!("[ll-01] Task {} has no content, skipping", id);
        return None;
    };
    if !content.is_move_object() {
        warn!(
            "[ll-01] Task {} has data type {:?}, expected a move object",
            id, content.data_type
        );
        return None;
    }

    let Some(code) = decode_optional_u64(content.field("status")) else {
        warn!("[ll-01] Task {} has an unparseable status, skipping", id);
        return None;
    };
    let status = TaskStatus::from_code(code);
    if let TaskStatus::Unknown(code) = status {
        warn!("[ll-01] Task {} has unknown status code {}, treating as open", id, code);
    }

    let created_at = decode_optional_instant(content.field("created_at")).unwrap_or_else(|| {
        warn!("[ll-01] Task {} has an unparseable created_at, using epoch", id);
        DateTime::<Utc>::default()
    });
    let due_date = decode_optional_instant(content.field("due_date"))
        .unwrap_or_else(|| default_due_date(created_at, settings.default_due_days));

    let priority = decode_optional_u64(content.field("priority"))
        .and_then(|p| u8::try_from(p).ok())
        .unwrap_or(DEFAULT_PRIORITY);

    Some(TaskEntity {
        id: id.clone(),
        title: decode_optional_string(content.field("title")),
        description: decode_optional_string(content.field("description")),
        creator: decode_optional_string(content.field("creator")),
        status,
        is_completed: status.is_completed(),
        created_at,
        due_date,
        priority,
        assignee: decode_optional_address(content.field("assignee")),
        access_control_table_id: table_id(content.field(&settings.role_table_field)),
    })
}

/// Creation plus the configured offset; saturates at the creation instant.
pub fn default_due_date(created_at: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    Duration::try_days(days)
        .and_then(|offset| created_at.checked_add_signed(offset))
        .unwrap_or(created_at)
}

/// Table id of a (possibly option-wrapped) table field.
fn table_id(value: &RawValue) -> Option<String> {
    value
        .object_id()
        .or_else(|| value.as_list()?.first()?.object_id())
        .or_else(|| value.get("vec").as_list()?.first()?.object_id())
}

/// Project one role-table row: the key is the grantee address, the value the
/// permission code.
pub fn project_role_grant(field: &DynamicFieldInfo, value: &RawValue) -> Option<RoleGrant> {
    let Some(address) = decode_optional_address(&field.name.value_raw()) else {
        warn!("[ll-01] Role row {} has no address key", field.object_id);
        return None;
    };
    let role = decode_optional_u64(value)
        .or_else(|| decode_optional_u64(value.path(&["fields", "role"])))
        .and_then(|r| u8::try_from(r).ok());
    match role {
        Some(role) => Some(RoleGrant { address, role }),
        None => {
            warn!("[ll-01] Role row {} has no parseable role code", field.object_id);
            None
        }
    }
}
