//! # Raw Ledger Objects
//!
//! Opaque object, dynamic-field and event representations as returned by the
//! ledger read collaborator. These are fetched on demand, never cached across
//! calls, and discarded once projected into domain entities.

use crate::value::{Fields, RawValue, ABSENT};
use serde::{Deserialize, Serialize};

/// Ledger object identifier (`0x`-prefixed hex).
pub type ObjectId = String;

/// What to include when fetching an object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectOptions {
    /// Include typed content.
    pub show_content: bool,
    /// Include the owner.
    pub show_owner: bool,
}

impl ObjectOptions {
    /// Content only.
    pub const CONTENT: Self = Self {
        show_content: true,
        show_owner: false,
    };

    /// Content and owner.
    pub const FULL: Self = Self {
        show_content: true,
        show_owner: true,
    };
}

/// Data-type discriminator on object content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    /// A structured move object, the only kind the projectors accept.
    MoveObject,
    /// A published package.
    Package,
    /// Anything else the ledger may introduce.
    Other(String),
}

impl DataType {
    /// Parse the wire discriminator.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "moveObject" => DataType::MoveObject,
            "package" => DataType::Package,
            other => DataType::Other(other.to_string()),
        }
    }
}

/// Object owner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    /// Owned by an account address.
    Address(String),
    /// Owned by another object (dynamic fields, wrapped objects).
    Object(String),
    /// Shared object.
    Shared {
        /// Version at which the object became shared.
        initial_shared_version: u64,
    },
    /// Frozen object.
    Immutable,
}

impl Owner {
    /// Parse the owner rendering `{"AddressOwner": ..}`, `{"ObjectOwner": ..}`,
    /// `{"Shared": {"initial_shared_version": ..}}` or `"Immutable"`.
    pub fn from_raw(raw: &RawValue) -> Option<Self> {
        if let Some(text) = raw.as_text() {
            return (text == "Immutable").then_some(Owner::Immutable);
        }
        if let Some(addr) = raw.get("AddressOwner").as_text() {
            return Some(Owner::Address(addr));
        }
        if let Some(obj) = raw.get("ObjectOwner").as_text() {
            return Some(Owner::Object(obj));
        }
        let shared = raw.get("Shared");
        if !shared.is_absent() {
            let version = shared.get("initial_shared_version").as_u64().unwrap_or(0);
            return Some(Owner::Shared {
                initial_shared_version: version,
            });
        }
        None
    }
}

/// Typed content of an object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectContent {
    /// Data-type discriminator.
    pub data_type: DataType,
    /// Fully qualified struct type, when the ledger reports one.
    pub type_name: Option<String>,
    /// Field map.
    pub fields: Fields,
}

impl ObjectContent {
    /// Look up a field. Misses yield the absent value.
    pub fn field(&self, name: &str) -> &RawValue {
        self.fields.get(name).unwrap_or(&ABSENT)
    }

    /// Is this a structured move object?
    pub fn is_move_object(&self) -> bool {
        self.data_type == DataType::MoveObject
    }
}

/// A ledger object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawObject {
    /// Object identifier.
    pub object_id: ObjectId,
    /// Object version, when reported.
    pub version: Option<u64>,
    /// Owner, when requested and reported.
    pub owner: Option<Owner>,
    /// Typed content, when requested and reported.
    pub content: Option<ObjectContent>,
}

impl RawObject {
    /// Build a move object from a JSON field map.
    pub fn move_object(
        object_id: impl Into<String>,
        type_name: impl Into<String>,
        fields: serde_json::Value,
    ) -> Self {
        let fields = match RawValue::from(fields) {
            RawValue::Struct(fields) => fields,
            _ => Fields::new(),
        };
        Self {
            object_id: object_id.into(),
            version: None,
            owner: None,
            content: Some(ObjectContent {
                data_type: DataType::MoveObject,
                type_name: Some(type_name.into()),
                fields,
            }),
        }
    }

    /// Parse the `data` payload of an object response:
    /// `{"objectId", "version", "owner", "content": {"dataType", "type", "fields"}}`.
    pub fn from_json(data: serde_json::Value) -> Option<Self> {
        let data = RawValue::from(data);
        let object_id = data.get("objectId").as_text()?;
        let content = data.get("content");
        let content = if content.is_absent() {
            None
        } else {
            let data_type = content
                .get("dataType")
                .as_text()
                .map(|d| DataType::parse(&d))
                .unwrap_or_else(|| DataType::Other(String::new()));
            Some(ObjectContent {
                data_type,
                type_name: content.get("type").as_text(),
                fields: content.get("fields").as_struct().cloned().unwrap_or_default(),
            })
        };
        Some(Self {
            object_id,
            version: data.get("version").as_u64(),
            owner: Owner::from_raw(data.get("owner")),
            content,
        })
    }

    /// Field map of a move object; `None` when the content is absent or of
    /// another data type.
    pub fn move_fields(&self) -> Option<&Fields> {
        self.content
            .as_ref()
            .filter(|c| c.is_move_object())
            .map(|c| &c.fields)
    }

    /// The struct type name, if known.
    pub fn type_name(&self) -> Option<&str> {
        self.content.as_ref().and_then(|c| c.type_name.as_deref())
    }
}

/// Structured key of a dynamic field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicFieldName {
    /// Key type (e.g. `u8`, `address`).
    pub type_name: String,
    /// Key value as JSON, passed back verbatim when reading the child.
    pub value: serde_json::Value,
}

impl DynamicFieldName {
    /// Key value as a raw value.
    pub fn value_raw(&self) -> RawValue {
        RawValue::from(self.value.clone())
    }
}

/// Descriptor of one dynamic field under a parent object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicFieldInfo {
    /// Key.
    pub name: DynamicFieldName,
    /// Identifier of the field object itself.
    pub object_id: ObjectId,
    /// Type of the field object.
    pub object_type: String,
}

/// Identifier of an emitted event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventId {
    /// Digest of the emitting transaction.
    pub tx_digest: String,
    /// Sequence within that transaction.
    pub event_seq: u64,
}

/// Query direction for events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventOrder {
    /// Oldest first.
    Ascending,
    /// Newest first.
    #[default]
    Descending,
}

/// An emitted ledger event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// Event identifier.
    pub id: EventId,
    /// Fully qualified event type.
    pub event_type: String,
    /// Transaction sender.
    pub sender: String,
    /// Parsed event payload.
    pub parsed: RawValue,
    /// Emission time, milliseconds since epoch.
    pub timestamp_ms: Option<u64>,
}
