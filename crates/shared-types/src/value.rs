//! # Raw Ledger Values
//!
//! The ledger's object model renders the same logical value in several
//! shapes. [`RawValue`] is the closed sum type every response is converted
//! into at the adapter boundary.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Field map of a struct-shaped value.
pub type Fields = BTreeMap<String, RawValue>;

/// Shared absent value, handed out by lookups that miss.
pub static ABSENT: RawValue = RawValue::Absent;

/// A plain scalar as rendered by the ledger.
///
/// Large integers (`u64` amounts, millisecond timestamps) are usually
/// rendered as decimal strings, small ones (`u8` codes) as JSON numbers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scalar {
    /// Text value (strings, addresses, decimal-encoded integers).
    Text(String),
    /// Unsigned integer that fit in a JSON number.
    Int(u64),
    /// Boolean flag.
    Bool(bool),
}

impl Scalar {
    /// Interpret the scalar as an unsigned integer.
    ///
    /// Text is parsed as a decimal; surrounding whitespace is tolerated.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Scalar::Int(n) => Some(*n),
            Scalar::Text(s) => s.trim().parse().ok(),
            Scalar::Bool(_) => None,
        }
    }

    /// Interpret the scalar as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            Scalar::Text(s) => s.trim().parse().ok(),
            Scalar::Int(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Int(n) => write!(f, "{}", n),
            Scalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// One value from a ledger object's content.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawValue {
    /// Null or missing.
    #[default]
    Absent,
    /// Plain scalar.
    Scalar(Scalar),
    /// Vector of values.
    List(Vec<RawValue>),
    /// Nested struct, including the known option wrapper shapes.
    Struct(Fields),
}

impl RawValue {
    /// Build a text scalar.
    pub fn text(value: impl Into<String>) -> Self {
        RawValue::Scalar(Scalar::Text(value.into()))
    }

    /// Build an integer scalar.
    pub fn int(value: u64) -> Self {
        RawValue::Scalar(Scalar::Int(value))
    }

    /// Is this the absent value?
    pub fn is_absent(&self) -> bool {
        matches!(self, RawValue::Absent)
    }

    /// Borrow the scalar, if this is one.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            RawValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the element list, if this is a vector.
    pub fn as_list(&self) -> Option<&[RawValue]> {
        match self {
            RawValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow the field map, if this is a struct.
    pub fn as_struct(&self) -> Option<&Fields> {
        match self {
            RawValue::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// Look up a struct field. Misses (and non-structs) yield [`ABSENT`].
    pub fn get(&self, key: &str) -> &RawValue {
        self.as_struct()
            .and_then(|fields| fields.get(key))
            .unwrap_or(&ABSENT)
    }

    /// Follow a chain of struct fields.
    pub fn path(&self, keys: &[&str]) -> &RawValue {
        keys.iter().fold(self, |value, key| value.get(key))
    }

    /// Render a scalar as text.
    pub fn as_text(&self) -> Option<String> {
        self.as_scalar().map(Scalar::to_string)
    }

    /// Interpret a scalar as an unsigned integer.
    pub fn as_u64(&self) -> Option<u64> {
        self.as_scalar().and_then(Scalar::as_u64)
    }

    /// Extract an object identifier from any of the UID renderings:
    /// `"0x.."`, `{"id": "0x.."}`, `{"id": {"id": "0x.."}}` or a table
    /// struct `{"fields": {"id": {"id": "0x.."}}}`.
    pub fn object_id(&self) -> Option<String> {
        match self {
            RawValue::Scalar(Scalar::Text(id)) if !id.is_empty() => Some(id.clone()),
            RawValue::Struct(fields) => {
                if let Some(inner) = fields.get("id") {
                    return inner.object_id();
                }
                fields.get("fields").and_then(RawValue::object_id)
            }
            _ => None,
        }
    }

    /// Collect the identifiers held in a vector value.
    ///
    /// Returns `None` when the value is not list-shaped. Elements that carry no
    /// identifier are dropped.
    pub fn id_list(&self) -> Option<Vec<String>> {
        let items = match self {
            RawValue::List(items) => items.as_slice(),
            RawValue::Struct(fields) => fields.get("vec")?.as_list()?,
            _ => return None,
        };
        Some(items.iter().filter_map(RawValue::object_id).collect())
    }
}

impl From<serde_json::Value> for RawValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => RawValue::Absent,
            Value::Bool(b) => RawValue::Scalar(Scalar::Bool(b)),
            Value::Number(n) => match n.as_u64() {
                Some(u) => RawValue::Scalar(Scalar::Int(u)),
                None => RawValue::Scalar(Scalar::Text(n.to_string())),
            },
            Value::String(s) => RawValue::Scalar(Scalar::Text(s)),
            Value::Array(items) => RawValue::List(items.into_iter().map(RawValue::from).collect()),
            Value::Object(map) => RawValue::Struct(
                map.into_iter()
                    .map(|(k, v)| (k, RawValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::text(value)
    }
}
