//! # Optional Value Decoder
//!
//! Normalizes the heterogeneous encodings of an optional ledger value into a
//! canonical "present scalar" or "absent".
//!
//! ## Recognized Shapes (tried top to bottom)
//!
//! | # | Shape | Result |
//! |---|-------|--------|
//! | 1 | null / absent | absent |
//! | 2 | plain scalar | the scalar |
//! | 3 | list | first element, absent if empty |
//! | 4 | `{"vec": [..]}` | first element |
//! | 5 | `{"fields": {"some": scalar}}` | the scalar |
//! | 6 | `{"fields": {"some": {"fields": {"bytes": v}}}}` | `v` |
//! | 7 | anything else | absent |
//!
//! Order matters: a payload carrying both `vec` and `fields` is a vec wrapper.

use crate::value::{RawValue, Scalar};
use chrono::{DateTime, TimeZone, Utc};

/// The decoded form of a value understood as "present T" or "absent".
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CanonicalOptional<T> {
    /// A value was present.
    Present(T),
    /// No value, or an unrecognized shape.
    Absent,
}

impl<T> CanonicalOptional<T> {
    /// Convert into a std `Option`.
    pub fn into_option(self) -> Option<T> {
        match self {
            CanonicalOptional::Present(v) => Some(v),
            CanonicalOptional::Absent => None,
        }
    }

    /// Map the present value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> CanonicalOptional<U> {
        match self {
            CanonicalOptional::Present(v) => CanonicalOptional::Present(f(v)),
            CanonicalOptional::Absent => CanonicalOptional::Absent,
        }
    }

    /// Is a value present?
    pub fn is_present(&self) -> bool {
        matches!(self, CanonicalOptional::Present(_))
    }
}

impl<T: Default> CanonicalOptional<T> {
    /// The present value, or the type's empty default.
    pub fn unwrap_or_default(self) -> T {
        self.into_option().unwrap_or_default()
    }
}

impl<T> From<Option<T>> for CanonicalOptional<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => CanonicalOptional::Present(v),
            None => CanonicalOptional::Absent,
        }
    }
}

/// Which recognized shape a value matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionalShape<'a> {
    /// Shape 1.
    Absent,
    /// Shape 2.
    Plain(&'a Scalar),
    /// Shape 3.
    ListLike(&'a [RawValue]),
    /// Shape 4.
    VecWrapper(&'a [RawValue]),
    /// Shape 5.
    SomeWrapper(&'a Scalar),
    /// Shape 6.
    BytesWrapper(&'a RawValue),
    /// Shape 7.
    Unrecognized,
}

/// Classify a value against the ordered shape list.
pub fn classify(value: &RawValue) -> OptionalShape<'_> {
    match value {
        RawValue::Absent => OptionalShape::Absent,
        RawValue::Scalar(s) => OptionalShape::Plain(s),
        RawValue::List(items) => OptionalShape::ListLike(items),
        RawValue::Struct(_) => {
            if let Some(items) = value.get("vec").as_list() {
                return OptionalShape::VecWrapper(items);
            }
            let some = value.path(&["fields", "some"]);
            if let Some(s) = some.as_scalar() {
                return OptionalShape::SomeWrapper(s);
            }
            let bytes = some.path(&["fields", "bytes"]);
            if !bytes.is_absent() {
                return OptionalShape::BytesWrapper(bytes);
            }
            OptionalShape::Unrecognized
        }
    }
}

/// Decode an optional value into its canonical scalar.
pub fn decode_optional(value: &RawValue) -> CanonicalOptional<Scalar> {
    match classify(value) {
        OptionalShape::Absent | OptionalShape::Unrecognized => CanonicalOptional::Absent,
        OptionalShape::Plain(s) | OptionalShape::SomeWrapper(s) => {
            CanonicalOptional::Present(s.clone())
        }
        OptionalShape::ListLike(items) | OptionalShape::VecWrapper(items) => match items.first() {
            Some(first) => decode_optional(first),
            None => CanonicalOptional::Absent,
        },
        OptionalShape::BytesWrapper(bytes) => decode_bytes(bytes),
    }
}

/// `bytes` is either already text or a `vector<u8>` of UTF-8.
fn decode_bytes(bytes: &RawValue) -> CanonicalOptional<Scalar> {
    if let Some(s) = bytes.as_scalar() {
        return CanonicalOptional::Present(s.clone());
    }
    if let Some(items) = bytes.as_list() {
        let raw: Option<Vec<u8>> = items
            .iter()
            .map(|b| b.as_u64().and_then(|n| u8::try_from(n).ok()))
            .collect();
        if let Some(raw) = raw {
            let text = String::from_utf8_lossy(&raw).into_owned();
            return CanonicalOptional::Present(Scalar::Text(text));
        }
    }
    decode_optional(bytes)
}

/// Decode an optional value as a string. Never fails: absent and unknown
/// shapes yield the empty string.
pub fn decode_optional_string(value: &RawValue) -> String {
    decode_optional(value)
        .map(|s| s.to_string())
        .unwrap_or_default()
}

/// Decode an optional unsigned integer. Unparseable text counts as absent.
pub fn decode_optional_u64(value: &RawValue) -> Option<u64> {
    decode_optional(value).into_option().and_then(|s| s.as_u64())
}

/// Decode an optional address (or object id). Empty strings count as absent.
pub fn decode_optional_address(value: &RawValue) -> Option<String> {
    Some(decode_optional_string(value)).filter(|s| !s.is_empty())
}

/// Convert milliseconds since the epoch into an instant.
pub fn instant_from_millis(millis: u64) -> Option<DateTime<Utc>> {
    let millis = i64::try_from(millis).ok()?;
    Utc.timestamp_millis_opt(millis).single()
}

/// Decode an optional millisecond timestamp into an instant.
pub fn decode_optional_instant(value: &RawValue) -> Option<DateTime<Utc>> {
    decode_optional_u64(value).and_then(instant_from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn decode(v: serde_json::Value) -> String {
        decode_optional_string(&RawValue::from(v))
    }

    #[test]
    fn test_null_is_empty() {
        assert_eq!(decode(json!(null)), "");
        assert_eq!(decode_optional_string(&RawValue::Absent), "");
    }

    #[test]
    fn test_plain_string() {
        assert_eq!(decode(json!("hello")), "hello");
    }

    #[test]
    fn test_list_first_element() {
        assert_eq!(decode(json!(["first", "second"])), "first");
        assert_eq!(decode(json!([])), "");
    }

    #[test]
    fn test_vec_wrapper() {
        assert_eq!(decode(json!({"vec": ["0xabc"]})), "0xabc");
        assert_eq!(decode(json!({"vec": []})), "");
    }

    #[test]
    fn test_some_wrapper() {
        assert_eq!(decode(json!({"fields": {"some": "value"}})), "value");
    }

    #[test]
    fn test_bytes_wrapper() {
        assert_eq!(
            decode(json!({"fields": {"some": {"fields": {"bytes": "blob-1"}}}})),
            "blob-1"
        );
        assert_eq!(
            decode(json!({"fields": {"some": {"fields": {"bytes": [104, 105]}}}})),
            "hi"
        );
    }

    #[test]
    fn test_unknown_shape_is_empty() {
        assert_eq!(decode(json!({})), "");
        assert_eq!(decode(json!({"other": 1})), "");
    }

    #[test]
    fn test_vec_takes_precedence_over_fields() {
        let ambiguous = json!({"vec": ["from-vec"], "fields": {"some": "from-some"}});
        assert_eq!(decode(ambiguous), "from-vec");
    }

    #[test]
    fn test_numeric_scalars_render_as_text() {
        assert_eq!(decode(json!(42)), "42");
        assert_eq!(decode_optional_u64(&RawValue::from(json!({"vec": ["1700"]}))), Some(1700));
        assert_eq!(decode_optional_u64(&RawValue::from(json!("soon"))), None);
    }

    #[test]
    fn test_optional_address() {
        assert_eq!(decode_optional_address(&RawValue::from(json!({"vec": []}))), None);
        assert_eq!(
            decode_optional_address(&RawValue::from(json!(["0xdead"]))).as_deref(),
            Some("0xdead")
        );
    }

    #[test]
    fn test_classify_order() {
        let value = RawValue::from(json!({"fields": {"some": "x"}}));
        assert!(matches!(classify(&value), OptionalShape::SomeWrapper(_)));
        let value = RawValue::from(json!({"fields": {"none": true}}));
        assert_eq!(classify(&value), OptionalShape::Unrecognized);
    }

    #[test]
    fn test_instant_from_millis() {
        let instant = instant_from_millis(1_700_000_000_000).unwrap();
        assert_eq!(instant.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(instant.to_rfc3339(), "2023-11-14T22:13:20+00:00");
        assert!(instant_from_millis(u64::MAX).is_none());
        assert!(decode_optional_instant(&RawValue::text("later")).is_none());
    }

    fn arb_raw_value() -> impl Strategy<Value = RawValue> {
        let leaf = prop_oneof![
            Just(RawValue::Absent),
            any::<u64>().prop_map(RawValue::int),
            "[a-z0-9]{0,8}".prop_map(RawValue::text),
            any::<bool>().prop_map(|b| RawValue::Scalar(Scalar::Bool(b))),
        ];
        leaf.prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(RawValue::List),
                prop::collection::btree_map("(vec|fields|some|bytes|id)", inner, 0..3)
                    .prop_map(RawValue::Struct),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_decode_never_panics(value in arb_raw_value()) {
            let _ = decode_optional_string(&value);
            let _ = decode_optional_u64(&value);
        }

        #[test]
        fn prop_plain_text_is_identity(s in "[a-zA-Z0-9]{0,16}") {
            prop_assert_eq!(decode_optional_string(&RawValue::text(s.clone())), s);
        }
    }
}
