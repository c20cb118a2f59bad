//! # Marketplace Projection
//!
//! Experience, listing and purchase records from raw objects and event
//! payloads. Missing numbers become 0 and missing text a fixed fallback;
//! only an object with no structured content is rejected.

use chrono::{DateTime, Utc};
use shared_types::{
    decode_optional, decode_optional_address, decode_optional_instant, decode_optional_string,
    decode_optional_u64, instant_from_millis, ExperienceEntity, LedgerEvent, LicenseType,
    ListingRecord, ObjectContent, PurchaseRecord, RawObject, RawValue,
};
use tracing::warn;

/// Skill shown when the ledger has none.
pub const UNKNOWN_SKILL: &str = "Unknown Skill";
/// Domain shown when the ledger has none.
pub const DEFAULT_DOMAIN: &str = "General";
/// Description shown when the ledger has none.
pub const DEFAULT_DESCRIPTION: &str = "No description provided";

/// Lowest and highest difficulty.
pub const DIFFICULTY_RANGE: (u8, u8) = (1, 5);

fn structured<'a>(object: &'a RawObject, kind: &str) -> Option<&'a ObjectContent> {
    match object.content.as_ref() {
        Some(content) if content.is_move_object() => Some(content),
        Some(content) => {
            warn!(
                "[ll-02] {} {} has data type {:?}, skipping",
                kind, object.object_id, content.data_type
            );
            None
        }
        None => {
            warn!("[ll-02] {} {} has no content, skipping", kind, object.object_id);
            None
        }
    }
}

fn text_or(value: &RawValue, fallback: &str) -> String {
    Some(decode_optional_string(value))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

fn number(value: &RawValue) -> u64 {
    decode_optional_u64(value).unwrap_or_default()
}

/// Aggregate rating, 0 when unrated.
pub fn average_rating(total: u64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

/// Project one experience object.
pub fn project_experience(object: &RawObject) -> Option<ExperienceEntity> {
    let content = structured(object, "Experience")?;
    let field = |name: &str| content.field(name);

    let (lo, hi) = DIFFICULTY_RANGE;
    let difficulty = u8::try_from(number(field("difficulty")).min(u64::from(hi)))
        .unwrap_or(hi)
        .max(lo);
    let rating_count = number(field("rating_count"));

    Some(ExperienceEntity {
        id: object.object_id.clone(),
        skill: text_or(field("skill"), UNKNOWN_SKILL),
        domain: text_or(field("domain"), DEFAULT_DOMAIN),
        difficulty,
        quality_score: number(field("quality_score")),
        price: number(field("price")),
        creator: decode_optional_string(field("creator")),
        rating: average_rating(number(field("total_rating")), rating_count),
        rating_count,
        sold_count: number(field("sold_count")),
        content_blob_id: decode_optional_address(field("content_blob_id"))
            .or_else(|| decode_optional_address(field("result_blob_id"))),
        access_policy_id: decode_optional_address(field("seal_policy_id")),
        time_spent: number(field("time_spent")),
        description: text_or(field("description"), DEFAULT_DESCRIPTION),
    })
}

/// Ids referenced by a listing event: `(listing, experience)`.
pub fn listing_event_ids(event: &LedgerEvent) -> Option<(String, Option<String>)> {
    let listing_id = decode_optional_address(event.parsed.get("listing_id"))?;
    let experience_id = decode_optional_address(event.parsed.get("experience_id"));
    Some((listing_id, experience_id))
}

/// Project a listing object together with its resolved experience.
///
/// Listing fields win over the event payload; the payload fills the gaps.
pub fn project_listing(
    listing: &RawObject,
    experience: ExperienceEntity,
    event: &LedgerEvent,
) -> Option<ListingRecord> {
    let content = structured(listing, "Listing")?;
    let pick = |name: &str| {
        let value = content.field(name);
        if is_present(value) {
            value
        } else {
            event.parsed.get(name)
        }
    };

    let license_code = decode_optional_u64(pick("license_type")).and_then(|c| u8::try_from(c).ok());
    let license_type = license_code.and_then(LicenseType::from_code);
    if license_type.is_none() {
        warn!(
            "[ll-02] Listing {} has license code {:?} outside the known set",
            listing.object_id, license_code
        );
    }

    Some(ListingRecord {
        listing_id: listing.object_id.clone(),
        seller: decode_optional_address(pick("seller")).unwrap_or_else(|| experience.creator.clone()),
        price: decode_optional_u64(pick("price")).unwrap_or(experience.price),
        license_type,
        copies_available: number(pick("copies_available")),
        active: pick("active").as_scalar().and_then(|s| s.as_bool()).unwrap_or(true),
        listed_at: event.timestamp_ms.and_then(instant_from_millis),
        experience,
    })
}

fn is_present(value: &RawValue) -> bool {
    decode_optional(value).is_present()
}

/// Project a purchase event together with its resolved experience.
pub fn project_purchase(event: &LedgerEvent, experience: ExperienceEntity) -> PurchaseRecord {
    let payload = &event.parsed;
    let purchased_at = decode_optional_instant(payload.get("timestamp"))
        .or_else(|| event.timestamp_ms.and_then(instant_from_millis))
        .unwrap_or_else(|| {
            warn!("[ll-02] Purchase in {} has no timestamp, using epoch", event.id.tx_digest);
            DateTime::<Utc>::default()
        });

    PurchaseRecord {
        purchase_id: decode_optional_address(payload.get("purchase_id"))
            .unwrap_or_else(|| event.id.tx_digest.clone()),
        buyer: decode_optional_string(payload.get("buyer")),
        seller: decode_optional_address(payload.get("seller"))
            .unwrap_or_else(|| experience.creator.clone()),
        price_paid: number(payload.get("price")),
        license_type: decode_optional_u64(payload.get("license_type"))
            .and_then(|c| u8::try_from(c).ok())
            .unwrap_or_default(),
        purchased_at,
        experience,
    }
}
