//! # Core Domain Entities
//!
//! Typed, application-level records projected out of raw ledger objects.
//! All of them are immutable value objects; none keeps a reference to the
//! raw object it came from.
//!
//! ## Clusters
//!
//! - **Tasks**: `TaskEntity`, `TaskStatus`, `RoleGrant`
//! - **Marketplace**: `ExperienceEntity`, `PurchaseRecord`, `ListingRecord`, `LicenseType`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::object::ObjectId;

/// Account address (`0x`-prefixed hex).
pub type Address = String;

// =============================================================================
// CLUSTER A: TASKS
// =============================================================================

/// Lifecycle status of a task, from its raw numeric code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Code 0.
    Pending,
    /// Code 1.
    InProgress,
    /// Code 2 (terminal).
    Completed,
    /// Code 3 (terminal).
    Approved,
    /// Any other code.
    Unknown(u64),
}

impl TaskStatus {
    /// Map a raw status code.
    pub fn from_code(code: u64) -> Self {
        match code {
            0 => TaskStatus::Pending,
            1 => TaskStatus::InProgress,
            2 => TaskStatus::Completed,
            3 => TaskStatus::Approved,
            other => TaskStatus::Unknown(other),
        }
    }

    /// Raw status code.
    pub fn code(self) -> u64 {
        match self {
            TaskStatus::Pending => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Completed => 2,
            TaskStatus::Approved => 3,
            TaskStatus::Unknown(code) => code,
        }
    }

    /// Completed or approved.
    pub fn is_completed(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Approved)
    }
}

/// A task reconstructed from the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEntity {
    /// Task object id.
    pub id: ObjectId,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Creator address.
    pub creator: Address,
    /// Raw status.
    pub status: TaskStatus,
    /// Derived from `status`.
    pub is_completed: bool,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Due instant; creation + 7 days when the ledger has none.
    pub due_date: DateTime<Utc>,
    /// Priority code.
    pub priority: u8,
    /// Assignee, if any.
    pub assignee: Option<Address>,
    /// Role table id, if the task has one.
    pub access_control_table_id: Option<ObjectId>,
}

/// One row of a task's access-control table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleGrant {
    /// Grantee.
    pub address: Address,
    /// Permission code.
    pub role: u8,
}

// =============================================================================
// CLUSTER B: MARKETPLACE
// =============================================================================

/// A purchasable experience.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntity {
    /// Experience object id.
    pub id: ObjectId,
    /// Skill name.
    pub skill: String,
    /// Domain.
    pub domain: String,
    /// Difficulty, clamped to `1..=5`.
    pub difficulty: u8,
    /// Quality score.
    pub quality_score: u64,
    /// Price in the smallest denomination.
    pub price: u64,
    /// Creator (seller) address.
    pub creator: Address,
    /// `total_rating / rating_count`, or 0 when unrated.
    pub rating: f64,
    /// Number of ratings.
    pub rating_count: u64,
    /// Copies sold.
    pub sold_count: u64,
    /// Content blob id (content blob first, then result blob).
    pub content_blob_id: Option<String>,
    /// Access-policy object id.
    pub access_policy_id: Option<ObjectId>,
    /// Time spent producing the experience.
    pub time_spent: u64,
    /// Description.
    pub description: String,
}

/// An experience together with the purchase that granted access to it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    /// Purchased experience.
    #[serde(flatten)]
    pub experience: ExperienceEntity,
    /// Purchase (license) object id.
    pub purchase_id: ObjectId,
    /// Buyer.
    pub buyer: Address,
    /// Seller.
    pub seller: Address,
    /// Price actually paid.
    pub price_paid: u64,
    /// Wire-level license code.
    pub license_type: u8,
    /// Purchase instant.
    pub purchased_at: DateTime<Utc>,
}

/// A marketplace listing, resolved from an emitted listing event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    /// Listing object id.
    pub listing_id: ObjectId,
    /// Listed experience.
    pub experience: ExperienceEntity,
    /// Seller.
    pub seller: Address,
    /// Asking price.
    pub price: u64,
    /// License on offer; `None` for codes outside the known set.
    pub license_type: Option<LicenseType>,
    /// Copies still available.
    pub copies_available: u64,
    /// Whether the listing is still active.
    pub active: bool,
    /// Event emission instant.
    pub listed_at: Option<DateTime<Utc>>,
}

/// License types, with their wire-level codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseType {
    /// 0
    Personal,
    /// 1
    Commercial,
    /// 2
    Exclusive,
    /// 3
    Subscription,
    /// 4
    ViewOnly,
}

/// A license symbol outside the closed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown license type: {0}")]
pub struct UnknownLicenseType(pub String);

impl LicenseType {
    /// Every license type, in code order.
    pub const ALL: [LicenseType; 5] = [
        LicenseType::Personal,
        LicenseType::Commercial,
        LicenseType::Exclusive,
        LicenseType::Subscription,
        LicenseType::ViewOnly,
    ];

    /// Wire-level code.
    pub fn code(self) -> u8 {
        match self {
            LicenseType::Personal => 0,
            LicenseType::Commercial => 1,
            LicenseType::Exclusive => 2,
            LicenseType::Subscription => 3,
            LicenseType::ViewOnly => 4,
        }
    }

    /// Reverse of [`LicenseType::code`].
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.code() == code)
    }

    /// Symbol used by callers.
    pub fn symbol(self) -> &'static str {
        match self {
            LicenseType::Personal => "personal",
            LicenseType::Commercial => "commercial",
            LicenseType::Exclusive => "exclusive",
            LicenseType::Subscription => "subscription",
            LicenseType::ViewOnly => "view_only",
        }
    }
}

impl FromStr for LicenseType {
    type Err = UnknownLicenseType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.symbol() == s)
            .ok_or_else(|| UnknownLicenseType(s.to_string()))
    }
}

impl fmt::Display for LicenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
