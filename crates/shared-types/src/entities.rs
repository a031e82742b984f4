//! # Domain Entities
//!
//! Core data structures for the points ledger and its workflows.
//!
//! ## Type Decisions
//!
//! - `points: u64` - A negative balance is structurally impossible; debits
//!   that would underflow are rejected before any mutation.
//! - `amount: f64` for oil volume - deposits are fractional liters
//!   (0.5 L steps in practice); points are always derived integers.
//! - Serialization is camelCase with lowercase status strings so the JSON
//!   collections on disk keep the shape existing deployments already have.

use serde::{Deserialize, Serialize};

/// Stable user identifier.
pub type UserId = u64;

/// Caller roles handed over by the external auth layer after token
/// verification. The workflow layer only performs authorization checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Moderator,
    Admin,
}

impl Role {
    /// Moderators and admins may verify deposits and settle redemptions.
    #[must_use]
    pub fn is_staff(self) -> bool {
        matches!(self, Self::Moderator | Self::Admin)
    }
}

/// Direction of a ledger entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Earn,
    Redeem,
}

/// Immutable record of a single point credit or debit.
///
/// Entries are created only as a side effect of a workflow transition and are
/// never edited or deleted independently of their owning user. The `id` is
/// the creation timestamp in unix milliseconds and doubles as ordering key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointHistoryEntry {
    pub id: u64,
    /// Calendar date of the entry, `YYYY-MM-DD`.
    pub date: String,
    pub description: String,
    /// Positive magnitude; the direction lives in `kind`.
    pub amount: u64,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

/// Identity plus mutable wallet.
///
/// `points` is a derived, auditable value: it always equals the initial
/// balance plus earn entries minus redeem entries. Only the ledger engine
/// mutates `points` and `point_history`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub name: String,
    pub email: String,
    pub points: u64,
    /// Cumulative confirmed deposit volume in liters.
    #[serde(default)]
    pub total_deposited: f64,
    /// Estimated CO2 savings in kg, rounded per confirmed deposit.
    #[serde(default)]
    pub co2_saved: u64,
    /// Ledger entries, newest first.
    #[serde(default)]
    pub point_history: Vec<PointHistoryEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_date: Option<String>,
    pub role: Role,
}

/// Deposit lifecycle. `Confirmed` and `Rejected` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepositStatus {
    Pending,
    Confirmed,
    Rejected,
}

impl DepositStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
        }
    }
}

/// How the oil reaches the platform, with the fields each method requires.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum DepositMethod {
    /// Pickup by courier at the user's address.
    #[serde(rename_all = "camelCase")]
    Courier {
        address: String,
        contact: String,
        pickup_date: String,
    },
    /// Drop-off at a staffed collection point.
    DropPoint { location: String },
}

/// A claim that a user dropped off a volume of oil, awaiting verification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositRequest {
    pub id: u64,
    pub user_id: UserId,
    /// Volume in liters.
    pub amount: f64,
    /// Points awarded on confirmation; fixed at creation time.
    pub points: u64,
    #[serde(flatten)]
    pub method: DepositMethod,
    pub status: DepositStatus,
    /// Creation time, RFC 3339.
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Redemption lifecycle. `Completed` and `Cancelled` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedemptionStatus {
    Pending,
    Completed,
    Cancelled,
}

impl RedemptionStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// One line of a redemption: the product reference plus the unit points the
/// user was charged for it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionItem {
    pub product_id: u64,
    pub name: String,
    /// Points per unit, charged up front.
    pub points: u64,
    pub quantity: u32,
}

/// A code-bearing record of points spent on goods, awaiting pickup.
///
/// The voucher code (`JB-XXXXXX`) is the transaction id; it is handed to the
/// user immediately as proof that points were exchanged for a reservation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionTransaction {
    /// Voucher code, unique across all transactions.
    pub id: String,
    pub user_id: UserId,
    pub items: Vec<RedemptionItem>,
    /// Total charged at creation.
    pub total_points: u64,
    pub status: RedemptionStatus,
    /// Creation time, RFC 3339.
    pub date: String,
    /// Settlement time (completion or cancellation), RFC 3339.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<String>,
}

/// Catalog entry users redeem points against.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub points: u64,
    pub category: String,
    pub stock: u32,
}

/// Open/closed state of a drop point. Serialized in the operator-facing
/// Indonesian form the collection files already use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropPointStatus {
    #[serde(rename = "Buka")]
    Open,
    #[serde(rename = "Tutup")]
    Closed,
}

/// A staffed oil collection point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DropPoint {
    pub id: u64,
    pub name: String,
    pub address: String,
    pub status: DropPointStatus,
    pub hours: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
}

/// Derived leaderboard row. Never persisted as a source of truth; recomputed
/// from the user set on every read.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: UserId,
    pub user_name: String,
    /// Mirrors the user's current balance.
    pub monthly_points: u64,
    pub category: String,
}

/// Operator-set leaderboard category. The only leaderboard state that is
/// persisted; it survives recomputation of ranks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOverride {
    pub user_id: UserId,
    pub category: String,
}
