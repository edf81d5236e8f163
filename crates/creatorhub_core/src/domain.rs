//! crates/creatorhub_core/src/domain.rs
//!
//! Defines the core data structures for the application. These structs are
//! the persisted document shapes themselves: every collection is stored as a
//! JSON array of these records, camelCase on disk and on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A registered account. Missions and the current subscription snapshot are
/// embedded here rather than stored in their own collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub full_name: String,
    pub email: String,
    pub whatsapp_number: String,
    /// Argon2 hash. Stripped from every API response.
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_token_expiry: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_info: Option<YoutubeInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_plan: Option<CurrentPlan>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missions: Vec<Mission>,
}

/// Channel details attached to a user profile. Subscriber counts arrive from
/// clients as either bare numbers or formatted strings ("50,500"), so they
/// are kept loosely typed and parsed with [`subscriber_count`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YoutubeInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_url: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub current_subscribers: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub target_subscribers: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Active subscription window stamped onto a user when a recurring-plan
/// payment is confirmed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentPlan {
    pub plan_id: PlanRef,
    pub plan_name: String,
    pub plan_type: String,
    pub amount: f64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: String,
}

/// Growth goal created when a one-time-plan payment is confirmed. Target and
/// initial values are stored as strings, exactly as supplied by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub target_value: String,
    pub initial_value: String,
    pub plan_id: PlanRef,
    pub plan_name: String,
    pub completed: bool,
    /// Persisted as 0; the live value is derived per request from the user's
    /// current subscriber count.
    #[serde(default)]
    pub progress: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// A purchasable growth tier. Custom plans built by `POST /api/plans/custom`
/// use the same shape but are never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: u64,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_type: Option<String>,
    #[serde(default)]
    pub popular: bool,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customizations: Option<Vec<PlanCustomization>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_custom: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Plan {
    /// Billing type with the catalogue default applied.
    pub fn billing_type(&self) -> &str {
        self.plan_type.as_deref().unwrap_or("recurring")
    }
}

/// One line item of a custom plan request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanCustomization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub additional_price: f64,
}

/// A reference to either a catalogue plan id or an ephemeral plan tag such
/// as `"custom"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlanRef {
    Id(u64),
    Tag(String),
}

impl PlanRef {
    pub fn as_id(&self) -> Option<u64> {
        match self {
            PlanRef::Id(id) => Some(*id),
            PlanRef::Tag(_) => None,
        }
    }
}

/// Lifecycle of a deal, driven by admin status updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl DealStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(DealStatus::Pending),
            "in_progress" => Some(DealStatus::InProgress),
            "completed" => Some(DealStatus::Completed),
            "cancelled" => Some(DealStatus::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DealStatus::Pending => "pending",
            DealStatus::InProgress => "in_progress",
            DealStatus::Completed => "completed",
            DealStatus::Cancelled => "cancelled",
        }
    }

    /// Pending and in-progress deals count as open for dashboard purposes.
    pub fn is_open(&self) -> bool {
        matches!(self, DealStatus::Pending | DealStatus::InProgress)
    }
}

/// Settlement state tracked on a deal. Flips to `Paid` as a side effect of
/// the deal completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealPaymentStatus {
    Pending,
    Paid,
    Failed,
}

/// A purchase order for a growth plan. Plan name, price and description are
/// snapshotted at creation time and survive later catalogue edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: u64,
    pub user_id: u64,
    pub plan_id: u64,
    pub plan_name: String,
    pub plan_price: f64,
    pub plan_description: String,
    pub channel_info: ChannelInfo,
    pub status: DealStatus,
    pub payment_status: DealPaymentStatus,
    #[serde(default)]
    pub admin_notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Serialized even while null so the document shape is stable.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Channel details captured when a deal is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelInfo {
    pub channel_name: String,
    pub channel_url: String,
    pub current_subscribers: u64,
    pub utr_number: String,
    #[serde(default)]
    pub description: String,
}

/// A testimonial. Public submissions start unapproved; admin-seeded reviews
/// are approved immediately and flagged `isFake`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub rating: u8,
    pub comment: String,
    pub subscribers: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub approved: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_fake: bool,
    #[serde(default)]
    pub likes: u64,
    pub created_at: DateTime<Utc>,
}

/// A showcased channel. Read-only catalogue data, no mutation routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscribers: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub promoted: bool,
    #[serde(default = "default_true")]
    pub active: bool,
}

/// Settlement state of a payment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

/// A simulated payment intent. Confirming one is the sole trigger that
/// provisions either a mission (one-time plans) or a subscription window
/// (recurring plans) on the owning user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub user_id: u64,
    pub plan_id: PlanRef,
    pub plan_name: String,
    pub plan_type: String,
    pub amount: f64,
    pub currency: String,
    pub status: PaymentStatus,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub youtube_info: Option<YoutubeInfo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

/// Next id for an integer-keyed collection: one past the current maximum, so
/// ids stay unique even after deletions.
pub fn next_id<T>(items: &[T], id_of: impl Fn(&T) -> u64) -> u64 {
    items.iter().map(id_of).max().unwrap_or(0) + 1
}

/// Lenient subscriber-count parsing: every non-digit character is stripped,
/// so "50,500" yields 50500. Strings without digits count as zero.
pub fn parse_subscriber_count(raw: &str) -> u64 {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// The same parsing for loosely-typed JSON values, since clients send both
/// bare numbers and formatted strings.
pub fn subscriber_count(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().map(|f| f.max(0.0) as u64))
            .unwrap_or(0),
        Value::String(s) => parse_subscriber_count(s),
        _ => 0,
    }
}

/// Derived completion percentage for a mission, clamped into 0..=100 and
/// rounded. A target equal to the initial value would divide by zero; the
/// denominator falls back to 1 in that case, which degenerates the result to
/// 0 or 100 rather than erroring.
pub fn mission_progress(current: u64, initial: u64, target: u64) -> u64 {
    let span = if target == initial {
        1.0
    } else {
        target as f64 - initial as f64
    };
    let pct = (current as f64 - initial as f64) / span * 100.0;
    pct.clamp(0.0, 100.0).round() as u64
}
