//! # Domain Types
//!
//! Core domain types used throughout FinSense.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  Transaction    │   │     Budget      │   │      Goal       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  kind           │   │  category (uniq)│   │  title          │       │
//! │  │  amount_cents   │   │  limit_cents    │   │  target_cents   │       │
//! │  │  category, date │   │  period, color  │   │  current_cents  │       │
//! │  └─────────────────┘   └─────────────────┘   │  status         │       │
//! │                                              └─────────────────┘       │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │    Profile      │   │  ChatMessage    │   Every row is scoped by    │
//! │  │  ─────────────  │   │  ─────────────  │   user_id. Nothing crosses  │
//! │  │  currency       │   │  role           │   user boundaries.          │
//! │  │  monthly_income │   │  content        │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Entities serialize with camelCase keys and lowercase enum values, which is
//! what the web frontend consumes. Amounts are integer minor units.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Transaction
// =============================================================================

/// Whether a transaction adds to or takes from the user's money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    /// Lowercase name, as stored and sent over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single income or expense entry.
///
/// Immutable except for a full replace or delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owner of this transaction.
    pub user_id: String,

    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,

    /// Amount in minor units, never negative.
    pub amount_cents: i64,

    /// Free-text category ("Food", "Salary", ...).
    pub category: String,

    /// Optional note.
    pub description: Option<String>,

    /// Calendar date the money moved (no time of day).
    #[ts(as = "String")]
    pub date: NaiveDate,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Returns the amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }

    #[inline]
    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    #[inline]
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }
}

/// Input for creating (or fully replacing) a transaction.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount_cents: i64,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[ts(as = "String")]
    pub date: NaiveDate,
}

// =============================================================================
// Budget
// =============================================================================

/// Budget period. Stored for display; adherence is always measured against
/// the current calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

/// A spending limit for one category. At most one per (user, category).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub user_id: String,
    pub category: String,

    /// Limit in minor units, always positive.
    pub limit_cents: i64,

    pub period: BudgetPeriod,

    /// Hex colour ("#14b8a6").
    pub color: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    /// Returns the limit as Money.
    #[inline]
    pub fn limit(&self) -> Money {
        Money::from_cents(self.limit_cents)
    }
}

/// Input for creating a budget.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    pub category: String,
    pub limit_cents: i64,
    #[serde(default)]
    pub period: BudgetPeriod,
    /// Defaults to the next palette colour when absent.
    #[serde(default)]
    pub color: Option<String>,
}

/// Changes to an existing budget. Absent fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUpdate {
    #[serde(default)]
    pub limit_cents: Option<i64>,
    #[serde(default)]
    pub period: Option<BudgetPeriod>,
    #[serde(default)]
    pub color: Option<String>,
}

// =============================================================================
// Goal
// =============================================================================

/// Lifecycle of a savings goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

impl GoalStatus {
    /// Status a goal should have after its saved amount changes.
    ///
    /// Reaching the target completes the goal; dropping back below it
    /// reopens a completed goal.
    ///
    /// ## Example
    /// ```rust
    /// use finsense_core::GoalStatus;
    ///
    /// assert_eq!(GoalStatus::for_progress(10_000, 10_000), GoalStatus::Completed);
    /// assert_eq!(GoalStatus::for_progress(9_999, 10_000), GoalStatus::Active);
    /// ```
    pub fn for_progress(current_cents: i64, target_cents: i64) -> GoalStatus {
        if current_cents >= target_cents {
            GoalStatus::Completed
        } else {
            GoalStatus::Active
        }
    }
}

/// A savings goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub title: String,

    /// Target in minor units, always positive.
    pub target_cents: i64,

    /// Saved so far. May exceed the target.
    pub current_cents: i64,

    #[ts(as = "Option<String>")]
    pub deadline: Option<NaiveDate>,

    pub status: GoalStatus,
    pub color: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    #[inline]
    pub fn target(&self) -> Money {
        Money::from_cents(self.target_cents)
    }

    #[inline]
    pub fn current(&self) -> Money {
        Money::from_cents(self.current_cents)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == GoalStatus::Active
    }
}

/// Input for creating a goal. New goals always start Active.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub title: String,
    pub target_cents: i64,
    #[serde(default)]
    pub current_cents: i64,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Changes to an existing goal. Absent fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct GoalUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub target_cents: Option<i64>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub status: Option<GoalStatus>,
}

// =============================================================================
// Profile
// =============================================================================

/// Per-user settings. Created implicitly the first time it is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub user_id: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,

    /// ISO currency code, "INR" unless the user changes it.
    pub currency: String,

    /// Declared monthly income in minor units. Informational only: the
    /// health score uses recorded income transactions.
    pub monthly_income_cents: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    #[inline]
    pub fn monthly_income(&self) -> Money {
        Money::from_cents(self.monthly_income_cents)
    }
}

/// Changes to a profile. Absent fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub monthly_income_cents: Option<i64>,
}

// =============================================================================
// Chat Messages
// =============================================================================

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    /// Only ever sent upstream, never stored.
    System,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
            ChatRole::System => "system",
        }
    }
}

/// A stored line of the coach transcript. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub user_id: String,
    pub role: ChatRole,
    pub content: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
