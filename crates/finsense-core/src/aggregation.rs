//! # Aggregation Helpers
//!
//! Per-category spending, budget status, goal progress, transaction search
//! and dashboard chart series. All functions are pure and take "today" as a
//! parameter where a calendar window is involved.
//!
//! ## Budget Status
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Budget "Food"  limit ₹5,000                                            │
//! │                                                                         │
//! │  This month's expenses in "Food": ₹3,200 + ₹2,100 = ₹5,300             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  spent       = ₹5,300                                                   │
//! │  percentUsed = min(5300 / 5000 × 100, 100) = 100                        │
//! │  overBy      = ₹300                                                     │
//! │  remaining   = ₹0                                                       │
//! │  isOverBudget = true   (spent > limit, strictly)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Goal Progress: Two Views
//! Display progress is clamped to 100%. The health score uses the unclamped
//! ratio, so an over-funded goal (₹150 of ₹100) counts as 1.5 there. Both
//! are exposed here as [`goal_progress_percent`] and [`goal_ratio`].

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Budget, Goal, GoalStatus, Transaction, TransactionType};

// =============================================================================
// Calendar Windows
// =============================================================================

/// True when `date` falls in the same calendar month and year as `today`.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use finsense_core::aggregation::is_same_month;
///
/// let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
/// let dec = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
/// let jan_last_year = NaiveDate::from_ymd_opt(2023, 1, 10).unwrap();
///
/// assert!(is_same_month(today, today));
/// assert!(!is_same_month(dec, today));
/// assert!(!is_same_month(jan_last_year, today));
/// ```
#[inline]
pub fn is_same_month(date: NaiveDate, today: NaiveDate) -> bool {
    date.year() == today.year() && date.month() == today.month()
}

/// Transactions dated in the calendar month of `today`, in input order.
pub fn month_transactions(transactions: &[Transaction], today: NaiveDate) -> Vec<&Transaction> {
    transactions
        .iter()
        .filter(|t| is_same_month(t.date, today))
        .collect()
}

// =============================================================================
// Totals & Category Spending
// =============================================================================

/// Income/expense totals over some set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TransactionTotals {
    pub income: Money,
    pub expenses: Money,
    /// income − expenses, may be negative.
    pub net: Money,
    pub count: usize,
}

impl TransactionTotals {
    /// Sums the given transactions by kind.
    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut totals = TransactionTotals::default();
        for txn in transactions {
            match txn.kind {
                TransactionType::Income => totals.income += txn.amount(),
                TransactionType::Expense => totals.expenses += txn.amount(),
            }
            totals.count += 1;
        }
        totals.net = totals.income - totals.expenses;
        totals
    }
}

/// Sum of expense amounts keyed by category.
///
/// Income transactions are ignored. Callers pick the window (usually
/// [`month_transactions`]).
pub fn category_spending<'a, I>(transactions: I) -> BTreeMap<String, Money>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut spending: BTreeMap<String, Money> = BTreeMap::new();
    for txn in transactions.into_iter().filter(|t| t.is_expense()) {
        *spending.entry(txn.category.clone()).or_default() += txn.amount();
    }
    spending
}

// =============================================================================
// Budget Status
// =============================================================================

/// Where one budget stands against this month's spending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    pub budget_id: String,
    pub category: String,
    pub color: String,
    pub limit: Money,
    pub spent: Money,
    /// `limit − spent`, floored at zero.
    pub remaining: Money,
    /// `spent − limit`, floored at zero.
    pub over_by: Money,
    /// Percentage of the limit used, clamped to [0, 100].
    pub percent_used: f64,
    pub is_over_budget: bool,
}

impl BudgetStatus {
    /// Evaluates `budget` against per-category spending.
    ///
    /// A category with no spending counts as zero.
    pub fn evaluate(budget: &Budget, spending: &BTreeMap<String, Money>) -> Self {
        let limit = budget.limit();
        let spent = spending.get(&budget.category).copied().unwrap_or_default();

        let percent_used = match spent.ratio_of(limit) {
            Some(ratio) => (ratio * 100.0).clamp(0.0, 100.0),
            None if spent.is_positive() => 100.0,
            None => 0.0,
        };

        BudgetStatus {
            budget_id: budget.id.clone(),
            category: budget.category.clone(),
            color: budget.color.clone(),
            limit,
            spent,
            remaining: (limit - spent).max(Money::zero()),
            over_by: (spent - limit).max(Money::zero()),
            percent_used,
            is_over_budget: spent > limit,
        }
    }

    /// Spending is within the limit (equality counts as adhered).
    #[inline]
    pub fn is_adhered(&self) -> bool {
        !self.is_over_budget
    }
}

/// Budget page totals for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BudgetOverview {
    pub statuses: Vec<BudgetStatus>,
    /// Sum of all limits.
    pub total_budget: Money,
    /// Sum of spending in budgeted categories only.
    pub total_spent: Money,
    pub over_budget_count: usize,
}

impl BudgetOverview {
    /// Builds the overview for the calendar month of `today`.
    pub fn build(budgets: &[Budget], transactions: &[Transaction], today: NaiveDate) -> Self {
        let spending = category_spending(month_transactions(transactions, today));
        let statuses: Vec<BudgetStatus> = budgets
            .iter()
            .map(|b| BudgetStatus::evaluate(b, &spending))
            .collect();

        BudgetOverview {
            total_budget: statuses.iter().map(|s| s.limit).sum(),
            total_spent: statuses.iter().map(|s| s.spent).sum(),
            over_budget_count: statuses.iter().filter(|s| s.is_over_budget).count(),
            statuses,
        }
    }
}

// =============================================================================
// Goal Progress
// =============================================================================

/// Unclamped `current / target`. Used by the health score.
///
/// A non-positive target cannot pass validation; it yields 0.0 here rather
/// than infinity.
pub fn goal_ratio(goal: &Goal) -> f64 {
    if goal.target_cents <= 0 {
        return 0.0;
    }
    goal.current().ratio_of(goal.target()).unwrap_or(0.0)
}

/// Progress percentage for display, clamped to [0, 100].
///
/// ₹150 saved of a ₹100 target shows as 100% here and 1.5 in [`goal_ratio`].
pub fn goal_progress_percent(goal: &Goal) -> f64 {
    (goal_ratio(goal) * 100.0).clamp(0.0, 100.0)
}

/// Goals page totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct GoalOverview {
    pub active_count: usize,
    pub completed_count: usize,
    /// Sum of targets over active goals.
    pub total_target: Money,
    /// Sum of saved amounts over active goals.
    pub total_saved: Money,
}

impl GoalOverview {
    pub fn build(goals: &[Goal]) -> Self {
        let mut overview = GoalOverview::default();
        for goal in goals {
            match goal.status {
                GoalStatus::Active => {
                    overview.active_count += 1;
                    overview.total_target += goal.target();
                    overview.total_saved += goal.current();
                }
                GoalStatus::Completed => overview.completed_count += 1,
                GoalStatus::Cancelled => {}
            }
        }
        overview
    }
}

// =============================================================================
// Transaction Search
// =============================================================================

/// Search box plus type toggle on the transactions page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionFilter {
    /// Case-insensitive substring matched against category or description.
    #[serde(default)]
    pub query: Option<String>,
    /// `None` means all types.
    #[serde(default)]
    pub kind: Option<TransactionType>,
}

impl TransactionFilter {
    pub fn matches(&self, txn: &Transaction) -> bool {
        if let Some(kind) = self.kind {
            if txn.kind != kind {
                return false;
            }
        }

        let query = match self.query.as_deref().map(str::trim) {
            None | Some("") => return true,
            Some(q) => q.to_lowercase(),
        };

        txn.category.to_lowercase().contains(&query)
            || txn
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&query))
    }

    /// Matching transactions in input order.
    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        transactions.iter().filter(|t| self.matches(t)).collect()
    }
}

// =============================================================================
// Dashboard Series
// =============================================================================

/// One day of the income/expense chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub income: Money,
    pub expenses: Money,
}

/// Income and expenses per day for the `days` calendar days ending `today`,
/// oldest first. Days without transactions are present with zeros.
///
/// Days before the earliest representable date are left out, so the series
/// is shorter only at the very start of the calendar.
pub fn daily_series(transactions: &[Transaction], today: NaiveDate, days: u32) -> Vec<DailyPoint> {
    (0..u64::from(days))
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
        .map(|date| {
            let totals =
                TransactionTotals::from_transactions(transactions.iter().filter(|t| t.date == date));
            DailyPoint {
                date,
                income: totals.income,
                expenses: totals.expenses,
            }
        })
        .collect()
}

/// A category with its spending total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAmount {
    pub category: String,
    pub amount: Money,
}

/// The `n` largest expense categories across all given transactions.
///
/// Sorted by amount, largest first; ties keep alphabetical order.
pub fn top_expense_categories(transactions: &[Transaction], n: usize) -> Vec<CategoryAmount> {
    let mut ranked: Vec<CategoryAmount> = category_spending(transactions)
        .into_iter()
        .map(|(category, amount)| CategoryAmount { category, amount })
        .collect();
    ranked.sort_by(|a, b| b.amount.cmp(&a.amount));
    ranked.truncate(n);
    ranked
}

// =============================================================================
// Unit Tests
// =============================================================================
