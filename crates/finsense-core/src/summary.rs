//! # Financial Summary & Health Score
//!
//! Derives the current month's totals and a 0-100 health score from the
//! user's transactions, budgets and goals.
//!
//! ## Score Composition
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Health Score (0 - 100)                              │
//! │                                                                         │
//! │  Base ............................................................ 50   │
//! │                                                                         │
//! │  + Savings      min(savings / income × 100, 25)     only if income > 0  │
//! │                 (no lower cap: overspending pulls the score down)       │
//! │                                                                         │
//! │  + Budgets      adhered / total × 25                only if budgets     │
//! │                 adhered ⇔ month spend in category ≤ limit               │
//! │                                                                         │
//! │  + Goals        mean(current / target) × 10         only if active      │
//! │                 (unclamped: over-funded goals count above 1.0)          │
//! │                                                                         │
//! │  = round half up, then clamp to [0, 100]                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The calculation is synchronous and pure. "Today" is a parameter, never
//! read from the clock, so the month boundary is deterministic.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::aggregation::{category_spending, goal_ratio, month_transactions, BudgetStatus, TransactionTotals};
use crate::money::Money;
use crate::types::{Budget, Goal, Profile, Transaction};

/// Starting score before any adjustment.
pub const BASE_SCORE: f64 = 50.0;

/// Most the savings term can add.
pub const MAX_SAVINGS_POINTS: f64 = 25.0;

/// Points for adhering to every budget.
pub const BUDGET_POINTS: f64 = 25.0;

/// Multiplier on the mean goal ratio.
pub const GOAL_POINTS: f64 = 10.0;

// =============================================================================
// Financial Summary
// =============================================================================

/// The derived snapshot for one user and one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_income: Money,
    pub total_expenses: Money,
    /// `total_income − total_expenses`, negative when overspending.
    pub total_savings: Money,
    /// Integer in [0, 100].
    pub health_score: u32,
    pub active_goal_count: usize,
    /// Category of every budget, in input order.
    pub budget_categories: Vec<String>,
    /// Declared income from the profile, zero without one.
    pub monthly_income: Money,
    /// This month's transactions, in input order.
    pub month_transactions: Vec<Transaction>,
}

/// The three adjustments applied to [`BASE_SCORE`], before rounding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub savings: f64,
    pub budgets: f64,
    pub goals: f64,
}

impl ScoreBreakdown {
    /// Raw score before rounding and clamping.
    pub fn raw(&self) -> f64 {
        BASE_SCORE + self.savings + self.budgets + self.goals
    }

    /// Final integer score: round half up, then clamp to [0, 100].
    ///
    /// ## Example
    /// ```rust
    /// use finsense_core::summary::ScoreBreakdown;
    ///
    /// let b = ScoreBreakdown { savings: 12.5, budgets: 0.0, goals: 0.0 };
    /// assert_eq!(b.score(), 63); // 62.5 rounds up
    ///
    /// let deep_debt = ScoreBreakdown { savings: -400.0, budgets: 0.0, goals: 0.0 };
    /// assert_eq!(deep_debt.score(), 0);
    /// ```
    pub fn score(&self) -> u32 {
        let rounded = (self.raw() + 0.5).floor();
        rounded.clamp(0.0, 100.0) as u32
    }
}

/// Computes the summary for the calendar month containing `today`.
///
/// ## Arguments
/// * `transactions` - all of the user's transactions (any dates)
/// * `budgets` - all of the user's budgets
/// * `goals` - all of the user's goals (any status)
/// * `profile` - the user's profile, if one exists
/// * `today` - the reference date that picks the month
///
/// Empty inputs produce a score of exactly 50. Calling this twice with the
/// same inputs gives identical results.
pub fn compute_summary(
    transactions: &[Transaction],
    budgets: &[Budget],
    goals: &[Goal],
    profile: Option<&Profile>,
    today: NaiveDate,
) -> FinancialSummary {
    compute_summary_with_breakdown(transactions, budgets, goals, profile, today).0
}

/// [`compute_summary`] together with the terms its score was built from.
///
/// `summary.health_score == breakdown.score()` always holds.
pub fn compute_summary_with_breakdown(
    transactions: &[Transaction],
    budgets: &[Budget],
    goals: &[Goal],
    profile: Option<&Profile>,
    today: NaiveDate,
) -> (FinancialSummary, ScoreBreakdown) {
    let month = month_transactions(transactions, today);
    let totals = TransactionTotals::from_transactions(month.iter().copied());
    let breakdown = score_breakdown(&month, budgets, goals, &totals);

    let summary = FinancialSummary {
        total_income: totals.income,
        total_expenses: totals.expenses,
        total_savings: totals.net,
        health_score: breakdown.score(),
        active_goal_count: goals.iter().filter(|g| g.is_active()).count(),
        budget_categories: budgets.iter().map(|b| b.category.clone()).collect(),
        monthly_income: profile.map(Profile::monthly_income).unwrap_or_default(),
        month_transactions: month.into_iter().cloned().collect(),
    };
    (summary, breakdown)
}

/// Computes the individual score terms for already month-filtered data.
pub fn score_breakdown(
    month: &[&Transaction],
    budgets: &[Budget],
    goals: &[Goal],
    totals: &TransactionTotals,
) -> ScoreBreakdown {
    let savings = if totals.income.is_positive() {
        totals
            .net
            .ratio_of(totals.income)
            .map(|r| (r * 100.0).min(MAX_SAVINGS_POINTS))
            .unwrap_or(0.0)
    } else {
        0.0
    };

    let budgets_term = if budgets.is_empty() {
        0.0
    } else {
        let spending = category_spending(month.iter().copied());
        let adhered = budgets
            .iter()
            .filter(|b| BudgetStatus::evaluate(b, &spending).is_adhered())
            .count();
        adhered as f64 / budgets.len() as f64 * BUDGET_POINTS
    };

    let active: Vec<&Goal> = goals.iter().filter(|g| g.is_active()).collect();
    let goals_term = if active.is_empty() {
        0.0
    } else {
        let mean = active.iter().map(|g| goal_ratio(g)).sum::<f64>() / active.len() as f64;
        mean * GOAL_POINTS
    };

    ScoreBreakdown {
        savings,
        budgets: budgets_term,
        goals: goals_term,
    }
}

// =============================================================================
// Health Label
// =============================================================================

/// Coarse label shown next to the score on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum HealthLabel {
    Excellent,
    Good,
    Fair,
    NeedsWork,
}

impl HealthLabel {
    /// ≥80 Excellent, ≥60 Good, ≥40 Fair, otherwise Needs Work.
    pub fn from_score(score: u32) -> Self {
        if score >= 80 {
            HealthLabel::Excellent
        } else if score >= 60 {
            HealthLabel::Good
        } else if score >= 40 {
            HealthLabel::Fair
        } else {
            HealthLabel::NeedsWork
        }
    }
}

impl fmt::Display for HealthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            HealthLabel::Excellent => "Excellent",
            HealthLabel::Good => "Good",
            HealthLabel::Fair => "Fair",
            HealthLabel::NeedsWork => "Needs Work",
        };
        f.write_str(text)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BudgetPeriod, GoalStatus, TransactionType};
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn txn(kind: TransactionType, cents: i64, category: &str, on: NaiveDate) -> Transaction {
        Transaction {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: "u1".to_string(),
            kind,
            amount_cents: cents,
            category: category.to_string(),
            description: None,
            date: on,
            created_at: Utc::now(),
        }
    }

    fn income(cents: i64, on: NaiveDate) -> Transaction {
        txn(TransactionType::Income, cents, "Salary", on)
    }

    fn expense(cents: i64, category: &str, on: NaiveDate) -> Transaction {
        txn(TransactionType::Expense, cents, category, on)
    }

    fn budget(category: &str, limit: i64) -> Budget {
        Budget {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: "u1".to_string(),
            category: category.to_string(),
            limit_cents: limit,
            period: BudgetPeriod::Monthly,
            color: "#14b8a6".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn goal(current: i64, target: i64, status: GoalStatus) -> Goal {
        Goal {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: "u1".to_string(),
            title: "Goal".to_string(),
            target_cents: target,
            current_cents: current,
            deadline: None,
            status,
            color: "#6366f1".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn profile(monthly_income: i64) -> Profile {
        Profile {
            id: "p1".to_string(),
            user_id: "u1".to_string(),
            full_name: None,
            avatar_url: None,
            currency: "INR".to_string(),
            monthly_income_cents: monthly_income,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_inputs_score_fifty() {
        let summary = compute_summary(&[], &[], &[], None, date(2024, 3, 15));
        assert_eq!(summary.health_score, 50);
        assert_eq!(summary.total_income, Money::zero());
        assert_eq!(summary.total_savings, Money::zero());
        assert_eq!(summary.monthly_income, Money::zero());
        assert!(summary.month_transactions.is_empty());
    }

    #[test]
    fn test_worked_example() {
        // income 1000, expenses 600, Food budget 500 with 450 spent,
        // one active goal 50 of 200
        let today = date(2024, 3, 15);
        let txns = vec![
            income(100_000, date(2024, 3, 1)),
            expense(45_000, "Food", date(2024, 3, 5)),
            expense(15_000, "Bills", date(2024, 3, 6)),
        ];
        let budgets = vec![budget("Food", 50_000)];
        let goals = vec![goal(5_000, 20_000, GoalStatus::Active)];

        let summary = compute_summary(&txns, &budgets, &goals, None, today);
        assert_eq!(summary.total_income, Money::from_cents(100_000));
        assert_eq!(summary.total_expenses, Money::from_cents(60_000));
        assert_eq!(summary.total_savings, Money::from_cents(40_000));
        // 50 + 25 + 25 + 2.5 = 102.5 → 103 → 100
        assert_eq!(summary.health_score, 100);
        assert_eq!(summary.active_goal_count, 1);
        assert_eq!(summary.budget_categories, vec!["Food".to_string()]);
    }

    #[test]
    fn test_breakdown_matches_score() {
        let today = date(2024, 3, 15);
        let txns = vec![
            income(100_000, date(2024, 3, 1)),
            expense(45_000, "Food", date(2024, 3, 5)),
            expense(70_000, "Rent", date(2024, 2, 28)),
        ];
        let budgets = vec![budget("Food", 40_000), budget("Bills", 10_000)];
        let goals = vec![goal(5_000, 20_000, GoalStatus::Active)];

        let (summary, breakdown) =
            compute_summary_with_breakdown(&txns, &budgets, &goals, None, today);
        // February rent is outside the month: savings 55% caps at 25
        assert_eq!(breakdown.savings, 25.0);
        assert_eq!(breakdown.budgets, 12.5);
        assert_eq!(breakdown.goals, 2.5);
        assert_eq!(summary.health_score, breakdown.score());
        assert_eq!(summary, compute_summary(&txns, &budgets, &goals, None, today));
    }

    #[test]
    fn test_savings_term_capped_at_25() {
        let today = date(2024, 3, 15);
        let txns = vec![income(100_000, date(2024, 3, 1))];
        let summary = compute_summary(&txns, &[], &[], None, today);
        assert_eq!(summary.health_score, 75);
    }

    #[test]
    fn test_negative_savings_lower_score() {
        // income 1000, expenses 1200: savings term -20
        let today = date(2024, 3, 15);
        let txns = vec![
            income(100_000, date(2024, 3, 1)),
            expense(120_000, "Rent", date(2024, 3, 2)),
        ];
        let summary = compute_summary(&txns, &[], &[], None, today);
        assert_eq!(summary.total_savings, Money::from_cents(-20_000));
        assert_eq!(summary.health_score, 30);
    }

    #[test]
    fn test_score_floored_at_zero() {
        // income 100, expenses 1000: savings term -900
        let today = date(2024, 3, 15);
        let txns = vec![
            income(10_000, date(2024, 3, 1)),
            expense(100_000, "Rent", date(2024, 3, 2)),
        ];
        let summary = compute_summary(&txns, &[], &[], None, today);
        assert_eq!(summary.health_score, 0);
    }

    #[test]
    fn test_expenses_without_income_keep_base() {
        let today = date(2024, 3, 15);
        let txns = vec![expense(10_000, "Food", date(2024, 3, 2))];
        let summary = compute_summary(&txns, &[], &[], None, today);
        assert_eq!(summary.health_score, 50);
        assert_eq!(summary.total_savings, Money::from_cents(-10_000));
    }

    #[test]
    fn test_no_budgets_vs_all_adhered() {
        let today = date(2024, 3, 15);
        let none = compute_summary(&[], &[], &[], None, today);
        let all_adhered = compute_summary(&[], &[budget("Food", 1_000)], &[], None, today);
        assert_eq!(none.health_score, 50);
        assert_eq!(all_adhered.health_score, 75);
    }

    #[test]
    fn test_partial_budget_adherence() {
        let today = date(2024, 3, 15);
        let txns = vec![expense(2_000, "Food", date(2024, 3, 3))];
        let budgets = vec![budget("Food", 1_000), budget("Bills", 1_000)];
        // one of two adhered: 12.5 → 62.5 → 63
        let summary = compute_summary(&txns, &budgets, &[], None, today);
        assert_eq!(summary.health_score, 63);
    }

    #[test]
    fn test_over_funded_goal_uses_unclamped_ratio() {
        let today = date(2024, 3, 15);
        let goals = vec![goal(30_000, 10_000, GoalStatus::Active)];
        // ratio 3.0 → 30 points
        let summary = compute_summary(&[], &[], &goals, None, today);
        assert_eq!(summary.health_score, 80);
    }

    #[test]
    fn test_inactive_goals_ignored() {
        let today = date(2024, 3, 15);
        let goals = vec![
            goal(10_000, 10_000, GoalStatus::Completed),
            goal(0, 10_000, GoalStatus::Cancelled),
        ];
        let summary = compute_summary(&[], &[], &goals, None, today);
        assert_eq!(summary.health_score, 50);
        assert_eq!(summary.active_goal_count, 0);
    }

    #[test]
    fn test_month_rollover_boundary() {
        // Dec 31 expense is not in January's totals
        let txns = vec![
            expense(5_000, "Food", date(2023, 12, 31)),
            income(1_000, date(2024, 1, 1)),
        ];
        let jan = compute_summary(&txns, &[], &[], None, date(2024, 1, 1));
        assert_eq!(jan.total_expenses, Money::zero());
        assert_eq!(jan.total_income, Money::from_cents(1_000));
        assert_eq!(jan.month_transactions.len(), 1);

        let dec = compute_summary(&txns, &[], &[], None, date(2023, 12, 31));
        assert_eq!(dec.total_expenses, Money::from_cents(5_000));
        assert_eq!(dec.total_income, Money::zero());
    }

    #[test]
    fn test_budget_spend_outside_month_ignored() {
        let txns = vec![expense(99_999, "Food", date(2024, 2, 29))];
        let summary = compute_summary(&txns, &[budget("Food", 100)], &[], None, date(2024, 3, 1));
        assert_eq!(summary.health_score, 75);
    }

    #[test]
    fn test_monthly_income_from_profile() {
        let p = profile(5_000_000);
        let summary = compute_summary(&[], &[], &[], Some(&p), date(2024, 3, 1));
        assert_eq!(summary.monthly_income, Money::from_cents(5_000_000));
        // declared income does not feed the score
        assert_eq!(summary.health_score, 50);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let today = date(2024, 3, 15);
        let txns = vec![
            income(70_000, date(2024, 3, 1)),
            expense(33_333, "Food", date(2024, 3, 2)),
        ];
        let budgets = vec![budget("Food", 30_000)];
        let goals = vec![goal(1, 3, GoalStatus::Active)];
        let a = compute_summary(&txns, &budgets, &goals, None, today);
        let b = compute_summary(&txns, &budgets, &goals, None, today);
        assert_eq!(a, b);
    }

    #[test]
    fn test_health_labels() {
        assert_eq!(HealthLabel::from_score(100), HealthLabel::Excellent);
        assert_eq!(HealthLabel::from_score(80), HealthLabel::Excellent);
        assert_eq!(HealthLabel::from_score(79), HealthLabel::Good);
        assert_eq!(HealthLabel::from_score(40), HealthLabel::Fair);
        assert_eq!(HealthLabel::from_score(39), HealthLabel::NeedsWork);
        assert_eq!(HealthLabel::NeedsWork.to_string(), "Needs Work");
    }
}
