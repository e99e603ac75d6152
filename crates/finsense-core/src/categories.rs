//! # Categories
//!
//! Fixed category lists offered by the frontend and the colour palette used
//! for budgets, goals and chart slices.
//!
//! Categories are free text in storage; these lists are suggestions, not an
//! enum. A budget in "Subscriptions" still adheres against expenses recorded
//! under exactly that string.

use serde::Serialize;
use ts_rs::TS;

/// Income categories offered when recording an income transaction.
pub const INCOME_CATEGORIES: &[&str] = &["Salary", "Freelance", "Investments", "Gifts", "Other Income"];

/// Expense categories offered when recording an expense transaction.
pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Food",
    "Transport",
    "Entertainment",
    "Shopping",
    "Bills",
    "Healthcare",
    "Education",
    "Other",
];

/// Categories a budget can be created for.
pub const BUDGET_CATEGORIES: &[&str] = &[
    "Food",
    "Transport",
    "Entertainment",
    "Shopping",
    "Bills",
    "Healthcare",
    "Education",
    "Subscriptions",
    "Utilities",
    "Other",
];

/// Colour palette (hex) for budgets, goals and charts.
pub const PALETTE: &[&str] = &[
    "#14b8a6", "#6366f1", "#f59e0b", "#ef4444", "#8b5cf6", "#10b981", "#3b82f6", "#ec4899",
    "#84cc16", "#06b6d4",
];

/// Default colour for the n-th budget or goal a user creates.
///
/// ## Example
/// ```rust
/// use finsense_core::categories::{color_for_index, PALETTE};
///
/// assert_eq!(color_for_index(0), PALETTE[0]);
/// assert_eq!(color_for_index(PALETTE.len()), PALETTE[0]);
/// ```
pub fn color_for_index(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Everything the frontend needs to render category pickers.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCatalog {
    pub income: Vec<String>,
    pub expense: Vec<String>,
    pub budget: Vec<String>,
    pub palette: Vec<String>,
}

impl CategoryCatalog {
    /// Builds the catalog from the built-in lists.
    pub fn builtin() -> Self {
        let owned = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        CategoryCatalog {
            income: owned(INCOME_CATEGORIES),
            expense: owned(EXPENSE_CATEGORIES),
            budget: owned(BUDGET_CATEGORIES),
            palette: owned(PALETTE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_wraps() {
        assert_eq!(color_for_index(3), "#ef4444");
        assert_eq!(color_for_index(13), "#ef4444");
    }

    #[test]
    fn test_catalog_contents() {
        let catalog = CategoryCatalog::builtin();
        assert_eq!(catalog.budget.len(), 10);
        assert!(catalog.budget.contains(&"Subscriptions".to_string()));
        assert!(!catalog.expense.contains(&"Subscriptions".to_string()));
        assert_eq!(catalog.income.last().map(String::as_str), Some("Other Income"));
    }
}
