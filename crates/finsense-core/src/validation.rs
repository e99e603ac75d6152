//! # Validation Module
//!
//! Input validation for FinSense entities.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  ├── Required fields, numeric inputs                                   │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: API handler (Rust)                                           │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: rules checked BEFORE any store call                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── UNIQUE (user_id, category) on budgets                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use finsense_core::validation::validate_progress_amount;
//!
//! assert!(validate_progress_amount(0).is_ok());
//! assert!(validate_progress_amount(-1).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{Budget, BudgetUpdate, GoalUpdate, NewBudget, NewGoal, NewTransaction, ProfileUpdate};
use crate::{MAX_CHAT_MESSAGE_LEN, MAX_REPLY_LEN, MAX_TEXT_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a required free-text field and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most `max` characters
pub fn validate_required_text(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Validates an optional free-text field. Blank text becomes `None`.
pub fn validate_optional_text(
    field: &str,
    value: Option<&str>,
    max: usize,
) -> ValidationResult<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) if text.chars().count() > max => Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        }),
        Some(text) => Ok(Some(text.to_string())),
    }
}

/// Validates an amount that may be zero but not negative.
pub fn validate_non_negative(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates an amount that must be strictly positive.
pub fn validate_positive(field: &str, cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a `#rrggbb` colour.
///
/// ## Example
/// ```rust
/// use finsense_core::validation::validate_color;
///
/// assert!(validate_color("#14b8a6").is_ok());
/// assert!(validate_color("teal").is_err());
/// ```
pub fn validate_color(color: &str) -> ValidationResult<()> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "color".to_string(),
            reason: "must be a hex colour like #14b8a6".to_string(),
        });
    }
    Ok(())
}

/// Validates an ISO 4217 style currency code ("INR", "USD").
pub fn validate_currency(code: &str) -> ValidationResult<()> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::InvalidFormat {
            field: "currency".to_string(),
            reason: "must be a three-letter uppercase code".to_string(),
        });
    }
    Ok(())
}

/// Validates a saved amount entered on a goal.
///
/// Zero is allowed (resetting a goal), negative amounts are not.
pub fn validate_progress_amount(cents: i64) -> ValidationResult<()> {
    validate_non_negative("amount", cents)
}

/// Validates a message typed to the coach and returns it trimmed.
pub fn validate_chat_message(text: &str) -> ValidationResult<String> {
    validate_required_text("message", text, MAX_CHAT_MESSAGE_LEN)
}

/// Checks an assistant reply before it is stored.
///
/// The reply is kept byte for byte: no trimming, and an empty reply (a stream
/// that ended without content) is accepted.
pub fn validate_reply(text: &str) -> ValidationResult<()> {
    if text.chars().count() > MAX_REPLY_LEN {
        return Err(ValidationError::TooLong {
            field: "reply".to_string(),
            max: MAX_REPLY_LEN,
        });
    }
    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates a transaction before insert or replace.
///
/// ## Rules
/// - Category is required
/// - Amount must not be negative
/// - Description is optional, at most [`MAX_TEXT_LEN`] characters
pub fn validate_new_transaction(input: &NewTransaction) -> ValidationResult<()> {
    validate_required_text("category", &input.category, MAX_TEXT_LEN)?;
    validate_non_negative("amount", input.amount_cents)?;
    validate_optional_text("description", input.description.as_deref(), MAX_TEXT_LEN)?;
    Ok(())
}

/// Validates a budget before insert.
///
/// ## Rules
/// - Category is required
/// - Limit must be positive
/// - No existing budget of this user may use the same category
///
/// ## User Workflow
/// ```text
/// Existing budgets: [Food, Bills]
///      │
///      ▼
/// Create budget "Food" ──► Duplicate { field: "budget category", value: "Food" }
/// Create budget "Rent" ──► Ok
/// ```
pub fn validate_new_budget(input: &NewBudget, existing: &[Budget]) -> ValidationResult<()> {
    let category = validate_required_text("category", &input.category, MAX_TEXT_LEN)?;
    validate_positive("limit", input.limit_cents)?;

    if let Some(color) = &input.color {
        validate_color(color)?;
    }

    if existing.iter().any(|b| b.category == category) {
        return Err(ValidationError::Duplicate {
            field: "budget category".to_string(),
            value: category,
        });
    }

    Ok(())
}

/// Validates changes to a budget.
pub fn validate_budget_update(update: &BudgetUpdate) -> ValidationResult<()> {
    if let Some(limit) = update.limit_cents {
        validate_positive("limit", limit)?;
    }
    if let Some(color) = &update.color {
        validate_color(color)?;
    }
    Ok(())
}

/// Validates a goal before insert.
///
/// ## Rules
/// - Title is required
/// - Target must be positive
/// - Starting amount must not be negative
pub fn validate_new_goal(input: &NewGoal) -> ValidationResult<()> {
    validate_required_text("title", &input.title, MAX_TEXT_LEN)?;
    validate_positive("target", input.target_cents)?;
    validate_non_negative("current amount", input.current_cents)?;
    if let Some(color) = &input.color {
        validate_color(color)?;
    }
    Ok(())
}

/// Validates changes to a goal.
pub fn validate_goal_update(update: &GoalUpdate) -> ValidationResult<()> {
    if let Some(title) = &update.title {
        validate_required_text("title", title, MAX_TEXT_LEN)?;
    }
    if let Some(target) = update.target_cents {
        validate_positive("target", target)?;
    }
    if let Some(color) = &update.color {
        validate_color(color)?;
    }
    Ok(())
}

/// Validates changes to a profile.
pub fn validate_profile_update(update: &ProfileUpdate) -> ValidationResult<()> {
    validate_optional_text("full name", update.full_name.as_deref(), MAX_TEXT_LEN)?;
    if let Some(currency) = &update.currency {
        validate_currency(currency)?;
    }
    if let Some(income) = update.monthly_income_cents {
        validate_non_negative("monthly income", income)?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BudgetPeriod, TransactionType};
    use chrono::{NaiveDate, Utc};

    fn budget(category: &str) -> Budget {
        Budget {
            id: "b1".to_string(),
            user_id: "u1".to_string(),
            category: category.to_string(),
            limit_cents: 10_000,
            period: BudgetPeriod::Monthly,
            color: "#14b8a6".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_required_text() {
        assert_eq!(validate_required_text("title", "  Trip  ", 50).unwrap(), "Trip");
        assert!(matches!(
            validate_required_text("title", "   ", 50),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_required_text("title", "abcdef", 5),
            Err(ValidationError::TooLong { max: 5, .. })
        ));
    }

    #[test]
    fn test_optional_text_blank_is_none() {
        assert_eq!(validate_optional_text("d", Some("  "), 10).unwrap(), None);
        assert_eq!(validate_optional_text("d", None, 10).unwrap(), None);
        assert_eq!(
            validate_optional_text("d", Some(" lunch "), 10).unwrap(),
            Some("lunch".to_string())
        );
    }

    #[test]
    fn test_transaction_rules() {
        let mut input = NewTransaction {
            kind: TransactionType::Expense,
            amount_cents: 0,
            category: "Food".to_string(),
            description: None,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };
        assert!(validate_new_transaction(&input).is_ok());

        input.amount_cents = -1;
        assert!(validate_new_transaction(&input).is_err());

        input.amount_cents = 100;
        input.category = String::new();
        assert!(matches!(
            validate_new_transaction(&input),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_budget_duplicate_category() {
        let existing = vec![budget("Food"), budget("Bills")];
        let input = NewBudget {
            category: "Food".to_string(),
            limit_cents: 5_000,
            period: BudgetPeriod::Monthly,
            color: None,
        };
        assert!(matches!(
            validate_new_budget(&input, &existing),
            Err(ValidationError::Duplicate { .. })
        ));

        let input = NewBudget {
            category: "Transport".to_string(),
            ..input
        };
        assert!(validate_new_budget(&input, &existing).is_ok());
    }

    #[test]
    fn test_budget_limit_must_be_positive() {
        let input = NewBudget {
            category: "Food".to_string(),
            limit_cents: 0,
            period: BudgetPeriod::Weekly,
            color: None,
        };
        assert!(matches!(
            validate_new_budget(&input, &[]),
            Err(ValidationError::MustBePositive { .. })
        ));
    }

    #[test]
    fn test_goal_rules() {
        let input = NewGoal {
            title: "Emergency fund".to_string(),
            target_cents: 100_000,
            current_cents: 0,
            deadline: None,
            color: Some("#6366f1".to_string()),
        };
        assert!(validate_new_goal(&input).is_ok());

        let zero_target = NewGoal {
            target_cents: 0,
            ..input.clone()
        };
        assert!(validate_new_goal(&zero_target).is_err());

        let bad_color = NewGoal {
            color: Some("blue".to_string()),
            ..input
        };
        assert!(validate_new_goal(&bad_color).is_err());
    }

    #[test]
    fn test_chat_message() {
        assert_eq!(validate_chat_message("  hi ").unwrap(), "hi");
        assert!(validate_chat_message("\n\t").is_err());
    }

    #[test]
    fn test_reply_is_not_trimmed_or_required() {
        assert!(validate_reply("").is_ok());
        assert!(validate_reply("\n- Cut dining out\n").is_ok());
        assert!(matches!(
            validate_reply(&"x".repeat(MAX_REPLY_LEN + 1)),
            Err(ValidationError::TooLong { max: MAX_REPLY_LEN, .. })
        ));
    }

    #[test]
    fn test_profile_update() {
        let update = ProfileUpdate {
            currency: Some("inr".to_string()),
            ..Default::default()
        };
        assert!(validate_profile_update(&update).is_err());

        let update = ProfileUpdate {
            currency: Some("USD".to_string()),
            monthly_income_cents: Some(5_000_000),
            ..Default::default()
        };
        assert!(validate_profile_update(&update).is_ok());
    }
}
