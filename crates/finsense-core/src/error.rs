//! # Error Types
//!
//! Domain-specific error types for finsense-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  finsense-core errors (this file)                                      │
//! │  ├── CoreError        - Domain rule violations                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  finsense-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  finsense-coach errors                                                 │
//! │  └── CoachError       - Streaming chat failures (429/402/other)        │
//! │                                                                         │
//! │  finsense-api errors                                                   │
//! │  └── ApiError         - What HTTP clients see (serialized)             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A chat exchange operation was called in the wrong phase.
    ///
    /// ## When This Occurs
    /// - Sending a second message while a reply is still streaming
    /// - Applying a snapshot before the stream has started
    ///
    /// ## User Workflow
    /// ```text
    /// User sends "How do I save more?"
    ///      │
    ///      ▼
    /// Exchange: Streaming
    ///      │
    ///      ▼
    /// User sends another message
    ///      │
    ///      ▼
    /// InvalidExchangeState { operation: "begin", state: "streaming" }
    /// ```
    #[error("Cannot {operation} while exchange is {state}")]
    InvalidExchangeState {
        operation: &'static str,
        state: String,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Validation always runs before any store call.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., invalid colour, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., a second budget for the same category).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    /// Creates a Required error for the given field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidExchangeState {
            operation: "begin",
            state: "streaming".to_string(),
        };
        assert_eq!(err.to_string(), "Cannot begin while exchange is streaming");
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(
            ValidationError::required("category").to_string(),
            "category is required"
        );

        let err = ValidationError::Duplicate {
            field: "budget category".to_string(),
            value: "Food".to_string(),
        };
        assert_eq!(err.to_string(), "budget category 'Food' already exists");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("title").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
