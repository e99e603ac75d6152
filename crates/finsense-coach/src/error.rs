//! # Coach Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Coach Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Endpoint said  │  │   Transport     │  │     Local               │ │
//! │  │  no             │  │                 │  │                         │ │
//! │  │  RateLimited    │  │  Transport      │  │  Config                 │ │
//! │  │  QuotaExhausted │  │  EmptyBody      │  │  Store                  │ │
//! │  │  Service        │  │                 │  │  Conversation           │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant has a short user-facing text via [`CoachError::notification`].
//! Rate limiting and exhausted credits get their own wording; everything
//! else reads as a generic failure.

use thiserror::Error;

use finsense_core::CoreError;
use finsense_db::DbError;

/// Result type alias for coach operations.
pub type CoachResult<T> = Result<T, CoachError>;

/// Everything that can go wrong while talking to the coach.
#[derive(Debug, Error)]
pub enum CoachError {
    // =========================================================================
    // Endpoint Errors
    // =========================================================================
    /// HTTP 429 from the coach endpoint.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// HTTP 402 from the coach endpoint.
    #[error("Quota exhausted: {0}")]
    QuotaExhausted(String),

    /// Any other non-success status.
    #[error("Coach service error ({status}): {message}")]
    Service { status: u16, message: String },

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Connection, TLS, timeout or mid-stream read failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The endpoint accepted the request but sent no bytes at all.
    #[error("Coach endpoint returned an empty body")]
    EmptyBody,

    // =========================================================================
    // Local Errors
    // =========================================================================
    /// Invalid or unreadable configuration.
    #[error("Invalid coach configuration: {0}")]
    Config(String),

    /// Loading or saving the transcript failed.
    #[error("Transcript store error: {0}")]
    Store(#[from] DbError),

    /// Blank message, or a send while another exchange is running.
    #[error(transparent)]
    Conversation(#[from] CoreError),
}

impl CoachError {
    /// Text to show the user.
    ///
    /// ## Example
    /// ```rust
    /// use finsense_coach::CoachError;
    ///
    /// let err = CoachError::RateLimited("slow down".into());
    /// assert_eq!(err.notification(), "slow down");
    /// ```
    pub fn notification(&self) -> String {
        match self {
            CoachError::RateLimited(message) | CoachError::QuotaExhausted(message) => {
                message.clone()
            }
            CoachError::Service { message, .. } if !message.is_empty() => message.clone(),
            CoachError::Conversation(err) => err.to_string(),
            _ => "Failed to get AI response".to_string(),
        }
    }

    /// True for errors the user can fix by waiting or topping up credits.
    pub fn is_quota_error(&self) -> bool {
        matches!(self, CoachError::RateLimited(_) | CoachError::QuotaExhausted(_))
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for CoachError {
    fn from(err: reqwest::Error) -> Self {
        CoachError::Transport(err.to_string())
    }
}

impl From<url::ParseError> for CoachError {
    fn from(err: url::ParseError) -> Self {
        CoachError::Config(format!("invalid endpoint URL: {}", err))
    }
}

impl From<std::io::Error> for CoachError {
    fn from(err: std::io::Error) -> Self {
        CoachError::Config(err.to_string())
    }
}

impl From<toml::de::Error> for CoachError {
    fn from(err: toml::de::Error) -> Self {
        CoachError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifications() {
        assert_eq!(
            CoachError::QuotaExhausted("AI credits exhausted. Please add more credits.".into())
                .notification(),
            "AI credits exhausted. Please add more credits."
        );
        assert_eq!(
            CoachError::Transport("connection refused".into()).notification(),
            "Failed to get AI response"
        );
        assert_eq!(CoachError::EmptyBody.notification(), "Failed to get AI response");
        assert_eq!(
            CoachError::Service {
                status: 500,
                message: "AI service error".into()
            }
            .notification(),
            "AI service error"
        );
    }

    #[test]
    fn test_quota_classification() {
        assert!(CoachError::RateLimited(String::new()).is_quota_error());
        assert!(!CoachError::EmptyBody.is_quota_error());
    }
}
