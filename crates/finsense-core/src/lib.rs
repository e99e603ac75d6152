//! # finsense-core: Pure Finance Logic for FinSense
//!
//! This crate is the **heart** of FinSense. It contains the health score
//! engine, the budget/goal aggregation helpers and the streaming response
//! assembler as pure code with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        FinSense Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Web Frontend / finsense-chat                   │   │
//! │  │    Dashboard ──► Transactions ──► Budgets ──► Goals ──► Coach  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP (JSON + SSE)                      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 finsense-api / finsense-coach                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ finsense-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌─────────────┐ ┌────────┐ ┌──────┐  │   │
//! │  │  │  types  │ │ summary │ │ aggregation │ │ stream │ │ chat │  │   │
//! │  │  │ Budget  │ │ Health  │ │ BudgetStatus│ │  SSE   │ │ FSM  │  │   │
//! │  │  │  Goal   │ │  Score  │ │ GoalOverview│ │assembler││      │  │   │
//! │  │  └─────────┘ └─────────┘ └─────────────┘ └────────┘ └──────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • NO WALL CLOCK            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 finsense-db (Database Layer)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Transaction, Budget, Goal, Profile, ChatMessage)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`categories`] - Category lists and the colour palette
//! - [`summary`] - Financial summary and health score engine
//! - [`aggregation`] - Budget status, goal progress, filters, chart series
//! - [`stream`] - Incremental SSE response assembler
//! - [`chat`] - Coach exchange state machine and wire types
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, "today" is always a parameter
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in minor units (i64)
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use finsense_core::summary::compute_summary;
//!
//! let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
//! let summary = compute_summary(&[], &[], &[], None, today);
//!
//! // No data at all: the neutral base score
//! assert_eq!(summary.health_score, 50);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregation;
pub mod categories;
pub mod chat;
pub mod error;
pub mod money;
pub mod stream;
pub mod summary;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use finsense_core::Money` instead of
// `use finsense_core::money::Money`

pub use chat::{Conversation, CoachRequest, ExchangeState, FinancialContext, WireMessage};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use stream::StreamAssembler;
pub use summary::{compute_summary, compute_summary_with_breakdown, FinancialSummary, HealthLabel};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency assumed when a profile does not specify one.
pub const DEFAULT_CURRENCY: &str = "INR";

/// Maximum length of a coach message typed by the user.
///
/// ## Business Reason
/// Keeps a single exchange within a sane prompt size for the upstream model.
pub const MAX_CHAT_MESSAGE_LEN: usize = 4000;

/// Maximum length of free-text fields (descriptions, goal titles).
pub const MAX_TEXT_LEN: usize = 500;

/// Longest assistant reply the transcript accepts.
pub const MAX_REPLY_LEN: usize = 20_000;
