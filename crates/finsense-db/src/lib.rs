//! # finsense-db: Database Layer for FinSense
//!
//! SQLite storage for transactions, budgets, goals, profiles and the coach
//! transcript, with sqlx for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        FinSense Data Flow                               │
//! │                                                                         │
//! │  finsense-api handler            finsense-coach session                │
//! │       │                                 │                               │
//! │       ▼                                 ▼                               │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   finsense-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ Transaction   │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ Budget, Goal  │    │ 001_initial  │  │   │
//! │  │   │ WAL mode      │    │ Profile, Chat │    │ _schema.sql  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  finsense.db                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use finsense_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("finsense.db")).await?;
//!
//! let txns = db.transactions().list(&user_id).await?;
//! let budgets = db.budgets().list(&user_id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::budget::BudgetRepository;
pub use repository::chat::ChatRepository;
pub use repository::goal::GoalRepository;
pub use repository::profile::ProfileRepository;
pub use repository::transaction::TransactionRepository;
