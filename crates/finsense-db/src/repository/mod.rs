//! # Repository Module
//!
//! Per-user CRUD over the FinSense tables.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP handler / coach session                                          │
//! │       │                                                                 │
//! │       │  db.budgets().insert(&user_id, &input)                         │
//! │       ▼                                                                 │
//! │  BudgetRepository                                                      │
//! │  ├── list(&self, user_id)                                              │
//! │  ├── insert(&self, user_id, input)                                     │
//! │  ├── update(&self, user_id, id, changes)                               │
//! │  └── delete(&self, user_id, id)                                        │
//! │       │                                                                 │
//! │       │  SQL (always filtered by user_id)                              │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories do not validate input; callers run the
//! `finsense_core::validation` functions first.
//!
//! ## Available Repositories
//!
//! - [`TransactionRepository`](transaction::TransactionRepository) - Income and expense entries
//! - [`BudgetRepository`](budget::BudgetRepository) - Category spending limits
//! - [`GoalRepository`](goal::GoalRepository) - Savings goals and progress
//! - [`ProfileRepository`](profile::ProfileRepository) - Per-user settings
//! - [`ChatRepository`](chat::ChatRepository) - Coach transcript

pub mod budget;
pub mod chat;
pub mod goal;
pub mod profile;
pub mod transaction;
