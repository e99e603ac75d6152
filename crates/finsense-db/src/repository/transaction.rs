//! # Transaction Repository
//!
//! Database operations for income and expense entries.
//!
//! ## Ordering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  list(user) returns newest money movement first:                       │
//! │                                                                         │
//! │    ORDER BY date DESC, created_at DESC                                 │
//! │                                                                         │
//! │  2024-03-15  Salary      +₹50,000   (entered 09:12)                    │
//! │  2024-03-15  Food          -₹450    (entered 08:40)                    │
//! │  2024-03-02  Rent       -₹15,000                                       │
//! │                                                                         │
//! │  Index: idx_transactions_user_date (user_id, date DESC, created_at)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every statement carries `user_id` in its WHERE clause, so a row owned by
//! another user is indistinguishable from a missing one.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use finsense_core::{NewTransaction, Transaction};

/// Repository for transaction database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.transactions();
///
/// let txn = repo.insert("user-1", &input).await?;
/// let all = repo.list("user-1").await?;
/// ```
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Lists all transactions of a user, newest first.
    pub async fn list(&self, user_id: &str) -> DbResult<Vec<Transaction>> {
        let txns = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, user_id, kind, amount_cents, category, description, date, created_at
            FROM transactions
            WHERE user_id = ?1
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(user_id = %user_id, count = txns.len(), "Listed transactions");
        Ok(txns)
    }

    /// Gets a single transaction.
    ///
    /// ## Returns
    /// * `Ok(Some(Transaction))` - Found and owned by `user_id`
    /// * `Ok(None)` - Missing or owned by someone else
    pub async fn get(&self, user_id: &str, id: &str) -> DbResult<Option<Transaction>> {
        let txn = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, user_id, kind, amount_cents, category, description, date, created_at
            FROM transactions
            WHERE id = ?1 AND user_id = ?2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(txn)
    }

    /// Inserts a new transaction and returns the stored row.
    ///
    /// Category and description are trimmed; a blank description is stored
    /// as NULL. Input is expected to be validated already.
    pub async fn insert(&self, user_id: &str, input: &NewTransaction) -> DbResult<Transaction> {
        let txn = Transaction {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            kind: input.kind,
            amount_cents: input.amount_cents,
            category: input.category.trim().to_string(),
            description: clean_description(input.description.as_deref()),
            date: input.date,
            created_at: Utc::now(),
        };

        debug!(user_id = %user_id, id = %txn.id, kind = %txn.kind, "Inserting transaction");

        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, user_id, kind, amount_cents, category, description, date, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&txn.id)
        .bind(&txn.user_id)
        .bind(txn.kind)
        .bind(txn.amount_cents)
        .bind(&txn.category)
        .bind(&txn.description)
        .bind(txn.date)
        .bind(txn.created_at)
        .execute(&self.pool)
        .await?;

        Ok(txn)
    }

    /// Replaces every editable field of a transaction.
    ///
    /// `created_at` is kept, so the row keeps its position among entries
    /// sharing the same date.
    pub async fn replace(
        &self,
        user_id: &str,
        id: &str,
        input: &NewTransaction,
    ) -> DbResult<Transaction> {
        debug!(user_id = %user_id, id = %id, "Replacing transaction");

        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET
                kind = ?3,
                amount_cents = ?4,
                category = ?5,
                description = ?6,
                date = ?7
            WHERE id = ?1 AND user_id = ?2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(input.kind)
        .bind(input.amount_cents)
        .bind(input.category.trim())
        .bind(clean_description(input.description.as_deref()))
        .bind(input.date)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Transaction", id));
        }

        self.get(user_id, id)
            .await?
            .ok_or_else(|| DbError::not_found("Transaction", id))
    }

    /// Deletes a transaction.
    pub async fn delete(&self, user_id: &str, id: &str) -> DbResult<()> {
        debug!(user_id = %user_id, id = %id, "Deleting transaction");

        let result = sqlx::query("DELETE FROM transactions WHERE id = ?1 AND user_id = ?2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Transaction", id));
        }

        Ok(())
    }

    /// Counts a user's transactions (for diagnostics and the seed tool).
    pub async fn count(&self, user_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE user_id = ?1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

fn clean_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Unit Tests
// =============================================================================
