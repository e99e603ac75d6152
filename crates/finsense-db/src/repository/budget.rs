//! # Budget Repository
//!
//! Database operations for per-category spending limits.
//!
//! ## Uniqueness
//! A user has at most one budget per category. The table enforces this with
//! `UNIQUE (user_id, category)`; the violation is reported as
//! `DbError::UniqueViolation { field: "category", .. }` so the API can answer
//! 409 with the offending category name.
//!
//! ## Default Colours
//! ```text
//! existing budgets: 0 → PALETTE[0]  "#14b8a6"
//!                   1 → PALETTE[1]
//!                   ...
//!                  10 → PALETTE[0]  (wraps)
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use finsense_core::categories::color_for_index;
use finsense_core::{Budget, BudgetUpdate, NewBudget};

/// Repository for budget database operations.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    pool: SqlitePool,
}

impl BudgetRepository {
    /// Creates a new BudgetRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BudgetRepository { pool }
    }

    /// Lists a user's budgets, most recently created first.
    pub async fn list(&self, user_id: &str) -> DbResult<Vec<Budget>> {
        let budgets = sqlx::query_as::<_, Budget>(
            r#"
            SELECT id, user_id, category, limit_cents, period, color, created_at, updated_at
            FROM budgets
            WHERE user_id = ?1
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(user_id = %user_id, count = budgets.len(), "Listed budgets");
        Ok(budgets)
    }

    /// Gets a single budget owned by `user_id`.
    pub async fn get(&self, user_id: &str, id: &str) -> DbResult<Option<Budget>> {
        let budget = sqlx::query_as::<_, Budget>(
            r#"
            SELECT id, user_id, category, limit_cents, period, color, created_at, updated_at
            FROM budgets
            WHERE id = ?1 AND user_id = ?2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(budget)
    }

    /// Inserts a new budget.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - The user already budgets this category
    pub async fn insert(&self, user_id: &str, input: &NewBudget) -> DbResult<Budget> {
        let category = input.category.trim().to_string();

        let color = match &input.color {
            Some(color) => color.clone(),
            None => {
                let existing: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM budgets WHERE user_id = ?1")
                        .bind(user_id)
                        .fetch_one(&self.pool)
                        .await?;
                color_for_index(usize::try_from(existing).unwrap_or_default()).to_string()
            }
        };

        let now = Utc::now();
        let budget = Budget {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            category,
            limit_cents: input.limit_cents,
            period: input.period,
            color,
            created_at: now,
            updated_at: now,
        };

        debug!(user_id = %user_id, category = %budget.category, "Inserting budget");

        sqlx::query(
            r#"
            INSERT INTO budgets (
                id, user_id, category, limit_cents, period, color, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&budget.id)
        .bind(&budget.user_id)
        .bind(&budget.category)
        .bind(budget.limit_cents)
        .bind(budget.period)
        .bind(&budget.color)
        .bind(budget.created_at)
        .bind(budget.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("category", &budget.category),
            other => other,
        })?;

        Ok(budget)
    }

    /// Applies the present fields of `changes`. The category itself is fixed.
    pub async fn update(
        &self,
        user_id: &str,
        id: &str,
        changes: &BudgetUpdate,
    ) -> DbResult<Budget> {
        debug!(user_id = %user_id, id = %id, "Updating budget");

        let result = sqlx::query(
            r#"
            UPDATE budgets
            SET
                limit_cents = COALESCE(?3, limit_cents),
                period = COALESCE(?4, period),
                color = COALESCE(?5, color),
                updated_at = ?6
            WHERE id = ?1 AND user_id = ?2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(changes.limit_cents)
        .bind(changes.period)
        .bind(&changes.color)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Budget", id));
        }

        self.get(user_id, id)
            .await?
            .ok_or_else(|| DbError::not_found("Budget", id))
    }

    /// Deletes a budget.
    pub async fn delete(&self, user_id: &str, id: &str) -> DbResult<()> {
        debug!(user_id = %user_id, id = %id, "Deleting budget");

        let result = sqlx::query("DELETE FROM budgets WHERE id = ?1 AND user_id = ?2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Budget", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
