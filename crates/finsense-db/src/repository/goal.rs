//! # Goal Repository
//!
//! Database operations for savings goals.
//!
//! ## Progress Updates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  update_progress(user, id, current)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  load goal (scoped by user) ──── missing ───► DbError::NotFound        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  status = GoalStatus::for_progress(current, target)                    │
//! │       │      current >= target → completed                             │
//! │       │      otherwise         → active                                │
//! │       ▼                                                                 │
//! │  UPDATE goals SET current_cents, status, updated_at                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use finsense_core::categories::color_for_index;
use finsense_core::{Goal, GoalStatus, GoalUpdate, NewGoal};

/// Repository for goal database operations.
#[derive(Debug, Clone)]
pub struct GoalRepository {
    pool: SqlitePool,
}

impl GoalRepository {
    /// Creates a new GoalRepository.
    pub fn new(pool: SqlitePool) -> Self {
        GoalRepository { pool }
    }

    /// Lists a user's goals, most recently created first.
    pub async fn list(&self, user_id: &str) -> DbResult<Vec<Goal>> {
        let goals = sqlx::query_as::<_, Goal>(
            r#"
            SELECT id, user_id, title, target_cents, current_cents, deadline, status, color,
                   created_at, updated_at
            FROM goals
            WHERE user_id = ?1
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(user_id = %user_id, count = goals.len(), "Listed goals");
        Ok(goals)
    }

    /// Gets a single goal owned by `user_id`.
    pub async fn get(&self, user_id: &str, id: &str) -> DbResult<Option<Goal>> {
        let goal = sqlx::query_as::<_, Goal>(
            r#"
            SELECT id, user_id, title, target_cents, current_cents, deadline, status, color,
                   created_at, updated_at
            FROM goals
            WHERE id = ?1 AND user_id = ?2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(goal)
    }

    /// Inserts a new goal. New goals always start active, even when the
    /// starting amount already covers the target.
    pub async fn insert(&self, user_id: &str, input: &NewGoal) -> DbResult<Goal> {
        let color = match &input.color {
            Some(color) => color.clone(),
            None => {
                let existing: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM goals WHERE user_id = ?1")
                        .bind(user_id)
                        .fetch_one(&self.pool)
                        .await?;
                color_for_index(usize::try_from(existing).unwrap_or_default()).to_string()
            }
        };

        let now = Utc::now();
        let goal = Goal {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title: input.title.trim().to_string(),
            target_cents: input.target_cents,
            current_cents: input.current_cents,
            deadline: input.deadline,
            status: GoalStatus::Active,
            color,
            created_at: now,
            updated_at: now,
        };

        debug!(user_id = %user_id, id = %goal.id, "Inserting goal");

        sqlx::query(
            r#"
            INSERT INTO goals (
                id, user_id, title, target_cents, current_cents, deadline, status, color,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&goal.id)
        .bind(&goal.user_id)
        .bind(&goal.title)
        .bind(goal.target_cents)
        .bind(goal.current_cents)
        .bind(goal.deadline)
        .bind(goal.status)
        .bind(&goal.color)
        .bind(goal.created_at)
        .bind(goal.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(goal)
    }

    /// Sets the saved amount and re-derives the status from it.
    ///
    /// The amount must already be validated as non-negative.
    pub async fn update_progress(
        &self,
        user_id: &str,
        id: &str,
        current_cents: i64,
    ) -> DbResult<Goal> {
        let goal = self
            .get(user_id, id)
            .await?
            .ok_or_else(|| DbError::not_found("Goal", id))?;

        let status = GoalStatus::for_progress(current_cents, goal.target_cents);

        sqlx::query(
            r#"
            UPDATE goals
            SET current_cents = ?3, status = ?4, updated_at = ?5
            WHERE id = ?1 AND user_id = ?2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(current_cents)
        .bind(status)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if status == GoalStatus::Completed && goal.status != GoalStatus::Completed {
            info!(user_id = %user_id, id = %id, "Goal reached its target");
        }

        self.get(user_id, id)
            .await?
            .ok_or_else(|| DbError::not_found("Goal", id))
    }

    /// Applies the present fields of `changes`.
    pub async fn update(&self, user_id: &str, id: &str, changes: &GoalUpdate) -> DbResult<Goal> {
        debug!(user_id = %user_id, id = %id, "Updating goal");

        let result = sqlx::query(
            r#"
            UPDATE goals
            SET
                title = COALESCE(?3, title),
                target_cents = COALESCE(?4, target_cents),
                deadline = COALESCE(?5, deadline),
                color = COALESCE(?6, color),
                status = COALESCE(?7, status),
                updated_at = ?8
            WHERE id = ?1 AND user_id = ?2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(changes.title.as_deref().map(str::trim))
        .bind(changes.target_cents)
        .bind(changes.deadline)
        .bind(&changes.color)
        .bind(changes.status)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Goal", id));
        }

        self.get(user_id, id)
            .await?
            .ok_or_else(|| DbError::not_found("Goal", id))
    }

    /// Deletes a goal.
    pub async fn delete(&self, user_id: &str, id: &str) -> DbResult<()> {
        debug!(user_id = %user_id, id = %id, "Deleting goal");

        let result = sqlx::query("DELETE FROM goals WHERE id = ?1 AND user_id = ?2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Goal", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
