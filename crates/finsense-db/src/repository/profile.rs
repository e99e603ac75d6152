//! # Profile Repository
//!
//! One profile row per user, created lazily on first read. Profiles are keyed
//! by `user_id`, never by their own `id`.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use finsense_core::{Profile, ProfileUpdate, DEFAULT_CURRENCY};

/// Repository for profile database operations.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    pool: SqlitePool,
}

impl ProfileRepository {
    /// Creates a new ProfileRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProfileRepository { pool }
    }

    /// Gets the profile without creating one.
    pub async fn get(&self, user_id: &str) -> DbResult<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, user_id, full_name, avatar_url, currency, monthly_income_cents,
                   created_at, updated_at
            FROM profiles
            WHERE user_id = ?1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Returns the user's profile, inserting a default one if missing.
    ///
    /// Safe under concurrent first requests: the insert is
    /// `ON CONFLICT (user_id) DO NOTHING` and the row is read back afterwards.
    pub async fn get_or_create(&self, user_id: &str) -> DbResult<Profile> {
        if let Some(profile) = self.get(user_id).await? {
            return Ok(profile);
        }

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO profiles (
                id, user_id, full_name, avatar_url, currency, monthly_income_cents,
                created_at, updated_at
            ) VALUES (?1, ?2, NULL, NULL, ?3, 0, ?4, ?4)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(DEFAULT_CURRENCY)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            info!(user_id = %user_id, "Created default profile");
        }

        self.get(user_id)
            .await?
            .ok_or_else(|| DbError::not_found("Profile", user_id))
    }

    /// Applies the present fields of `changes`, creating the profile first
    /// if needed.
    pub async fn update(&self, user_id: &str, changes: &ProfileUpdate) -> DbResult<Profile> {
        self.get_or_create(user_id).await?;

        debug!(user_id = %user_id, "Updating profile");

        sqlx::query(
            r#"
            UPDATE profiles
            SET
                full_name = COALESCE(?2, full_name),
                avatar_url = COALESCE(?3, avatar_url),
                currency = COALESCE(?4, currency),
                monthly_income_cents = COALESCE(?5, monthly_income_cents),
                updated_at = ?6
            WHERE user_id = ?1
            "#,
        )
        .bind(user_id)
        .bind(changes.full_name.as_deref().map(str::trim))
        .bind(changes.avatar_url.as_deref().map(str::trim))
        .bind(&changes.currency)
        .bind(changes.monthly_income_cents)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        self.get(user_id)
            .await?
            .ok_or_else(|| DbError::not_found("Profile", user_id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
