use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::Row;

use crate::domain::models::passcode::PasscodeRecord;
use crate::storage::db::DbConnection;

/// Repository for passcode credentials.
///
/// These operations mirror the stored procedures the original system ran
/// server-side (`setup_user_passcode`, `change_user_passcode`,
/// `increment_passcode_attempts`, `reset_passcode_attempts`); the lockout
/// decision itself lives in the passcode service.
#[derive(Clone)]
pub struct PasscodeRepository {
    db: DbConnection,
}

impl PasscodeRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Fetch the passcode record for a user, if one exists.
    pub async fn get_passcode(&self, user_id: &str) -> Result<Option<PasscodeRecord>> {
        let row = sqlx::query(
            r#"
            SELECT user_id, passcode_hash, failed_attempts, locked_until, created_at, updated_at
            FROM user_passcodes
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => {
                let locked_until: Option<String> = r.get("locked_until");
                let locked_until = locked_until
                    .as_deref()
                    .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                    .map(|dt| dt.with_timezone(&Utc));

                Ok(Some(PasscodeRecord {
                    user_id: r.get("user_id"),
                    passcode_hash: r.get("passcode_hash"),
                    failed_attempts: r.get::<i64, _>("failed_attempts") as u32,
                    locked_until,
                    created_at: r.get("created_at"),
                    updated_at: r.get("updated_at"),
                }))
            }
            None => Ok(None),
        }
    }

    /// Insert a fresh passcode record with a zeroed attempt counter.
    pub async fn setup_user_passcode(&self, user_id: &str, passcode_hash: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_passcodes (user_id, passcode_hash, failed_attempts, locked_until)
            VALUES (?, ?, 0, NULL)
            "#,
        )
        .bind(user_id)
        .bind(passcode_hash)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    /// Swap the stored hash for a new one, clearing the attempt counter and
    /// any lock in the same statement.
    pub async fn change_user_passcode(&self, user_id: &str, passcode_hash: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE user_passcodes
            SET passcode_hash = ?, failed_attempts = 0, locked_until = NULL,
                updated_at = CURRENT_TIMESTAMP
            WHERE user_id = ?
            "#,
        )
        .bind(passcode_hash)
        .bind(user_id)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    /// Atomically bump the failure counter and return the new count.
    pub async fn increment_passcode_attempts(&self, user_id: &str) -> Result<u32> {
        let row = sqlx::query(
            r#"
            UPDATE user_passcodes
            SET failed_attempts = failed_attempts + 1, updated_at = CURRENT_TIMESTAMP
            WHERE user_id = ?
            RETURNING failed_attempts
            "#,
        )
        .bind(user_id)
        .fetch_one(self.db.pool())
        .await?;

        Ok(row.get::<i64, _>("failed_attempts") as u32)
    }

    /// Clear the failure counter and any lock after a successful verification.
    pub async fn reset_passcode_attempts(&self, user_id: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE user_passcodes
            SET failed_attempts = 0, locked_until = NULL, updated_at = CURRENT_TIMESTAMP
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    /// Open a lockout window ending at `until`.
    pub async fn set_locked_until(&self, user_id: &str, until: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE user_passcodes
            SET locked_until = ?, updated_at = CURRENT_TIMESTAMP
            WHERE user_id = ?
            "#,
        )
        .bind(until.to_rfc3339())
        .bind(user_id)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    /// Delete the passcode record. Returns whether a record existed.
    pub async fn delete_passcode(&self, user_id: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM user_passcodes WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
