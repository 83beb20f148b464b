use anyhow::Result;
use sqlx::Row;

use crate::storage::db::DbConnection;

/// Repository for the key-value preference store. The theme preference
/// lives here under the `"theme"` key as `"dark"` or `"light"`.
#[derive(Clone)]
pub struct PreferenceRepository {
    db: DbConnection,
}

impl PreferenceRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query(
            r#"
            SELECT value FROM preferences WHERE key = ?
            "#,
        )
        .bind(key)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|r| r.get("value")))
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO preferences (key, value)
            VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }
}
