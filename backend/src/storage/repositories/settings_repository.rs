use anyhow::Result;
use sqlx::Row;

use crate::domain::models::settings::UserSettings;
use crate::storage::db::DbConnection;

/// Repository for per-user settings rows.
///
/// Writes are one UPDATE per field, matching the original client's
/// field-by-field round trips; a currency change is therefore two separate
/// statements (value, then derived symbol).
#[derive(Clone)]
pub struct SettingsRepository {
    db: DbConnection,
}

impl SettingsRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn get_settings(&self, user_id: &str) -> Result<Option<UserSettings>> {
        let row = sqlx::query(
            r#"
            SELECT user_id, currency, currency_symbol, notifications, email_notifications,
                   biometric_auth, start_of_week, language
            FROM user_settings
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|r| UserSettings {
            user_id: r.get("user_id"),
            currency: r.get("currency"),
            currency_symbol: r.get("currency_symbol"),
            notifications: r.get("notifications"),
            email_notifications: r.get("email_notifications"),
            biometric_auth: r.get("biometric_auth"),
            start_of_week: r.get::<i64, _>("start_of_week") as u8,
            language: r.get("language"),
        }))
    }

    /// Fetch the settings row, inserting defaults when the user has none yet.
    pub async fn get_or_create(&self, user_id: &str) -> Result<UserSettings> {
        if let Some(settings) = self.get_settings(user_id).await? {
            return Ok(settings);
        }

        let defaults = UserSettings::defaults_for(user_id);
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO user_settings
                (user_id, currency, currency_symbol, notifications, email_notifications,
                 biometric_auth, start_of_week, language)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&defaults.user_id)
        .bind(&defaults.currency)
        .bind(&defaults.currency_symbol)
        .bind(defaults.notifications)
        .bind(defaults.email_notifications)
        .bind(defaults.biometric_auth)
        .bind(defaults.start_of_week as i64)
        .bind(&defaults.language)
        .execute(self.db.pool())
        .await?;

        Ok(defaults)
    }

    pub async fn set_currency(&self, user_id: &str, currency: &str) -> Result<()> {
        self.set_text_field(user_id, "currency", currency).await
    }

    pub async fn set_currency_symbol(&self, user_id: &str, symbol: &str) -> Result<()> {
        self.set_text_field(user_id, "currency_symbol", symbol).await
    }

    pub async fn set_notifications(&self, user_id: &str, enabled: bool) -> Result<()> {
        self.set_bool_field(user_id, "notifications", enabled).await
    }

    pub async fn set_email_notifications(&self, user_id: &str, enabled: bool) -> Result<()> {
        self.set_bool_field(user_id, "email_notifications", enabled)
            .await
    }

    pub async fn set_biometric_auth(&self, user_id: &str, enabled: bool) -> Result<()> {
        self.set_bool_field(user_id, "biometric_auth", enabled).await
    }

    pub async fn set_start_of_week(&self, user_id: &str, day: u8) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE user_settings
            SET start_of_week = ?, updated_at = CURRENT_TIMESTAMP
            WHERE user_id = ?
            "#,
        )
        .bind(day as i64)
        .bind(user_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    pub async fn set_language(&self, user_id: &str, language: &str) -> Result<()> {
        self.set_text_field(user_id, "language", language).await
    }

    async fn set_text_field(&self, user_id: &str, field: &'static str, value: &str) -> Result<()> {
        // `field` is a compile-time column name, never user input
        let sql = format!(
            "UPDATE user_settings SET {} = ?, updated_at = CURRENT_TIMESTAMP WHERE user_id = ?",
            field
        );
        sqlx::query(&sql)
            .bind(value)
            .bind(user_id)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    async fn set_bool_field(&self, user_id: &str, field: &'static str, value: bool) -> Result<()> {
        let sql = format!(
            "UPDATE user_settings SET {} = ?, updated_at = CURRENT_TIMESTAMP WHERE user_id = ?",
            field
        );
        sqlx::query(&sql)
            .bind(value)
            .bind(user_id)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> SettingsRepository {
        let db = DbConnection::init_test()
            .await
            .expect("Failed to create test database");
        SettingsRepository::new(db)
    }

    #[tokio::test]
    async fn test_get_or_create_inserts_defaults_once() {
        let repo = setup_test().await;

        assert!(repo.get_settings("user-1").await.unwrap().is_none());

        let created = repo.get_or_create("user-1").await.unwrap();
        assert_eq!(created, UserSettings::defaults_for("user-1"));

        // Second call reads the stored row instead of reinserting
        let read_back = repo.get_or_create("user-1").await.unwrap();
        assert_eq!(read_back, created);
    }

    #[tokio::test]
    async fn test_field_updates_persist() {
        let repo = setup_test().await;
        repo.get_or_create("user-1").await.unwrap();

        repo.set_currency("user-1", "EUR").await.unwrap();
        repo.set_currency_symbol("user-1", "\u{20ac}").await.unwrap();
        repo.set_notifications("user-1", false).await.unwrap();
        repo.set_email_notifications("user-1", true).await.unwrap();
        repo.set_biometric_auth("user-1", true).await.unwrap();
        repo.set_start_of_week("user-1", 1).await.unwrap();
        repo.set_language("user-1", "de").await.unwrap();

        let settings = repo.get_settings("user-1").await.unwrap().unwrap();
        assert_eq!(settings.currency, "EUR");
        assert_eq!(settings.currency_symbol, "\u{20ac}");
        assert!(!settings.notifications);
        assert!(settings.email_notifications);
        assert!(settings.biometric_auth);
        assert_eq!(settings.start_of_week, 1);
        assert_eq!(settings.language, "de");
    }
}
