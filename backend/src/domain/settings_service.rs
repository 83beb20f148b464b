use anyhow::Result;
use log::{error, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::biometric::BiometricCapability;
use crate::domain::commands::settings::SettingChange;
use crate::domain::events::{EventBus, NoticeLevel};
use crate::domain::models::settings::{currency_symbol_for, UserSettings};
use crate::storage::{DbConnection, SettingsRepository};

/// Service for per-user preference fields.
///
/// Updates are optimistic: the in-memory copy changes first, the store is
/// written after, and a failed write reverts the local field and surfaces a
/// notice. A currency change writes two fields (value, then derived symbol)
/// and only counts as successful when both land.
#[derive(Clone)]
pub struct SettingsService {
    repo: SettingsRepository,
    biometrics: Arc<dyn BiometricCapability>,
    events: EventBus,
    cache: Arc<RwLock<HashMap<String, UserSettings>>>,
}

impl SettingsService {
    pub fn new(db: DbConnection, biometrics: Arc<dyn BiometricCapability>, events: EventBus) -> Self {
        Self {
            repo: SettingsRepository::new(db),
            biometrics,
            events,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Current settings for a user, creating defaults on first access.
    pub async fn get_settings(&self, user_id: &str) -> Result<UserSettings> {
        if let Some(settings) = self.cache.read().await.get(user_id) {
            return Ok(settings.clone());
        }

        let settings = self.repo.get_or_create(user_id).await?;
        self.cache
            .write()
            .await
            .insert(user_id.to_string(), settings.clone());
        Ok(settings)
    }

    /// Apply one field change. Returns whether the change stuck.
    pub async fn update_setting(&self, user_id: &str, change: SettingChange) -> bool {
        info!("Updating setting {} for user {}", change.field_name(), user_id);

        let previous = match self.get_settings(user_id).await {
            Ok(settings) => settings,
            Err(e) => {
                error!("Failed to load settings for {}: {}", user_id, e);
                self.events
                    .notice(NoticeLevel::Error, "Failed to load settings");
                return false;
            }
        };

        // Biometric unlock needs working hardware before anything is written
        if let SettingChange::BiometricAuth(true) = change {
            if !self.biometrics.is_available().await {
                warn!("Biometric unlock requested but unavailable for {}", user_id);
                self.events.notice(
                    NoticeLevel::Error,
                    "Biometric unlock is not available on this device",
                );
                return false;
            }
        }

        let mut updated = previous.clone();
        if let Err(message) = apply_change(&mut updated, &change) {
            warn!("Rejected setting change for {}: {}", user_id, message);
            self.events.notice(NoticeLevel::Error, message);
            return false;
        }

        // Optimistic local update before the store round trip
        self.cache
            .write()
            .await
            .insert(user_id.to_string(), updated.clone());

        match self.persist_change(user_id, &change, &updated).await {
            Ok(()) => {
                info!("Setting {} updated for user {}", change.field_name(), user_id);
                true
            }
            Err(e) => {
                error!(
                    "Failed to persist setting {} for {}: {}",
                    change.field_name(),
                    user_id,
                    e
                );
                // Revert the local copy to the last known-good value
                self.cache
                    .write()
                    .await
                    .insert(user_id.to_string(), previous);
                self.events
                    .notice(NoticeLevel::Error, "Failed to update settings");
                false
            }
        }
    }

    async fn persist_change(
        &self,
        user_id: &str,
        change: &SettingChange,
        updated: &UserSettings,
    ) -> Result<()> {
        match change {
            SettingChange::Currency(_) => {
                self.repo.set_currency(user_id, &updated.currency).await?;
                // Second round trip for the derived symbol. A failure here
                // leaves the currency value written on the store; the next
                // successful currency update converges both fields.
                self.repo
                    .set_currency_symbol(user_id, &updated.currency_symbol)
                    .await?;
            }
            SettingChange::Notifications(enabled) => {
                self.repo.set_notifications(user_id, *enabled).await?;
            }
            SettingChange::EmailNotifications(enabled) => {
                self.repo.set_email_notifications(user_id, *enabled).await?;
            }
            SettingChange::BiometricAuth(enabled) => {
                self.repo.set_biometric_auth(user_id, *enabled).await?;
            }
            SettingChange::StartOfWeek(_) => {
                self.repo
                    .set_start_of_week(user_id, updated.start_of_week)
                    .await?;
            }
            SettingChange::Language(_) => {
                self.repo.set_language(user_id, &updated.language).await?;
            }
        }
        Ok(())
    }
}

/// Validate and apply a change to a settings copy. Returns a user-facing
/// message when the value is rejected.
fn apply_change(settings: &mut UserSettings, change: &SettingChange) -> std::result::Result<(), String> {
    match change {
        SettingChange::Currency(code) => {
            let code = code.trim().to_uppercase();
            if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err("Currency must be a 3-letter code".to_string());
            }
            settings.currency_symbol = currency_symbol_for(&code);
            settings.currency = code;
        }
        SettingChange::Notifications(enabled) => settings.notifications = *enabled,
        SettingChange::EmailNotifications(enabled) => settings.email_notifications = *enabled,
        SettingChange::BiometricAuth(enabled) => settings.biometric_auth = *enabled,
        SettingChange::StartOfWeek(day) => {
            if *day > 6 {
                return Err("Start of week must be between 0 and 6".to_string());
            }
            settings.start_of_week = *day;
        }
        SettingChange::Language(language) => {
            let language = language.trim();
            if language.is_empty() {
                return Err("Language cannot be empty".to_string());
            }
            settings.language = language.to_string();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::biometric::NoBiometrics;
    use crate::domain::events::AppEvent;
    use async_trait::async_trait;

    struct AvailableBiometrics;

    #[async_trait]
    impl BiometricCapability for AvailableBiometrics {
        async fn is_available(&self) -> bool {
            true
        }
    }

    async fn setup_test(biometrics: Arc<dyn BiometricCapability>) -> (SettingsService, DbConnection, EventBus) {
        let db = DbConnection::init_test()
            .await
            .expect("Failed to create test database");
        let events = EventBus::new();
        let service = SettingsService::new(db.clone(), biometrics, events.clone());
        (service, db, events)
    }

    #[tokio::test]
    async fn test_first_access_creates_defaults() {
        let (service, _db, _events) = setup_test(Arc::new(NoBiometrics)).await;

        let settings = service.get_settings("user-1").await.unwrap();
        assert_eq!(settings, UserSettings::defaults_for("user-1"));
    }

    #[tokio::test]
    async fn test_currency_update_derives_symbol() {
        let (service, _db, _events) = setup_test(Arc::new(NoBiometrics)).await;

        assert!(
            service
                .update_setting("user-1", SettingChange::Currency("eur".to_string()))
                .await
        );

        let settings = service.get_settings("user-1").await.unwrap();
        assert_eq!(settings.currency, "EUR");
        assert_eq!(settings.currency_symbol, "\u{20ac}");

        // The store holds both fields as well
        let stored = SettingsRepository::new(_db)
            .get_settings("user-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.currency, "EUR");
        assert_eq!(stored.currency_symbol, "\u{20ac}");
    }

    #[tokio::test]
    async fn test_invalid_values_are_rejected_with_notice() {
        let (service, _db, events) = setup_test(Arc::new(NoBiometrics)).await;
        let mut rx = events.subscribe();

        assert!(
            !service
                .update_setting("user-1", SettingChange::StartOfWeek(7))
                .await
        );
        assert!(
            !service
                .update_setting("user-1", SettingChange::Currency("EURO".to_string()))
                .await
        );
        assert!(
            !service
                .update_setting("user-1", SettingChange::Language("  ".to_string()))
                .await
        );

        // Settings stayed at defaults
        let settings = service.get_settings("user-1").await.unwrap();
        assert_eq!(settings, UserSettings::defaults_for("user-1"));

        // Each rejection surfaced a notice
        for _ in 0..3 {
            match rx.recv().await.unwrap() {
                AppEvent::Notice(notice) => assert_eq!(notice.level, NoticeLevel::Error),
                other => panic!("unexpected event: {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_biometric_gate() {
        let (service, _db, events) = setup_test(Arc::new(NoBiometrics)).await;
        let mut rx = events.subscribe();

        assert!(
            !service
                .update_setting("user-1", SettingChange::BiometricAuth(true))
                .await
        );
        match rx.recv().await.unwrap() {
            AppEvent::Notice(notice) => {
                assert!(notice.message.contains("not available"));
            }
            other => panic!("unexpected event: {:?}", other),
        }

        let settings = service.get_settings("user-1").await.unwrap();
        assert!(!settings.biometric_auth);

        // Disabling never needs the hardware
        assert!(
            service
                .update_setting("user-1", SettingChange::BiometricAuth(false))
                .await
        );
    }

    #[tokio::test]
    async fn test_biometric_enable_with_capable_device() {
        let (service, _db, _events) = setup_test(Arc::new(AvailableBiometrics)).await;

        assert!(
            service
                .update_setting("user-1", SettingChange::BiometricAuth(true))
                .await
        );
        let settings = service.get_settings("user-1").await.unwrap();
        assert!(settings.biometric_auth);
    }

    #[tokio::test]
    async fn test_failed_persistence_rolls_back_local_copy() {
        let (service, db, events) = setup_test(Arc::new(NoBiometrics)).await;
        let mut rx = events.subscribe();

        // Prime the cache, then kill the store so the write must fail
        let before = service.get_settings("user-1").await.unwrap();
        db.pool().close().await;

        assert!(
            !service
                .update_setting("user-1", SettingChange::Language("de".to_string()))
                .await
        );

        // Local copy reverted to the last known-good value
        let after = service.get_settings("user-1").await.unwrap();
        assert_eq!(after, before);
        assert_eq!(after.language, "en");

        match rx.recv().await.unwrap() {
            AppEvent::Notice(notice) => {
                assert_eq!(notice.level, NoticeLevel::Error);
                assert_eq!(notice.message, "Failed to update settings");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
