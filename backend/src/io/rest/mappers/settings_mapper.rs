use shared::UserSettingsDto;

use crate::domain::models::settings::UserSettings;

pub fn to_dto(settings: UserSettings) -> UserSettingsDto {
    UserSettingsDto {
        user_id: settings.user_id,
        currency: settings.currency,
        currency_symbol: settings.currency_symbol,
        notifications: settings.notifications,
        email_notifications: settings.email_notifications,
        biometric_auth: settings.biometric_auth,
        start_of_week: settings.start_of_week,
        language: settings.language,
    }
}
