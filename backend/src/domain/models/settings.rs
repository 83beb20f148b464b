/// Per-user preference row. One row per user, last-write-wins on the store.
#[derive(Debug, Clone, PartialEq)]
pub struct UserSettings {
    pub user_id: String,
    /// ISO 4217 currency code, uppercase
    pub currency: String,
    /// Display symbol derived from `currency`
    pub currency_symbol: String,
    pub notifications: bool,
    pub email_notifications: bool,
    pub biometric_auth: bool,
    /// First day of the calendar week, 0 = Sunday .. 6 = Saturday
    pub start_of_week: u8,
    pub language: String,
}

impl UserSettings {
    /// Defaults applied when a user is seen for the first time.
    pub fn defaults_for(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            currency: "USD".to_string(),
            currency_symbol: "$".to_string(),
            notifications: true,
            email_notifications: false,
            biometric_auth: false,
            start_of_week: 0,
            language: "en".to_string(),
        }
    }
}

/// Display symbol for an ISO 4217 code. Unknown codes fall back to the code
/// itself so the UI always has something to render.
pub fn currency_symbol_for(code: &str) -> String {
    match code {
        "USD" | "AUD" | "CAD" | "NZD" | "SGD" | "HKD" | "MXN" => "$".to_string(),
        "EUR" => "\u{20ac}".to_string(),
        "GBP" => "\u{a3}".to_string(),
        "JPY" | "CNY" => "\u{a5}".to_string(),
        "INR" => "\u{20b9}".to_string(),
        "KRW" => "\u{20a9}".to_string(),
        "BRL" => "R$".to_string(),
        "SEK" | "NOK" | "DKK" => "kr".to_string(),
        other => other.to_string(),
    }
}
