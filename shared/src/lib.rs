use serde::{Deserialize, Serialize};

/// Transaction ID in format: "txn::<deposit|withdrawal>::<epoch_millis>::<uuid>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    /// ID of the user this transaction belongs to
    pub user_id: String,
    /// Human-readable timestamp with timezone (RFC 3339)
    pub date: String,
    /// Description of the transaction (max 256 characters)
    pub description: String,
    /// Transaction amount (positive for deposits, negative for withdrawals)
    pub amount: f64,
    /// Account balance after this transaction
    pub balance: f64,
    /// Type of transaction for rendering purposes
    pub transaction_type: TransactionType,
}

/// Type of transaction for rendering and business logic
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TransactionType {
    /// Money added to the account
    Deposit,
    /// Money taken out of the account
    Withdrawal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    pub user_id: String,
    /// Description of the transaction (max 256 characters)
    pub description: String,
    /// Amount as a positive number; `transaction_type` decides the sign
    pub amount: f64,
    pub transaction_type: TransactionType,
    /// Optional date override (RFC 3339) - uses current time if not provided
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<Transaction>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub user_id: String,
    pub balance: f64,
}

// ---------------------------------------------------------------------------
// Passcode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupPasscodeRequest {
    pub user_id: String,
    /// Exactly 6 ASCII digits
    pub passcode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyPasscodeRequest {
    pub user_id: String,
    pub passcode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangePasscodeRequest {
    pub user_id: String,
    pub current_passcode: String,
    pub new_passcode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetPasscodeRequest {
    pub user_id: String,
}

/// Generic outcome for setup/change/reset operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasscodeActionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyPasscodeResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts_remaining: Option<u32>,
    /// Fixed estimate in seconds, reported while the lockout window is open
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lockout_time_remaining: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasscodeStatusResponse {
    pub has_passcode: bool,
    pub is_locked: bool,
    pub failed_attempts: u32,
    pub attempts_remaining: u32,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettingsDto {
    pub user_id: String,
    /// ISO 4217 currency code, e.g. "USD"
    pub currency: String,
    /// Display symbol derived from the currency code
    pub currency_symbol: String,
    pub notifications: bool,
    pub email_notifications: bool,
    pub biometric_auth: bool,
    /// First day of the calendar week, 0 = Sunday .. 6 = Saturday
    pub start_of_week: u8,
    pub language: String,
}

/// A single settings field change, applied field-by-field the way the
/// client issues them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum SettingChangeDto {
    Currency(String),
    Notifications(bool),
    EmailNotifications(bool),
    BiometricAuth(bool),
    StartOfWeek(u8),
    Language(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateSettingResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub settings: UserSettingsDto,
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeResponse {
    pub dark_mode: bool,
    /// True once the user has chosen a theme, making system changes
    /// non-authoritative
    pub explicit: bool,
}
