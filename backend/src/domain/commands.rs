//! Domain-level command and result types.
//!
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer maps the public DTOs defined
//! in the `shared` crate to and from these internal types.

pub mod passcode {
    use crate::domain::models::passcode::{
        PasscodeError, LOCKOUT_WINDOW_SECS, MAX_FAILED_ATTEMPTS,
    };

    /// Input for creating a passcode.
    #[derive(Debug, Clone)]
    pub struct SetupPasscodeCommand {
        pub user_id: String,
        pub passcode: String,
    }

    /// Input for verifying a passcode.
    #[derive(Debug, Clone)]
    pub struct VerifyPasscodeCommand {
        pub user_id: String,
        pub passcode: String,
    }

    /// Input for swapping an existing passcode for a new one.
    #[derive(Debug, Clone)]
    pub struct ChangePasscodeCommand {
        pub user_id: String,
        pub current_passcode: String,
        pub new_passcode: String,
    }

    /// Outcome of setup/reset operations.
    #[derive(Debug, Clone, PartialEq)]
    pub struct PasscodeActionResult {
        pub success: bool,
        pub error: Option<String>,
    }

    impl PasscodeActionResult {
        pub fn ok() -> Self {
            Self {
                success: true,
                error: None,
            }
        }

        pub fn failure(error: impl Into<String>) -> Self {
            Self {
                success: false,
                error: Some(error.into()),
            }
        }
    }

    /// Outcome of verify/change operations.
    #[derive(Debug, Clone, PartialEq)]
    pub struct VerifyPasscodeResult {
        pub success: bool,
        pub is_locked: Option<bool>,
        pub attempts_remaining: Option<u32>,
        /// Fixed estimate in seconds, not the actual remaining time
        pub lockout_time_remaining: Option<u64>,
        pub error: Option<String>,
    }

    impl VerifyPasscodeResult {
        pub fn ok() -> Self {
            Self {
                success: true,
                is_locked: None,
                attempts_remaining: None,
                lockout_time_remaining: None,
                error: None,
            }
        }

        pub fn failure(error: impl Into<String>) -> Self {
            Self {
                success: false,
                is_locked: None,
                attempts_remaining: None,
                lockout_time_remaining: None,
                error: Some(error.into()),
            }
        }

        pub fn locked() -> Self {
            Self {
                success: false,
                is_locked: Some(true),
                attempts_remaining: None,
                lockout_time_remaining: Some(LOCKOUT_WINDOW_SECS as u64),
                error: Some(PasscodeError::Locked.to_string()),
            }
        }

        pub fn wrong_code(attempts_remaining: u32) -> Self {
            Self {
                success: false,
                is_locked: None,
                attempts_remaining: Some(attempts_remaining),
                lockout_time_remaining: None,
                error: Some(PasscodeError::IncorrectPasscode.to_string()),
            }
        }
    }

    /// Read-only aggregate of the passcode state machine.
    #[derive(Debug, Clone, PartialEq)]
    pub struct PasscodeStatusResult {
        pub has_passcode: bool,
        pub is_locked: bool,
        pub failed_attempts: u32,
        pub attempts_remaining: u32,
    }

    impl PasscodeStatusResult {
        pub fn no_passcode() -> Self {
            Self {
                has_passcode: false,
                is_locked: false,
                failed_attempts: 0,
                attempts_remaining: MAX_FAILED_ATTEMPTS,
            }
        }
    }
}

pub mod settings {
    use shared::SettingChangeDto;

    /// A single settings field change, applied field-by-field the way the
    /// client issues them.
    #[derive(Debug, Clone, PartialEq)]
    pub enum SettingChange {
        Currency(String),
        Notifications(bool),
        EmailNotifications(bool),
        BiometricAuth(bool),
        StartOfWeek(u8),
        Language(String),
    }

    impl SettingChange {
        /// Field name for logging.
        pub fn field_name(&self) -> &'static str {
            match self {
                SettingChange::Currency(_) => "currency",
                SettingChange::Notifications(_) => "notifications",
                SettingChange::EmailNotifications(_) => "email_notifications",
                SettingChange::BiometricAuth(_) => "biometric_auth",
                SettingChange::StartOfWeek(_) => "start_of_week",
                SettingChange::Language(_) => "language",
            }
        }
    }

    impl From<SettingChangeDto> for SettingChange {
        fn from(dto: SettingChangeDto) -> Self {
            match dto {
                SettingChangeDto::Currency(v) => SettingChange::Currency(v),
                SettingChangeDto::Notifications(v) => SettingChange::Notifications(v),
                SettingChangeDto::EmailNotifications(v) => SettingChange::EmailNotifications(v),
                SettingChangeDto::BiometricAuth(v) => SettingChange::BiometricAuth(v),
                SettingChangeDto::StartOfWeek(v) => SettingChange::StartOfWeek(v),
                SettingChangeDto::Language(v) => SettingChange::Language(v),
            }
        }
    }
}

pub mod transactions {
    use crate::domain::models::transaction::Transaction as DomainTransaction;

    /// Input for recording a deposit or withdrawal. `amount` is always
    /// positive; the service applies the sign.
    #[derive(Debug, Clone)]
    pub struct CreateTransactionCommand {
        pub user_id: String,
        pub description: String,
        pub amount: f64,
        pub date: Option<String>,
    }

    /// Query parameters for listing transactions.
    #[derive(Debug, Clone, Default)]
    pub struct TransactionListQuery {
        pub user_id: String,
        pub after: Option<String>,
        pub limit: Option<u32>,
    }

    /// Generic pagination info returned by list queries.
    #[derive(Debug, Clone, PartialEq)]
    pub struct PaginationInfo {
        pub has_more: bool,
        pub next_cursor: Option<String>,
    }

    /// Result of listing transactions.
    #[derive(Debug, Clone)]
    pub struct TransactionListResult {
        pub transactions: Vec<DomainTransaction>,
        pub pagination: PaginationInfo,
    }
}
