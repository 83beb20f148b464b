//! # Domain Layer
//!
//! Business logic for Pocketbook. Services in this module own all rules
//! around passcodes, themes, settings and transactions; the IO layer above
//! translates DTOs, the storage layer below persists rows.

pub mod biometric;
pub mod commands;
pub mod events;
pub mod models;
pub mod passcode_service;
pub mod settings_service;
pub mod theme_service;
pub mod transaction_service;

pub use passcode_service::PasscodeService;
pub use settings_service::SettingsService;
pub use theme_service::{NoSystemTheme, SystemThemeProvider, ThemeService};
pub use transaction_service::TransactionService;
