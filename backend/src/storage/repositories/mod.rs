pub mod passcode_repository;
pub mod preference_repository;
pub mod settings_repository;
pub mod transaction_repository;

pub use passcode_repository::PasscodeRepository;
pub use preference_repository::PreferenceRepository;
pub use settings_repository::SettingsRepository;
pub use transaction_repository::TransactionRepository;
