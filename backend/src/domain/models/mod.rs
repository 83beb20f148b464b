pub mod passcode;
pub mod settings;
pub mod theme;
pub mod transaction;
