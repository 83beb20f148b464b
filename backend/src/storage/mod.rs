//! # Storage Module
//!
//! SQLite persistence for the Pocketbook backend. `DbConnection` owns the
//! pool and creates the schema on connect; the repositories in
//! `repositories/` wrap it with typed operations for each table. The
//! passcode repository carries the operations the original system ran as
//! server-side stored procedures.

pub mod db;
pub mod repositories;

pub use db::DbConnection;
pub use repositories::{
    PasscodeRepository, PreferenceRepository, SettingsRepository, TransactionRepository,
};
