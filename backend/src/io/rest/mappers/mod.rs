//! DTO conversion between domain types and the `shared` crate.

pub mod settings_mapper;
pub mod transaction_mapper;
