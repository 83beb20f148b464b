//! # REST API Interface Layer
//!
//! HTTP endpoints for theme, passcode, settings and transaction operations.
//! This layer handles:
//! - Request/response serialization against the DTOs in the `shared` crate
//! - Basic input validation before domain layer processing
//! - Error translation from domain results to HTTP status codes
//! - Request logging
//!
//! Business logic never lives here; handlers map DTOs to domain commands,
//! call the service on [`AppState`](crate::AppState), and map the result
//! back.

pub mod mappers;
pub mod passcode_apis;
pub mod settings_apis;
pub mod theme_apis;
pub mod transaction_apis;
