//! # Pocketbook Backend
//!
//! Non-UI logic for the Pocketbook personal finance application.
//!
//! The backend follows a layered architecture:
//! ```text
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (Business logic, services)
//!     ↓
//! Storage Layer (Database, persistence)
//! ```
//!
//! Services are constructed once at startup and handed to the router through
//! [`AppState`]; nothing in the domain layer reaches for global state.

pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use log::info;
use tower_http::cors::{Any, CorsLayer};

use crate::domain::biometric::{BiometricCapability, NoBiometrics};
use crate::domain::events::EventBus;
use crate::domain::{PasscodeService, SettingsService, ThemeService, TransactionService};
use crate::storage::DbConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub theme_service: ThemeService,
    pub passcode_service: PasscodeService,
    pub settings_service: SettingsService,
    pub transaction_service: TransactionService,
    pub events: EventBus,
}

/// Initialize the backend with the on-disk database and no biometric
/// hardware.
pub async fn initialize_backend() -> Result<AppState> {
    info!("Setting up database");
    let db = DbConnection::init().await?;
    Ok(build_state(db, Arc::new(NoBiometrics)))
}

/// Initialize the backend against an existing database connection and a
/// platform-specific biometric capability.
pub fn initialize_backend_with(
    db: DbConnection,
    biometrics: Arc<dyn BiometricCapability>,
) -> AppState {
    build_state(db, biometrics)
}

fn build_state(db: DbConnection, biometrics: Arc<dyn BiometricCapability>) -> AppState {
    info!("Setting up domain services");
    let events = EventBus::new();
    AppState {
        theme_service: ThemeService::new(db.clone(), events.clone()),
        passcode_service: PasscodeService::new(db.clone()),
        settings_service: SettingsService::new(db.clone(), biometrics, events.clone()),
        transaction_service: TransactionService::new(db),
        events,
    }
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    // CORS setup to allow the frontend dev server to make requests
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:8080".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .nest("/theme", io::rest::theme_apis::router())
        .nest("/passcode", io::rest::passcode_apis::router())
        .nest("/settings", io::rest::settings_apis::router())
        .nest("/transactions", io::rest::transaction_apis::router());

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}
