use axum::{extract::State, response::Json, routing::{get, post}, Router};
use log::info;

use crate::AppState;
use shared::ThemeResponse;

/// Create the theme API router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_theme))
        .route("/toggle", post(toggle_theme))
}

/// Current dark/light state
#[axum::debug_handler]
pub async fn get_theme(State(app_state): State<AppState>) -> Json<ThemeResponse> {
    info!("GET /api/theme");

    let state = app_state.theme_service.current().await;
    Json(ThemeResponse {
        dark_mode: state.dark_mode,
        explicit: state.explicit,
    })
}

/// Flip dark/light and pin the result as an explicit choice
#[axum::debug_handler]
pub async fn toggle_theme(State(app_state): State<AppState>) -> Json<ThemeResponse> {
    info!("POST /api/theme/toggle");

    let state = app_state.theme_service.toggle().await;
    Json(ThemeResponse {
        dark_mode: state.dark_mode,
        explicit: state.explicit,
    })
}
