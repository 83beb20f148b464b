use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use log::{error, info};
use serde_json::Value;

use crate::io::rest::mappers::settings_mapper;
use crate::AppState;
use shared::{SettingChangeDto, UpdateSettingResponse, UserSettingsDto};

/// Create the settings API router
pub fn router() -> Router<AppState> {
    Router::new().route("/:user_id", get(get_settings).put(update_setting))
}

/// Fetch a user's settings, creating defaults on first access
#[axum::debug_handler]
pub async fn get_settings(
    State(app_state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserSettingsDto>, (StatusCode, Json<Value>)> {
    info!("GET /api/settings/{}", user_id);

    match app_state.settings_service.get_settings(&user_id).await {
        Ok(settings) => Ok(Json(settings_mapper::to_dto(settings))),
        Err(e) => {
            error!("Failed to load settings for {}: {}", user_id, e);
            let error_response = serde_json::json!({
                "error": "Failed to load settings",
                "code": "SETTINGS_ERROR"
            });
            Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)))
        }
    }
}

/// Apply a single field change. The response always carries the settings
/// the client should now display, whether or not the change stuck.
#[axum::debug_handler]
pub async fn update_setting(
    State(app_state): State<AppState>,
    Path(user_id): Path<String>,
    Json(change): Json<SettingChangeDto>,
) -> Result<Json<UpdateSettingResponse>, (StatusCode, Json<Value>)> {
    info!("PUT /api/settings/{} - change: {:?}", user_id, change);

    let success = app_state
        .settings_service
        .update_setting(&user_id, change.into())
        .await;

    match app_state.settings_service.get_settings(&user_id).await {
        Ok(settings) => Ok(Json(UpdateSettingResponse {
            success,
            error: if success {
                None
            } else {
                Some("Setting was not updated".to_string())
            },
            settings: settings_mapper::to_dto(settings),
        })),
        Err(e) => {
            error!("Failed to reload settings for {}: {}", user_id, e);
            let error_response = serde_json::json!({
                "error": "Failed to load settings",
                "code": "SETTINGS_ERROR"
            });
            Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)))
        }
    }
}
