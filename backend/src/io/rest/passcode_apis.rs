use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use log::info;
use serde_json::Value;

use crate::domain::commands::passcode::{
    ChangePasscodeCommand, SetupPasscodeCommand, VerifyPasscodeCommand,
};
use crate::AppState;
use shared::{
    ChangePasscodeRequest, PasscodeActionResponse, PasscodeStatusResponse, ResetPasscodeRequest,
    SetupPasscodeRequest, VerifyPasscodeRequest, VerifyPasscodeResponse,
};

/// Create the passcode API router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/setup", post(setup_passcode))
        .route("/verify", post(verify_passcode))
        .route("/change", post(change_passcode))
        .route("/reset", post(reset_passcode))
        .route("/status/:user_id", get(get_passcode_status))
}

fn invalid_input(message: &str) -> (StatusCode, Json<Value>) {
    let error_response = serde_json::json!({
        "error": message,
        "code": "INVALID_INPUT"
    });
    (StatusCode::BAD_REQUEST, Json(error_response))
}

/// Set up a passcode for a user that has none yet
#[axum::debug_handler]
pub async fn setup_passcode(
    State(app_state): State<AppState>,
    Json(request): Json<SetupPasscodeRequest>,
) -> Result<Json<PasscodeActionResponse>, (StatusCode, Json<Value>)> {
    info!("POST /api/passcode/setup - user: {}", request.user_id);

    if request.user_id.trim().is_empty() {
        return Err(invalid_input("User id cannot be empty"));
    }

    let result = app_state
        .passcode_service
        .setup_passcode(SetupPasscodeCommand {
            user_id: request.user_id,
            passcode: request.passcode,
        })
        .await;

    Ok(Json(PasscodeActionResponse {
        success: result.success,
        error: result.error,
    }))
}

/// Verify a passcode attempt, tracking failures and the lockout window
#[axum::debug_handler]
pub async fn verify_passcode(
    State(app_state): State<AppState>,
    Json(request): Json<VerifyPasscodeRequest>,
) -> Result<Json<VerifyPasscodeResponse>, (StatusCode, Json<Value>)> {
    info!("POST /api/passcode/verify - user: {}", request.user_id);

    if request.user_id.trim().is_empty() {
        return Err(invalid_input("User id cannot be empty"));
    }

    let result = app_state
        .passcode_service
        .verify_passcode(VerifyPasscodeCommand {
            user_id: request.user_id,
            passcode: request.passcode,
        })
        .await;

    Ok(Json(VerifyPasscodeResponse {
        success: result.success,
        is_locked: result.is_locked,
        attempts_remaining: result.attempts_remaining,
        lockout_time_remaining: result.lockout_time_remaining,
        error: result.error,
    }))
}

/// Swap an existing passcode for a new one after verifying the current one
#[axum::debug_handler]
pub async fn change_passcode(
    State(app_state): State<AppState>,
    Json(request): Json<ChangePasscodeRequest>,
) -> Result<Json<VerifyPasscodeResponse>, (StatusCode, Json<Value>)> {
    info!("POST /api/passcode/change - user: {}", request.user_id);

    if request.user_id.trim().is_empty() {
        return Err(invalid_input("User id cannot be empty"));
    }

    let result = app_state
        .passcode_service
        .change_passcode(ChangePasscodeCommand {
            user_id: request.user_id,
            current_passcode: request.current_passcode,
            new_passcode: request.new_passcode,
        })
        .await;

    Ok(Json(VerifyPasscodeResponse {
        success: result.success,
        is_locked: result.is_locked,
        attempts_remaining: result.attempts_remaining,
        lockout_time_remaining: result.lockout_time_remaining,
        error: result.error,
    }))
}

/// Remove a user's passcode entirely
#[axum::debug_handler]
pub async fn reset_passcode(
    State(app_state): State<AppState>,
    Json(request): Json<ResetPasscodeRequest>,
) -> Result<Json<PasscodeActionResponse>, (StatusCode, Json<Value>)> {
    info!("POST /api/passcode/reset - user: {}", request.user_id);

    if request.user_id.trim().is_empty() {
        return Err(invalid_input("User id cannot be empty"));
    }

    let result = app_state.passcode_service.reset_passcode(&request.user_id).await;

    Ok(Json(PasscodeActionResponse {
        success: result.success,
        error: result.error,
    }))
}

/// Read-only passcode state for a user
#[axum::debug_handler]
pub async fn get_passcode_status(
    State(app_state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<PasscodeStatusResponse> {
    info!("GET /api/passcode/status/{}", user_id);

    let status = app_state.passcode_service.get_passcode_status(&user_id).await;

    Json(PasscodeStatusResponse {
        has_passcode: status.has_passcode,
        is_locked: status.is_locked,
        failed_attempts: status.failed_attempts,
        attempts_remaining: status.attempts_remaining,
    })
}
