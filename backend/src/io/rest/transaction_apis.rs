use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use log::{error, info};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::commands::transactions::{CreateTransactionCommand, TransactionListQuery};
use crate::io::rest::mappers::transaction_mapper;
use crate::AppState;
use shared::{
    BalanceResponse, CreateTransactionRequest, Transaction as TransactionDto,
    TransactionListResponse, TransactionType,
};

/// Create the transaction API router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_transactions).post(create_transaction))
        .route("/balance/:user_id", get(get_balance))
}

/// Query parameters for the transaction list endpoint
#[derive(Deserialize, Debug)]
pub struct ListQuery {
    pub user_id: String,
    pub after: Option<String>,
    pub limit: Option<u32>,
}

/// List a user's transactions newest-first with cursor pagination
#[axum::debug_handler]
pub async fn list_transactions(
    State(app_state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<TransactionListResponse>, (StatusCode, Json<Value>)> {
    info!("GET /api/transactions - query: {:?}", query);

    let result = app_state
        .transaction_service
        .list_transactions(TransactionListQuery {
            user_id: query.user_id,
            after: query.after,
            limit: query.limit,
        })
        .await;

    match result {
        Ok(list) => Ok(Json(transaction_mapper::to_list_response(list))),
        Err(e) => {
            error!("Error listing transactions: {:?}", e);
            let error_response = serde_json::json!({
                "error": "Error listing transactions",
                "code": "LIST_ERROR"
            });
            Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)))
        }
    }
}

/// Record a deposit or withdrawal
#[axum::debug_handler]
pub async fn create_transaction(
    State(app_state): State<AppState>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionDto>), (StatusCode, Json<Value>)> {
    info!("POST /api/transactions - request: {:?}", request);

    let command = CreateTransactionCommand {
        user_id: request.user_id,
        description: request.description,
        amount: request.amount,
        date: request.date,
    };

    let result = match request.transaction_type {
        TransactionType::Deposit => app_state.transaction_service.record_deposit(command).await,
        TransactionType::Withdrawal => {
            app_state
                .transaction_service
                .record_withdrawal(command)
                .await
        }
    };

    match result {
        Ok(transaction) => Ok((
            StatusCode::CREATED,
            Json(transaction_mapper::to_dto(transaction)),
        )),
        Err(e) => {
            error!("Error creating transaction: {:?}", e);
            let error_response = serde_json::json!({
                "error": e.to_string(),
                "code": "INVALID_INPUT"
            });
            Err((StatusCode::BAD_REQUEST, Json(error_response)))
        }
    }
}

/// Current balance for a user
#[axum::debug_handler]
pub async fn get_balance(
    State(app_state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<BalanceResponse>, (StatusCode, Json<Value>)> {
    info!("GET /api/transactions/balance/{}", user_id);

    match app_state.transaction_service.get_balance(&user_id).await {
        Ok(balance) => Ok(Json(BalanceResponse { user_id, balance })),
        Err(e) => {
            error!("Error computing balance: {:?}", e);
            let error_response = serde_json::json!({
                "error": "Error computing balance",
                "code": "BALANCE_ERROR"
            });
            Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::setup_test_state;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use serde_json::json;
    use tower::util::ServiceExt; // for `oneshot`

    async fn setup_test_app() -> Router {
        router().with_state(setup_test_state().await)
    }

    async fn post_json(app: &Router, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let app = setup_test_app().await;

        let (status, body) = post_json(
            &app,
            json!({
                "user_id": "user-1",
                "description": "Pocket money",
                "amount": 20.0,
                "transaction_type": "Deposit",
                "date": null
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["balance"], 20.0);

        let (status, body) = post_json(
            &app,
            json!({
                "user_id": "user-1",
                "description": "Comic book",
                "amount": 7.5,
                "transaction_type": "Withdrawal",
                "date": null
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["amount"], -7.5);
        assert_eq!(body["balance"], 12.5);

        let (status, body) = get_json(&app, "/?user_id=user-1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["transactions"].as_array().unwrap().len(), 2);
        assert_eq!(body["pagination"]["has_more"], false);

        let (status, body) = get_json(&app, "/balance/user-1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["balance"], 12.5);
    }

    #[tokio::test]
    async fn test_validation_error_returns_400() {
        let app = setup_test_app().await;

        let (status, body) = post_json(
            &app,
            json!({
                "user_id": "user-1",
                "description": "",
                "amount": 10.0,
                "transaction_type": "Deposit",
                "date": null
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_balance_for_unknown_user_is_zero() {
        let app = setup_test_app().await;

        let (status, body) = get_json(&app, "/balance/nobody").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["balance"], 0.0);
    }
}
