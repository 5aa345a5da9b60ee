//! Accounts service routes

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::{
    AppState,
    error::AccountError,
    models::{LoginRequest, RegisterRequest, UpdateRequest},
};

/// Create the router for the accounts service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/users", get(get_users))
        .route("/api/users/login", post(login))
        .route("/api/users/register", post(register))
        .route(
            "/api/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "accounts-service"
    }))
}

/// List every user
pub async fn get_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let users = state.account_service.get_all().await?;
    Ok(Json(users))
}

/// Get a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.account_service.get_by_id(id).await?;
    Ok(Json(user))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.account_service.login(&payload).await?;
    Ok(Json(user))
}

/// User registration endpoint
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.account_service.register(&payload).await?;
    Ok(Json(user))
}

/// Update a user
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.account_service.update(id, &payload).await?;
    Ok(Json(user))
}

/// Delete a user
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.account_service.delete(id).await?;
    Ok(StatusCode::OK)
}

/// Error type for the HTTP layer
#[derive(Error, Debug)]
pub enum ApiError {
    /// Invalid or conflicting input
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing resource
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation(_) => ApiError::BadRequest(err.to_string()),
            AccountError::NotFound(_) => ApiError::NotFound(err.to_string()),
            AccountError::Store(_) | AccountError::Hashing(_) => {
                error!("Account operation failed: {}", err);
                ApiError::InternalServerError
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationKind;
    use crate::store::StoreError;

    #[test]
    fn test_account_errors_map_to_outcome_classes() {
        let err = ApiError::from(AccountError::from(ValidationKind::UsernameTaken));
        assert!(matches!(err, ApiError::BadRequest(ref msg) if msg == "Username is already taken"));

        let err = ApiError::from(AccountError::NotFound(None));
        assert!(matches!(err, ApiError::NotFound(ref msg) if msg == "This user does not exist"));

        let err = ApiError::from(AccountError::Store(StoreError::Database(
            sqlx::Error::PoolTimedOut,
        )));
        assert!(matches!(err, ApiError::InternalServerError));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::BadRequest("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::InternalServerError.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
