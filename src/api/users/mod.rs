//! Account endpoints. These are the only relayed routes that take no token.

use axum::{extract::State, routing::post, Router};
use serde_json::Value;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::infrastructure::gateway::RelayedBody;

/// Routes mounted under `/api/users`
pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_account))
        .route("/login", post(login))
}

/// POST /api/users/create
pub async fn create_account(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<RelayedBody, ApiError> {
    debug!("Creating account");

    Ok(state.gateway.create_account(payload).await?)
}

/// POST /api/users/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<RelayedBody, ApiError> {
    debug!("Logging in");

    Ok(state.gateway.login(payload).await?)
}
