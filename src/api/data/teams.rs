use axum::extract::State;

use crate::api::middleware::BearerAuth;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::infrastructure::gateway::RelayedBody;

/// GET /api/data/teams
pub async fn list_teams(
    State(state): State<AppState>,
    BearerAuth(token): BearerAuth,
) -> Result<RelayedBody, ApiError> {
    Ok(state.gateway.list_teams(token).await?)
}
