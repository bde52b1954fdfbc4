//! Lineup endpoints

use axum::extract::{Query, State};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::api::middleware::BearerAuth;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::infrastructure::gateway::RelayedBody;

#[derive(Debug, Default, Deserialize)]
pub struct ListLineupsQuery {
    #[serde(default)]
    pub selected_team: Option<String>,
}

/// GET /api/data/lineups?selected_team=<id>
pub async fn list_lineups(
    State(state): State<AppState>,
    BearerAuth(token): BearerAuth,
    Query(query): Query<ListLineupsQuery>,
) -> Result<RelayedBody, ApiError> {
    debug!(selected_team = ?query.selected_team, "Listing lineups");

    let body = state
        .gateway
        .list_lineups(token, query.selected_team)
        .await?;

    Ok(body)
}

/// POST /api/data/lineups
///
/// The body is parsed only after the token check, so an anonymous caller
/// always gets the missing-token error.
pub async fn generate_lineup(
    State(state): State<AppState>,
    auth: BearerAuth,
    body: Bytes,
) -> Result<RelayedBody, ApiError> {
    let token = auth.required()?;
    let Json(payload) = Json::<Value>::from_bytes(&body)?;
    debug!("Generating lineup");

    Ok(state.gateway.generate_lineup(Some(token), payload).await?)
}

/// PUT /api/data/lineups
pub async fn save_lineup(
    State(state): State<AppState>,
    auth: BearerAuth,
    body: Bytes,
) -> Result<RelayedBody, ApiError> {
    let token = auth.required()?;
    let Json(payload) = Json::<Value>::from_bytes(&body)?;
    debug!("Saving lineup");

    Ok(state.gateway.save_lineup(Some(token), payload).await?)
}
