//! Authenticated data routes relayed to the backend

pub mod lineups;
pub mod rankings;
pub mod teams;

use axum::{routing::get, Router};

use crate::api::state::AppState;

/// Routes mounted under `/api/data`
pub fn create_data_router() -> Router<AppState> {
    Router::new()
        .route(
            "/lineups",
            get(lineups::list_lineups)
                .post(lineups::generate_lineup)
                .put(lineups::save_lineup),
        )
        .route("/teams", get(teams::list_teams))
        .route("/rankings", get(rankings::list_rankings))
}
