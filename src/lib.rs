//! Court Vision gateway
//!
//! Client-facing layer of a fantasy-basketball lineup assistant:
//! - an authenticated HTTP gateway that relays JSON from the backend data service
//! - client-side session and domain stores (teams, lineups, rankings)
//! - the dashboard page selection that renders them

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use axum::Router;

use api::state::AppState;
use infrastructure::backend::HttpBackendClient;
use infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Build application state from configuration
pub fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let backend = HttpBackendClient::new(&config.backend)?;
    tracing::info!(base_url = %backend.base_url(), "Backend client configured");

    Ok(AppState::new(Arc::new(backend)))
}

/// Full HTTP application: gateway routes plus the metrics endpoint when enabled
pub fn create_app(config: &AppConfig, state: AppState, metrics: Option<PrometheusMetrics>) -> Router {
    let router = api::create_router_with_state(state, &config.server);

    match metrics {
        Some(metrics) => router.merge(create_metrics_router(metrics, &config.metrics.path)),
        None => router,
    }
}
