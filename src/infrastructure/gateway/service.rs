//! Authenticated pass-through to the backend data service
//!
//! The gateway is stateless: every call builds a fresh [`RequestEnvelope`],
//! sends it once, and relays the backend body unchanged. No retries, no cache.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::{BackendClient, BackendRoute, BearerToken, DomainError, RequestEnvelope};
use crate::infrastructure::observability::{record_backend_call, BackendOutcome};

/// A backend JSON body, exactly as received
#[derive(Debug, Clone, PartialEq)]
pub struct RelayedBody(Bytes);

impl RelayedBody {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

/// Gateway service relaying client requests to the backend
#[derive(Clone)]
pub struct GatewayService {
    backend: Arc<dyn BackendClient>,
}

impl GatewayService {
    pub fn new(backend: Arc<dyn BackendClient>) -> Self {
        Self { backend }
    }

    /// `GET /lineups?selected_team=<id-or-empty>`
    pub async fn list_lineups(
        &self,
        token: Option<BearerToken>,
        selected_team: Option<String>,
    ) -> Result<RelayedBody, DomainError> {
        let envelope = envelope_for(BackendRoute::ListLineups, token)?
            .with_query("selected_team", selected_team.unwrap_or_default());

        self.relay(envelope).await
    }

    /// `POST /lineups/generate`
    pub async fn generate_lineup(
        &self,
        token: Option<BearerToken>,
        payload: Value,
    ) -> Result<RelayedBody, DomainError> {
        let envelope = envelope_for(BackendRoute::GenerateLineup, token)?.with_body(payload);
        self.relay(envelope).await
    }

    /// `PUT /lineups/save`
    pub async fn save_lineup(
        &self,
        token: Option<BearerToken>,
        payload: Value,
    ) -> Result<RelayedBody, DomainError> {
        let envelope = envelope_for(BackendRoute::SaveLineup, token)?.with_body(payload);
        self.relay(envelope).await
    }

    /// `GET /teams`
    pub async fn list_teams(&self, token: Option<BearerToken>) -> Result<RelayedBody, DomainError> {
        let envelope = envelope_for(BackendRoute::ListTeams, token)?;
        self.relay(envelope).await
    }

    /// `GET /rankings`
    pub async fn list_rankings(
        &self,
        token: Option<BearerToken>,
    ) -> Result<RelayedBody, DomainError> {
        let envelope = envelope_for(BackendRoute::ListRankings, token)?;
        self.relay(envelope).await
    }

    /// `POST /users/create`
    pub async fn create_account(&self, payload: Value) -> Result<RelayedBody, DomainError> {
        let envelope = RequestEnvelope::anonymous(BackendRoute::CreateAccount)?.with_body(payload);
        self.relay(envelope).await
    }

    /// `POST /users/login`
    pub async fn login(&self, payload: Value) -> Result<RelayedBody, DomainError> {
        let envelope = RequestEnvelope::anonymous(BackendRoute::Login)?.with_body(payload);
        self.relay(envelope).await
    }

    async fn relay(&self, envelope: RequestEnvelope) -> Result<RelayedBody, DomainError> {
        let route = envelope.route();
        let start = Instant::now();

        let result = self.backend.send(envelope).await.and_then(ensure_json);
        let elapsed = start.elapsed();

        match &result {
            Ok(body) => {
                record_backend_call(route, BackendOutcome::Success, elapsed);
                info!(
                    route = route.name(),
                    bytes = body.as_bytes().len(),
                    duration_ms = %elapsed.as_millis(),
                    "Backend call succeeded"
                );
            }
            Err(e) => {
                record_backend_call(route, outcome_of(e), elapsed);
                warn!(
                    route = route.name(),
                    backend_status = ?e.backend_status(),
                    error = %e,
                    "Backend call failed"
                );
            }
        }

        result
    }
}

fn envelope_for(
    route: BackendRoute,
    token: Option<BearerToken>,
) -> Result<RequestEnvelope, DomainError> {
    match token {
        Some(token) => Ok(RequestEnvelope::authenticated(route, token)),
        None => RequestEnvelope::anonymous(route).inspect_err(|_| {
            record_backend_call(route, BackendOutcome::Rejected, Default::default());
            warn!(route = route.name(), "No authorization token");
        }),
    }
}

fn ensure_json(bytes: Bytes) -> Result<RelayedBody, DomainError> {
    serde_json::from_slice::<serde::de::IgnoredAny>(&bytes)
        .map_err(|e| DomainError::invalid_response(format!("Backend body is not JSON: {}", e)))?;

    Ok(RelayedBody(bytes))
}

fn outcome_of(error: &DomainError) -> BackendOutcome {
    match error {
        DomainError::Backend { .. } => BackendOutcome::BackendError,
        DomainError::Transport { .. } => BackendOutcome::Unreachable,
        DomainError::InvalidResponse { .. } => BackendOutcome::InvalidResponse,
        _ => BackendOutcome::BackendError,
    }
}
