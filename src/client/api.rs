//! Typed access to the gateway's client-facing routes
//!
//! Responses are parsed here, so a malformed body surfaces as
//! [`DomainError::InvalidResponse`] instead of reaching a store.

use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::types::{codes, ApiErrorResponse};
use crate::domain::{
    BearerToken, CreateAccountResponse, Credentials, DomainError, GenerateLineupParams,
    LineupPayload, LineupsPayload, LoginResponse, RankingEntry, SaveConfirmation, TeamId,
    TeamSummary,
};

/// The calls the client stores make against the gateway
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GatewayApi: Send + Sync {
    async fn create_account(
        &self,
        credentials: Credentials,
    ) -> Result<CreateAccountResponse, DomainError>;

    async fn login(&self, credentials: Credentials) -> Result<LoginResponse, DomainError>;

    async fn list_lineups(
        &self,
        token: BearerToken,
        selected_team: Option<TeamId>,
    ) -> Result<Vec<LineupPayload>, DomainError>;

    async fn generate_lineup(
        &self,
        token: BearerToken,
        params: GenerateLineupParams,
    ) -> Result<LineupPayload, DomainError>;

    async fn save_lineup(
        &self,
        token: BearerToken,
        lineup: LineupPayload,
    ) -> Result<SaveConfirmation, DomainError>;

    async fn list_teams(&self, token: BearerToken) -> Result<Vec<TeamSummary>, DomainError>;

    async fn list_rankings(&self, token: BearerToken) -> Result<Vec<RankingEntry>, DomainError>;
}

/// [`GatewayApi`] over HTTP
#[derive(Debug, Clone)]
pub struct HttpGatewayApi {
    client: Client,
    base_url: String,
}

impl HttpGatewayApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DomainError> {
        let base_url = base_url.trim_end_matches('/').to_string();

        Url::parse(&base_url).map_err(|e| {
            DomainError::configuration(format!("Invalid gateway URL '{}': {}", base_url, e))
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T, DomainError> {
        let response = request
            .send()
            .await
            .map_err(|e| DomainError::transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| DomainError::transport(e.to_string()))?;

        if !status.is_success() {
            return Err(error_from_envelope(status.as_u16(), &body));
        }

        debug!(call = what, bytes = body.len(), "Gateway call succeeded");

        serde_json::from_slice(&body)
            .map_err(|e| DomainError::invalid_response(format!("{}: {}", what, e)))
    }
}

#[async_trait]
impl GatewayApi for HttpGatewayApi {
    async fn create_account(
        &self,
        credentials: Credentials,
    ) -> Result<CreateAccountResponse, DomainError> {
        let request = self
            .client
            .post(self.url("/api/users/create"))
            .json(&credentials);

        self.call(request, "create_account").await
    }

    async fn login(&self, credentials: Credentials) -> Result<LoginResponse, DomainError> {
        let request = self
            .client
            .post(self.url("/api/users/login"))
            .json(&credentials);

        self.call(request, "login").await
    }

    async fn list_lineups(
        &self,
        token: BearerToken,
        selected_team: Option<TeamId>,
    ) -> Result<Vec<LineupPayload>, DomainError> {
        let selected_team = selected_team.map(String::from).unwrap_or_default();
        let request = self
            .client
            .get(self.url("/api/data/lineups"))
            .bearer_auth(token.as_str())
            .query(&[("selected_team", selected_team)]);

        let payload: LineupsPayload = self.call(request, "list_lineups").await?;
        Ok(payload.into_vec())
    }

    async fn generate_lineup(
        &self,
        token: BearerToken,
        params: GenerateLineupParams,
    ) -> Result<LineupPayload, DomainError> {
        let request = self
            .client
            .post(self.url("/api/data/lineups"))
            .bearer_auth(token.as_str())
            .json(&params);

        self.call(request, "generate_lineup").await
    }

    async fn save_lineup(
        &self,
        token: BearerToken,
        lineup: LineupPayload,
    ) -> Result<SaveConfirmation, DomainError> {
        let request = self
            .client
            .put(self.url("/api/data/lineups"))
            .bearer_auth(token.as_str())
            .json(&lineup);

        self.call(request, "save_lineup").await
    }

    async fn list_teams(&self, token: BearerToken) -> Result<Vec<TeamSummary>, DomainError> {
        let request = self
            .client
            .get(self.url("/api/data/teams"))
            .bearer_auth(token.as_str());

        self.call(request, "list_teams").await
    }

    async fn list_rankings(&self, token: BearerToken) -> Result<Vec<RankingEntry>, DomainError> {
        let request = self
            .client
            .get(self.url("/api/data/rankings"))
            .bearer_auth(token.as_str());

        self.call(request, "list_rankings").await
    }
}

/// Turn a gateway error envelope back into the error it was made from
fn error_from_envelope(status: u16, body: &[u8]) -> DomainError {
    let Ok(envelope) = serde_json::from_slice::<ApiErrorResponse>(body) else {
        let text = String::from_utf8_lossy(body).trim().to_string();
        return DomainError::backend(status, text);
    };

    let detail = envelope.error;
    match detail.code.as_deref() {
        Some(codes::MISSING_AUTHORIZATION_TOKEN) => DomainError::MissingCredential,
        Some(codes::BACKEND_UNREACHABLE) => DomainError::transport(detail.message),
        Some(codes::INVALID_BACKEND_RESPONSE) => DomainError::invalid_response(detail.message),
        _ => DomainError::backend(detail.backend_status.unwrap_or(status), detail.message),
    }
}
