use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use tracing::debug;

use crate::config::BackendConfig;
use crate::domain::{BackendClient, DomainError, HttpMethod, RequestEnvelope};

const MAX_ERROR_MESSAGE_LEN: usize = 512;

/// Backend client over HTTP using reqwest
#[derive(Debug, Clone)]
pub struct HttpBackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self, DomainError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        reqwest::Url::parse(&base_url).map_err(|e| {
            DomainError::configuration(format!("Invalid backend base_url '{}': {}", base_url, e))
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
    }
}

/// Pull a human-readable message out of a backend error body
fn backend_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["detail", "error", "message"] {
            if let Some(message) = value.get(key).and_then(|v| v.as_str()) {
                return message.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("Backend request failed")
            .to_string();
    }

    trimmed.chars().take(MAX_ERROR_MESSAGE_LEN).collect()
}

#[async_trait]
impl BackendClient for HttpBackendClient {
    async fn send(&self, envelope: RequestEnvelope) -> Result<Bytes, DomainError> {
        let route = envelope.route();
        let url = self.url(envelope.path());

        let mut request = self
            .client
            .request(to_reqwest_method(envelope.method()), &url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = envelope.auth_token() {
            request = request.header(AUTHORIZATION, token.authorization_value());
        }

        if !envelope.query().is_empty() {
            request = request.query(envelope.query());
        }

        if let Some(body) = envelope.body() {
            request = request.json(body);
        }

        debug!(route = route.name(), url = %url, "Calling backend");

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::transport(format!("{}: {}", route, e)))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::backend(
                status.as_u16(),
                backend_message(&body, status),
            ));
        }

        response
            .bytes()
            .await
            .map_err(|e| DomainError::transport(format!("{}: failed to read body: {}", route, e)))
    }
}
