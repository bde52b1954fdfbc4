//! Per-call request envelope
//!
//! An envelope is built for exactly one backend call and consumed by it.
//! It is deliberately not `Clone`.

use serde_json::Value;

use super::route::{BackendRoute, HttpMethod};
use crate::domain::session::BearerToken;
use crate::domain::DomainError;

#[derive(Debug)]
pub struct RequestEnvelope {
    route: BackendRoute,
    auth_token: Option<BearerToken>,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl RequestEnvelope {
    /// Envelope carrying the caller's bearer token
    pub fn authenticated(route: BackendRoute, token: BearerToken) -> Self {
        Self {
            route,
            auth_token: Some(token),
            query: Vec::new(),
            body: None,
        }
    }

    /// Envelope without a token; refused for routes that need one
    pub fn anonymous(route: BackendRoute) -> Result<Self, DomainError> {
        if route.requires_auth() {
            return Err(DomainError::MissingCredential);
        }

        Ok(Self {
            route,
            auth_token: None,
            query: Vec::new(),
            body: None,
        })
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn route(&self) -> BackendRoute {
        self.route
    }

    pub fn method(&self) -> HttpMethod {
        self.route.method()
    }

    pub fn path(&self) -> &'static str {
        self.route.path()
    }

    pub fn auth_token(&self) -> Option<&BearerToken> {
        self.auth_token.as_ref()
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_envelope_refused_for_protected_route() {
        let result = RequestEnvelope::anonymous(BackendRoute::GenerateLineup);
        assert_eq!(result.unwrap_err(), DomainError::MissingCredential);
    }

    #[test]
    fn test_anonymous_envelope_allowed_for_login() {
        let envelope = RequestEnvelope::anonymous(BackendRoute::Login).unwrap();
        assert!(envelope.auth_token().is_none());
        assert_eq!(envelope.path(), "/users/login");
    }

    #[test]
    fn test_authenticated_envelope_carries_query_and_body() {
        let token = BearerToken::new("tok").unwrap();
        let envelope = RequestEnvelope::authenticated(BackendRoute::ListLineups, token)
            .with_query("selected_team", "team42")
            .with_body(serde_json::json!({"a": 1}));

        assert_eq!(envelope.method(), HttpMethod::Get);
        assert_eq!(envelope.auth_token().unwrap().as_str(), "tok");
        assert_eq!(
            envelope.query(),
            &[("selected_team".to_string(), "team42".to_string())]
        );
        assert_eq!(envelope.body(), Some(&serde_json::json!({"a": 1})));
    }
}
