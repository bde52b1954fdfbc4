//! Bearer token extraction

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use crate::api::types::ApiError;
use crate::domain::BearerToken;

/// The caller's bearer token, if one could be extracted.
///
/// Never rejects; the gateway decides whether a route needs the token so a
/// missing one is refused before any backend contact.
#[derive(Debug, Clone)]
pub struct BearerAuth(pub Option<BearerToken>);

impl BearerAuth {
    /// The token, or the missing-token error for routes that read a body
    /// only once the caller is known to be authenticated
    pub fn required(self) -> Result<BearerToken, ApiError> {
        self.0.ok_or_else(ApiError::missing_token)
    }
}

impl<S> FromRequestParts<S> for BearerAuth
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(BearerAuth(extract_bearer_token(&parts.headers)))
    }
}

/// Extract a bearer token from the `Authorization` header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<BearerToken> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(BearerToken::from_authorization_header)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer eyJhbGciOi.test".parse().unwrap());

        let token = extract_bearer_token(&headers).unwrap();
        assert_eq!(token.as_str(), "eyJhbGciOi.test");
    }

    #[test]
    fn test_missing_header() {
        assert!(extract_bearer_token(&HeaderMap::new()).is_none());
    }

    #[test]
    fn test_other_scheme_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());

        assert!(extract_bearer_token(&headers).is_none());
    }

    #[test]
    fn test_required_token() {
        let token = BearerToken::new("abc").unwrap();
        assert_eq!(BearerAuth(Some(token)).required().unwrap().as_str(), "abc");

        let err = BearerAuth(None).required().unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_scheme_without_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer".parse().unwrap());

        assert!(extract_bearer_token(&headers).is_none());
    }
}
