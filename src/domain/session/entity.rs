//! Bearer token and session types

use crate::domain::DomainError;

/// Opaque credential proving the caller's identity to the backend
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Create a token from its raw value
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(DomainError::validation("Bearer token cannot be empty"));
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(DomainError::validation(
                "Bearer token cannot contain whitespace",
            ));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Parse the value of an `Authorization` header.
    ///
    /// Only the `Bearer` scheme is accepted. Returns `None` when no usable
    /// token is present.
    pub fn from_authorization_header(value: &str) -> Option<Self> {
        let (scheme, token) = value.trim().split_once(' ')?;

        if !scheme.eq_ignore_ascii_case("bearer") {
            return None;
        }

        Self::new(token).ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for an outgoing `Authorization` header
    pub fn authorization_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

/// Authentication status of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Anonymous,
    Authenticated,
}

/// The live session of one browser tab
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    token: Option<BearerToken>,
    epoch: u64,
}

impl Session {
    /// A fresh anonymous session
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<&BearerToken> {
        self.token.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn status(&self) -> SessionStatus {
        if self.is_authenticated() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Anonymous
        }
    }

    /// Identity generation; changes on every login and logout
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Transition to `Authenticated` with the given token
    pub fn authenticated(&self, token: BearerToken) -> Self {
        Self {
            token: Some(token),
            epoch: self.epoch + 1,
        }
    }

    /// Transition to `Anonymous`
    pub fn cleared(&self) -> Self {
        Self {
            token: None,
            epoch: self.epoch + 1,
        }
    }
}
