//! Sign-in / sign-up input and the business outcomes the backend reports

use serde::{Deserialize, Serialize};

use super::validation::{
    validate_email, validate_password, validate_password_confirmation, AccountValidationError,
};
use crate::domain::session::BearerToken;
use crate::domain::DomainError;

/// Email and password pair sent to `/users/create` and `/users/login`
#[derive(Clone, PartialEq, Serialize)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    /// Create validated credentials
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, AccountValidationError> {
        let email = email.into().trim().to_string();
        let password = password.into();

        validate_email(&email)?;
        validate_password(&password)?;

        Ok(Self { email, password })
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Raw contents of the sign-in drawer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// What a submitted form asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountIntent {
    Login,
    CreateAccount,
}

impl AccountForm {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    /// A filled-in confirmation field means the user is signing up
    pub fn intent(&self) -> AccountIntent {
        if self.confirm_password.is_empty() {
            AccountIntent::Login
        } else {
            AccountIntent::CreateAccount
        }
    }

    /// Credentials for account creation; the confirmation is checked first
    pub fn new_account_credentials(&self) -> Result<Credentials, AccountValidationError> {
        validate_password_confirmation(&self.password, &self.confirm_password)?;
        Credentials::new(self.email.as_str(), self.password.as_str())
    }

    /// Credentials for login
    pub fn login_credentials(&self) -> Result<Credentials, AccountValidationError> {
        Credentials::new(self.email.as_str(), self.password.as_str())
    }
}

/// Backend reply to `/users/create`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAccountResponse {
    pub already_exists: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl CreateAccountResponse {
    /// Token for the new account. Only meaningful when the account did not exist.
    pub fn token(&self) -> Result<BearerToken, DomainError> {
        require_token(self.access_token.as_deref(), "account creation")
    }
}

/// Backend reply to `/users/login`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl LoginResponse {
    /// Token for a successful login
    pub fn token(&self) -> Result<BearerToken, DomainError> {
        require_token(self.access_token.as_deref(), "login")
    }
}

fn require_token(raw: Option<&str>, operation: &str) -> Result<BearerToken, DomainError> {
    let raw = raw.ok_or_else(|| {
        DomainError::invalid_response(format!("{} succeeded without an access_token", operation))
    })?;

    BearerToken::new(raw).map_err(|_| {
        DomainError::invalid_response(format!("{} returned an unusable access_token", operation))
    })
}

/// Result of a login attempt that reached the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated,
    Rejected,
    /// A later login or logout was issued before this one resolved
    Superseded,
}

/// Result of an account creation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountOutcome {
    Created,
    AlreadyExists,
    PasswordsDoNotMatch,
    Superseded,
}

/// User-visible flags raised by the sign-in drawer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthFlags {
    pub failed_login: bool,
    pub not_matching_passwords: bool,
    pub already_exists: bool,
}
