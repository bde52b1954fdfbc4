//! Account form validation
//!
//! These rules run locally, before any network call.

use thiserror::Error;

/// Errors that can occur while validating sign-in and sign-up input
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AccountValidationError {
    #[error("Email cannot be empty")]
    EmptyEmail,

    #[error("Email must contain '@'")]
    InvalidEmail,

    #[error("Password cannot be empty")]
    EmptyPassword,

    #[error("Passwords do not match")]
    PasswordsDoNotMatch,
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), AccountValidationError> {
    let email = email.trim();

    if email.is_empty() {
        return Err(AccountValidationError::EmptyEmail);
    }

    if !email.contains('@') {
        return Err(AccountValidationError::InvalidEmail);
    }

    Ok(())
}

/// Validate a password
pub fn validate_password(password: &str) -> Result<(), AccountValidationError> {
    if password.is_empty() {
        return Err(AccountValidationError::EmptyPassword);
    }

    Ok(())
}

/// Validate that a password and its confirmation are identical
pub fn validate_password_confirmation(
    password: &str,
    confirm_password: &str,
) -> Result<(), AccountValidationError> {
    if password != confirm_password {
        return Err(AccountValidationError::PasswordsDoNotMatch);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("  coach@league.io ").is_ok());
    }

    #[test]
    fn test_invalid_email() {
        assert_eq!(validate_email(""), Err(AccountValidationError::EmptyEmail));
        assert_eq!(validate_email("   "), Err(AccountValidationError::EmptyEmail));
        assert_eq!(
            validate_email("no-at-sign"),
            Err(AccountValidationError::InvalidEmail)
        );
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("x").is_ok());
        assert_eq!(validate_password(""), Err(AccountValidationError::EmptyPassword));
    }

    #[test]
    fn test_password_confirmation() {
        assert!(validate_password_confirmation("x", "x").is_ok());
        assert_eq!(
            validate_password_confirmation("x", "y"),
            Err(AccountValidationError::PasswordsDoNotMatch)
        );
    }
}
