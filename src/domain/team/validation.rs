//! Team validation

use thiserror::Error;

/// Errors that can occur during team validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TeamValidationError {
    #[error("Team ID cannot be empty")]
    EmptyId,

    #[error("Team ID cannot exceed {0} characters")]
    IdTooLong(usize),

    #[error("Team ID cannot contain whitespace or control characters")]
    InvalidIdCharacters,
}

const MAX_TEAM_ID_LENGTH: usize = 64;

/// Validate a team ID
pub fn validate_team_id(id: &str) -> Result<(), TeamValidationError> {
    if id.is_empty() {
        return Err(TeamValidationError::EmptyId);
    }

    if id.len() > MAX_TEAM_ID_LENGTH {
        return Err(TeamValidationError::IdTooLong(MAX_TEAM_ID_LENGTH));
    }

    if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(TeamValidationError::InvalidIdCharacters);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_team_id() {
        assert!(validate_team_id("team42").is_ok());
        assert!(validate_team_id("1029384").is_ok());
        assert!(validate_team_id("my-team_2").is_ok());
    }

    #[test]
    fn test_empty_team_id() {
        assert_eq!(validate_team_id(""), Err(TeamValidationError::EmptyId));
    }

    #[test]
    fn test_team_id_too_long() {
        let id = "a".repeat(65);
        assert_eq!(
            validate_team_id(&id),
            Err(TeamValidationError::IdTooLong(64))
        );
    }

    #[test]
    fn test_team_id_with_whitespace() {
        assert_eq!(
            validate_team_id("team 42"),
            Err(TeamValidationError::InvalidIdCharacters)
        );
    }
}
