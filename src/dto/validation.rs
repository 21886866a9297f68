//! Validation helpers for DTOs.

use validator::ValidationError;

const NICKNAME_MAX_CHARS: usize = 32;

/// Validates a player nickname: non-blank, at most 32 characters, and free of
/// control characters.
pub fn validate_nickname(nickname: &str) -> Result<(), ValidationError> {
    if nickname.trim().is_empty() {
        let mut err = ValidationError::new("nickname_blank");
        err.message = Some("Nickname must not be blank".into());
        return Err(err);
    }

    if nickname.chars().count() > NICKNAME_MAX_CHARS {
        let mut err = ValidationError::new("nickname_length");
        err.message =
            Some(format!("Nickname must be at most {NICKNAME_MAX_CHARS} characters").into());
        return Err(err);
    }

    if nickname.chars().any(char::is_control) {
        let mut err = ValidationError::new("nickname_format");
        err.message = Some("Nickname must not contain control characters".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_reasonable_nicknames() {
        assert!(validate_nickname("alice").is_ok());
        assert!(validate_nickname("Bob the 2nd").is_ok());
        assert!(validate_nickname("ñandú").is_ok());
    }

    #[test]
    fn rejects_blank_nicknames() {
        assert!(validate_nickname("").is_err());
        assert!(validate_nickname("   ").is_err());
    }

    #[test]
    fn rejects_oversized_nicknames() {
        let long = "x".repeat(NICKNAME_MAX_CHARS + 1);
        assert!(validate_nickname(&long).is_err());
        let max = "x".repeat(NICKNAME_MAX_CHARS);
        assert!(validate_nickname(&max).is_ok());
    }

    #[test]
    fn rejects_control_characters() {
        assert!(validate_nickname("ali\tce").is_err());
        assert!(validate_nickname("ali\nce").is_err());
    }
}
