use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    dao::models::PlayerEntity,
    dto::{format_system_time, validation::validate_nickname},
};

/// Payload used to register a new player.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupRequest {
    /// Desired unique nickname.
    pub nickname: String,
    /// Password, repeated in `password_confirm`.
    pub password: String,
    /// Password confirmation; must match `password`.
    pub password_confirm: String,
}

impl Validate for SignupRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_nickname(&self.nickname) {
            errors.add("nickname", e);
        }

        if self.password.is_empty() {
            let mut err = ValidationError::new("password_blank");
            err.message = Some("Password must not be empty".into());
            errors.add("password", err);
        }

        if self.password != self.password_confirm {
            let mut err = ValidationError::new("password_mismatch");
            err.message = Some("Passwords don't match".into());
            errors.add("password_confirm", err);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Public projection of a player; never exposes the credential hash.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerSummary {
    /// Stable identifier for the player.
    pub id: Uuid,
    /// Unique display name.
    pub nickname: String,
    /// RFC3339 sign-up timestamp.
    pub joined_at: String,
}

impl From<PlayerEntity> for PlayerSummary {
    fn from(entity: PlayerEntity) -> Self {
        Self {
            id: entity.id,
            nickname: entity.nickname,
            joined_at: format_system_time(entity.joined_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(nickname: &str, password: &str, confirm: &str) -> SignupRequest {
        SignupRequest {
            nickname: nickname.into(),
            password: password.into(),
            password_confirm: confirm.into(),
        }
    }

    #[test]
    fn accepts_matching_passwords() {
        assert!(request("alice", "hunter2hunter2", "hunter2hunter2")
            .validate()
            .is_ok());
    }

    #[test]
    fn rejects_password_mismatch() {
        let errors = request("alice", "hunter2", "hunter3").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password_confirm"));
    }

    #[test]
    fn rejects_blank_nickname() {
        let errors = request("  ", "hunter2", "hunter2").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("nickname"));
    }
}
