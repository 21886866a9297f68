//! Player registration and credential checks.

use argon2::Config;
use rand::Rng;
use tracing::info;

use crate::{
    dao::models::PlayerEntity,
    dto::player::{PlayerSummary, SignupRequest},
    error::ServiceError,
    state::SharedState,
};

/// Register a new player with a hashed credential.
///
/// The nickname uniqueness rule is enforced by the store insert, so two
/// concurrent sign-ups with the same nickname cannot both succeed.
pub async fn signup(
    state: &SharedState,
    request: SignupRequest,
) -> Result<PlayerSummary, ServiceError> {
    let store = state.require_quiz_store().await?;

    let password_hash = hash_password(&request.password)?;
    let player = PlayerEntity {
        id: uuid::Uuid::new_v4(),
        nickname: request.nickname.trim().to_owned(),
        password_hash,
        is_admin: false,
        joined_at: std::time::SystemTime::now(),
    };

    let nickname = player.nickname.clone();
    if !store.insert_player(player.clone()).await? {
        return Err(ServiceError::Conflict(format!(
            "nickname `{nickname}` is already taken"
        )));
    }

    info!(%nickname, "player registered");
    Ok(player.into())
}

/// Check a nickname/password pair against the stored hash.
///
/// Session issuance is out of scope; callers only learn whether the
/// credential matches.
pub async fn verify_credentials(
    state: &SharedState,
    nickname: &str,
    password: &str,
) -> Result<PlayerSummary, ServiceError> {
    let store = state.require_quiz_store().await?;

    let Some(player) = store.find_player_by_nickname(nickname.to_owned()).await? else {
        return Err(ServiceError::Unauthorized("unknown nickname".into()));
    };

    let matches = argon2::verify_encoded(&player.password_hash, password.as_bytes())
        .map_err(|err| ServiceError::Internal(format!("credential verification failed: {err}")))?;

    if !matches {
        return Err(ServiceError::Unauthorized("wrong password".into()));
    }

    Ok(player.into())
}

/// All registered players, for the admin record browser.
pub async fn list_players(state: &SharedState) -> Result<Vec<PlayerSummary>, ServiceError> {
    let store = state.require_quiz_store().await?;
    let players = store.list_players().await?;
    Ok(players.into_iter().map(Into::into).collect())
}

/// Hash a password with a fresh 16-byte salt.
fn hash_password(password: &str) -> Result<String, ServiceError> {
    let mut salt = [0_u8; 16];
    rand::thread_rng().fill(&mut salt);
    argon2::hash_encoded(password.as_bytes(), &salt, &Config::default())
        .map_err(|err| ServiceError::Internal(format!("password hashing failed: {err}")))
}
