use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use axum_valid::Valid;

use crate::{
    dto::player::{PlayerSummary, SignupRequest},
    error::AppError,
    services::player_service,
    state::SharedState,
};

/// Routes handling player self-service operations.
pub fn router() -> Router<SharedState> {
    Router::new().route("/api/players/signup", post(signup))
}

/// Register a new player account.
#[utoipa::path(
    post,
    path = "/api/players/signup",
    tag = "players",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Player created", body = PlayerSummary),
        (status = 400, description = "Invalid nickname or password mismatch"),
        (status = 409, description = "Nickname already taken")
    )
)]
pub async fn signup(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<SignupRequest>>,
) -> Result<(StatusCode, Json<PlayerSummary>), AppError> {
    let player = player_service::signup(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(player)))
}
