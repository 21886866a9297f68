use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::question::CurrentQuestionResponse, error::AppError, services::question_service,
    state::SharedState,
};

/// Routes exposing the live question to players.
pub fn router() -> Router<SharedState> {
    Router::new().route("/api/questions/current", get(current_question))
}

/// Return the most recently published live question, if any.
#[utoipa::path(
    get,
    path = "/api/questions/current",
    tag = "questions",
    responses(
        (status = 200, description = "Current question snapshot", body = CurrentQuestionResponse)
    )
)]
pub async fn current_question(
    State(state): State<SharedState>,
) -> Result<Json<CurrentQuestionResponse>, AppError> {
    Ok(Json(question_service::current_question(&state).await?))
}
