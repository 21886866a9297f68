use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::answer::{AnswerSummary, SubmitAnswerRequest},
    error::AppError,
    services::answer_service,
    state::SharedState,
};

/// Routes handling answer submission by the approved player.
pub fn router() -> Router<SharedState> {
    Router::new().route("/api/questions/{id}/answer", post(submit_answer))
}

/// Submit an answer to a reserved question.
///
/// Only the holder of the approved reservation may submit; everyone else
/// receives 401.
#[utoipa::path(
    post,
    path = "/api/questions/{id}/answer",
    tag = "answers",
    params(("id" = String, Path, description = "Identifier of the question being answered")),
    request_body = SubmitAnswerRequest,
    responses(
        (status = 201, description = "Answer recorded", body = AnswerSummary),
        (status = 401, description = "Caller does not hold the approved reservation"),
        (status = 404, description = "Unknown question"),
        (status = 409, description = "Question is not awaiting an answer")
    )
)]
pub async fn submit_answer(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<SubmitAnswerRequest>>,
) -> Result<(StatusCode, Json<AnswerSummary>), AppError> {
    let answer = answer_service::submit(&state, id, payload.player_id, payload.text).await?;
    Ok((StatusCode::CREATED, Json(answer)))
}
