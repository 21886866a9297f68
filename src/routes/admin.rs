use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::{
        answer::{AnswerSummary, JudgeAnswerRequest},
        player::PlayerSummary,
        question::{CreateQuestionRequest, QuestionSummary},
        reservation::ReservationSummary,
    },
    error::AppError,
    services::{answer_service, player_service, question_service, reservation_service},
    state::SharedState,
};

const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Admin-only endpoints for driving the question lifecycle.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route(
            "/admin/questions",
            get(list_questions).post(create_question),
        )
        .route("/admin/questions/{id}", delete(delete_question))
        .route("/admin/questions/{id}/publish", post(publish_question))
        .route(
            "/admin/questions/{id}/reservations",
            get(list_reservations),
        )
        .route("/admin/questions/{id}/answer", get(current_answer))
        .route(
            "/admin/reservations/{id}/approve",
            post(approve_reservation),
        )
        .route("/admin/answers/{id}/judge", post(judge_answer))
        .route("/admin/players", get(list_players))
        .route_layer(middleware::from_fn_with_state(state, require_admin_token))
}

/// Retrieve every question regardless of status.
#[utoipa::path(
    get,
    path = "/admin/questions",
    tag = "questions",
    params(("X-Admin-Token" = String, Header, description = "Admin token from the server configuration")),
    responses((status = 200, description = "List all questions", body = [QuestionSummary]))
)]
pub async fn list_questions(
    State(state): State<SharedState>,
) -> Result<Json<Vec<QuestionSummary>>, AppError> {
    Ok(Json(question_service::list_questions(&state).await?))
}

/// Create a question in the idle state.
#[utoipa::path(
    post,
    path = "/admin/questions",
    tag = "questions",
    params(("X-Admin-Token" = String, Header, description = "Admin token from the server configuration")),
    request_body = CreateQuestionRequest,
    responses((status = 201, description = "Question created", body = QuestionSummary))
)]
pub async fn create_question(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CreateQuestionRequest>>,
) -> Result<(StatusCode, Json<QuestionSummary>), AppError> {
    let question = question_service::create_question(&state, payload.text).await?;
    Ok((StatusCode::CREATED, Json(question)))
}

/// Delete a question that is not currently in play.
#[utoipa::path(
    delete,
    path = "/admin/questions/{id}",
    tag = "questions",
    params(("X-Admin-Token" = String, Header, description = "Admin token from the server configuration"),
    ("id" = String, Path, description = "Identifier of the question to delete")),
    responses(
        (status = 204, description = "Question deleted"),
        (status = 409, description = "Question is live or reserved")
    )
)]
pub async fn delete_question(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    question_service::delete_question(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Publish an idle question, opening the reservation race.
#[utoipa::path(
    post,
    path = "/admin/questions/{id}/publish",
    tag = "questions",
    params(("X-Admin-Token" = String, Header, description = "Admin token from the server configuration"),
    ("id" = String, Path, description = "Identifier of the question to publish")),
    responses(
        (status = 200, description = "Question published", body = QuestionSummary),
        (status = 409, description = "Question is not idle")
    )
)]
pub async fn publish_question(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuestionSummary>, AppError> {
    Ok(Json(question_service::publish_question(&state, id).await?))
}

/// List reservations for a question in arrival order.
#[utoipa::path(
    get,
    path = "/admin/questions/{id}/reservations",
    tag = "reservations",
    params(("X-Admin-Token" = String, Header, description = "Admin token from the server configuration"),
    ("id" = String, Path, description = "Identifier of the question")),
    responses((status = 200, description = "Reservations in arrival order", body = [ReservationSummary]))
)]
pub async fn list_reservations(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ReservationSummary>>, AppError> {
    Ok(Json(
        reservation_service::list_for_question(&state, id).await?,
    ))
}

/// Approve one reservation, granting its holder the right to answer.
#[utoipa::path(
    post,
    path = "/admin/reservations/{id}/approve",
    tag = "reservations",
    params(("X-Admin-Token" = String, Header, description = "Admin token from the server configuration"),
    ("id" = String, Path, description = "Identifier of the reservation to approve")),
    responses(
        (status = 200, description = "Reservation approved", body = ReservationSummary),
        (status = 409, description = "Question already has an approved reservation")
    )
)]
pub async fn approve_reservation(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReservationSummary>, AppError> {
    Ok(Json(reservation_service::approve(&state, id).await?))
}

/// Retrieve the latest answer submitted for a question.
#[utoipa::path(
    get,
    path = "/admin/questions/{id}/answer",
    tag = "answers",
    params(("X-Admin-Token" = String, Header, description = "Admin token from the server configuration"),
    ("id" = String, Path, description = "Identifier of the question")),
    responses(
        (status = 200, description = "Latest answer", body = AnswerSummary),
        (status = 404, description = "No answer submitted yet")
    )
)]
pub async fn current_answer(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnswerSummary>, AppError> {
    Ok(Json(
        answer_service::current_for_question(&state, id).await?,
    ))
}

/// Judge a pending answer as approved or rejected.
#[utoipa::path(
    post,
    path = "/admin/answers/{id}/judge",
    tag = "answers",
    params(("X-Admin-Token" = String, Header, description = "Admin token from the server configuration"),
    ("id" = String, Path, description = "Identifier of the answer to judge")),
    request_body = JudgeAnswerRequest,
    responses(
        (status = 200, description = "Verdict applied", body = AnswerSummary),
        (status = 409, description = "Answer already judged")
    )
)]
pub async fn judge_answer(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<JudgeAnswerRequest>,
) -> Result<Json<AnswerSummary>, AppError> {
    Ok(Json(
        answer_service::judge(&state, id, payload.verdict).await?,
    ))
}

/// List every registered player.
#[utoipa::path(
    get,
    path = "/admin/players",
    tag = "players",
    params(("X-Admin-Token" = String, Header, description = "Admin token from the server configuration")),
    responses((status = 200, description = "Registered players", body = [PlayerSummary]))
)]
pub async fn list_players(
    State(state): State<SharedState>,
) -> Result<Json<Vec<PlayerSummary>>, AppError> {
    Ok(Json(player_service::list_players(&state).await?))
}

/// Require a matching `X-Admin-Token` header on every admin route.
async fn require_admin_token(
    State(state): State<SharedState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let provided = req
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_owned())
        .ok_or_else(|| {
            AppError::Unauthorized("missing admin token header `X-Admin-Token`".into())
        })?;

    match state.config().admin_token() {
        Some(token) if token == provided => Ok(next.run(req).await),
        Some(_) => Err(AppError::Unauthorized("invalid admin token".into())),
        None => Err(AppError::Unauthorized(
            "no admin token configured on this server".into(),
        )),
    }
}
