use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::status::{AnswerStatusResponse, ReservationStatusResponse},
    error::AppError,
    services::status_service,
    state::SharedState,
};

/// Polling endpoints for players waiting on an admin decision.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/reservations/{id}/status", get(reservation_status))
        .route("/api/answers/{id}/status", get(answer_status))
}

/// Report whether a reservation has been approved yet.
#[utoipa::path(
    get,
    path = "/api/reservations/{id}/status",
    tag = "status",
    params(("id" = String, Path, description = "Identifier of the reservation to check")),
    responses(
        (status = 200, description = "Reservation status", body = ReservationStatusResponse),
        (status = 404, description = "Unknown reservation")
    )
)]
pub async fn reservation_status(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReservationStatusResponse>, AppError> {
    Ok(Json(status_service::reservation_status(&state, id).await?))
}

/// Report whether an answer has been judged and with what verdict.
#[utoipa::path(
    get,
    path = "/api/answers/{id}/status",
    tag = "status",
    params(("id" = String, Path, description = "Identifier of the answer to check")),
    responses(
        (status = 200, description = "Answer status", body = AnswerStatusResponse),
        (status = 404, description = "Unknown answer")
    )
)]
pub async fn answer_status(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnswerStatusResponse>, AppError> {
    Ok(Json(status_service::answer_status(&state, id).await?))
}
