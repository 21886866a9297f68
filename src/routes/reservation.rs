use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
};
use uuid::Uuid;

use crate::{
    dto::reservation::{CreateReservationRequest, ReservationSummary},
    error::AppError,
    services::reservation_service,
    state::SharedState,
};

/// Routes handling the reservation race on a live question.
pub fn router() -> Router<SharedState> {
    Router::new().route(
        "/api/questions/{id}/reservations",
        post(create_reservation),
    )
}

/// Claim the right to answer a live question.
///
/// Repeated claims by the same player return the original reservation with
/// status 200 instead of creating a duplicate.
#[utoipa::path(
    post,
    path = "/api/questions/{id}/reservations",
    tag = "reservations",
    params(("id" = String, Path, description = "Identifier of the question to reserve")),
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation created", body = ReservationSummary),
        (status = 200, description = "Existing reservation returned", body = ReservationSummary),
        (status = 404, description = "Unknown question or player"),
        (status = 409, description = "Question is not open for reservations")
    )
)]
pub async fn create_reservation(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ReservationSummary>), AppError> {
    let (reservation, created) =
        reservation_service::reserve(&state, id, payload.player_id).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(reservation)))
}
