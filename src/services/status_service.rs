//! Read models consumed by status pollers.

use uuid::Uuid;

use crate::{
    dto::status::{AnswerStatusResponse, ReservationStatusResponse},
    error::ServiceError,
    state::SharedState,
};

/// Snapshot of a reservation's approval state.
pub async fn reservation_status(
    state: &SharedState,
    reservation_id: Uuid,
) -> Result<ReservationStatusResponse, ServiceError> {
    let store = state.require_quiz_store().await?;

    let Some(reservation) = store.find_reservation(reservation_id).await? else {
        return Err(ServiceError::NotFound(format!(
            "reservation `{reservation_id}` not found"
        )));
    };

    let Some(question) = store.find_question(reservation.question_id).await? else {
        return Err(ServiceError::NotFound(format!(
            "question `{}` not found",
            reservation.question_id
        )));
    };

    Ok(ReservationStatusResponse {
        reservation_id: reservation.id,
        question_id: question.id,
        approved: reservation.approved,
        question_status: question.status,
    })
}

/// Snapshot of an answer's judgement state.
pub async fn answer_status(
    state: &SharedState,
    answer_id: Uuid,
) -> Result<AnswerStatusResponse, ServiceError> {
    let store = state.require_quiz_store().await?;

    let Some(answer) = store.find_answer(answer_id).await? else {
        return Err(ServiceError::NotFound(format!(
            "answer `{answer_id}` not found"
        )));
    };

    Ok(AnswerStatusResponse {
        answer_id: answer.id,
        judged: answer.status.is_judged(),
        status: answer.status,
    })
}
