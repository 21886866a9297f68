//! Reservation creation and the single-approval rule.

use std::collections::HashMap;

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::ReservationEntity,
    dto::reservation::ReservationSummary,
    error::ServiceError,
    services::question_service,
    state::{
        SharedState,
        lifecycle::{self, QuestionEvent},
    },
};

/// A player claims first-answer rights on a live question.
///
/// Repeating the request for the same player and question returns the
/// existing reservation instead of appending a duplicate. The returned flag
/// is `true` when a new reservation was created.
pub async fn reserve(
    state: &SharedState,
    question_id: Uuid,
    player_id: Uuid,
) -> Result<(ReservationSummary, bool), ServiceError> {
    let store = state.require_quiz_store().await?;

    if store.find_player(player_id).await?.is_none() {
        return Err(ServiceError::NotFound(format!(
            "player `{player_id}` not found"
        )));
    }

    question_service::require_live_question(state, question_id).await?;

    if let Some(existing) = store
        .find_reservation_for_player(question_id, player_id)
        .await?
    {
        return Ok((existing.into(), false));
    }

    let reservation = ReservationEntity::new(question_id, player_id);
    store.save_reservation(reservation.clone()).await?;

    info!(
        reservation_id = %reservation.id,
        question_id = %question_id,
        player_id = %player_id,
        "reservation created"
    );
    Ok((reservation.into(), true))
}

/// All reservations for a question, oldest first, with player nicknames
/// attached for the admin listing.
pub async fn list_for_question(
    state: &SharedState,
    question_id: Uuid,
) -> Result<Vec<ReservationSummary>, ServiceError> {
    let store = state.require_quiz_store().await?;

    if store.find_question(question_id).await?.is_none() {
        return Err(ServiceError::NotFound(format!(
            "question `{question_id}` not found"
        )));
    }

    let reservations = store.list_reservations(question_id).await?;

    let mut nicknames: HashMap<Uuid, String> = HashMap::new();
    for reservation in &reservations {
        if let std::collections::hash_map::Entry::Vacant(slot) =
            nicknames.entry(reservation.player_id)
        {
            if let Some(player) = store.find_player(reservation.player_id).await? {
                slot.insert(player.nickname);
            }
        }
    }

    Ok(reservations
        .into_iter()
        .map(|reservation| {
            let nickname = nicknames.get(&reservation.player_id).cloned();
            ReservationSummary::with_nickname(reservation, nickname)
        })
        .collect())
}

/// Approve one reservation, flipping its question to `Reserved`.
///
/// The single-approval invariant is enforced by a compare-and-set on the
/// question row: the transition only applies while the question is still
/// `Live`, so a second approval for the same question fails with a conflict
/// no matter how the requests interleave. Which reservation gets approved
/// remains the admin's call; approving a later claim than the oldest one is
/// permitted.
pub async fn approve(
    state: &SharedState,
    reservation_id: Uuid,
) -> Result<ReservationSummary, ServiceError> {
    let store = state.require_quiz_store().await?;

    let Some(mut reservation) = store.find_reservation(reservation_id).await? else {
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

    let next = lifecycle::next_status(question.status, QuestionEvent::ApproveReservation)?;
    if !store
        .transition_question(question.id, question.status, next, Some(reservation_id))
        .await?
    {
        return Err(ServiceError::Conflict(format!(
            "question `{}` already has an approved reservation",
            question.id
        )));
    }

    reservation.approved = true;
    store.save_reservation(reservation.clone()).await?;

    info!(
        reservation_id = %reservation_id,
        question_id = %question.id,
        "reservation approved"
    );
    Ok(reservation.into())
}
