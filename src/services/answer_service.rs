//! Answer submission and judging.

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::{AnswerEntity, AnswerStatus, QuestionStatus},
    dto::answer::{AnswerSummary, AnswerVerdict},
    error::ServiceError,
    state::{
        SharedState,
        lifecycle::{self, QuestionEvent},
    },
};

/// The approved reservation holder submits the answer for a reserved
/// question.
///
/// Anyone else is refused: holding the approved reservation is what
/// authorizes the write.
pub async fn submit(
    state: &SharedState,
    question_id: Uuid,
    player_id: Uuid,
    text: String,
) -> Result<AnswerSummary, ServiceError> {
    let store = state.require_quiz_store().await?;

    let Some(question) = store.find_question(question_id).await? else {
        return Err(ServiceError::NotFound(format!(
            "question `{question_id}` not found"
        )));
    };

    if question.status != QuestionStatus::Reserved {
        return Err(ServiceError::Conflict(format!(
            "question `{question_id}` is not awaiting an answer"
        )));
    }

    let Some(reservation_id) = question.approved_reservation else {
        return Err(ServiceError::Conflict(format!(
            "question `{question_id}` has no approved reservation"
        )));
    };

    let Some(reservation) = store.find_reservation(reservation_id).await? else {
        return Err(ServiceError::NotFound(format!(
            "reservation `{reservation_id}` not found"
        )));
    };

    if reservation.player_id != player_id {
        return Err(ServiceError::Unauthorized(
            "only the approved reservation holder may answer".into(),
        ));
    }

    // One unjudged answer per question; earlier rejected answers from a
    // previous round do not block a new submission.
    let answers = store.list_answers(question_id).await?;
    if answers
        .iter()
        .any(|answer| answer.status != AnswerStatus::Rejected)
    {
        return Err(ServiceError::Conflict(format!(
            "question `{question_id}` already has an answer"
        )));
    }

    let answer = AnswerEntity::new(question_id, player_id, reservation_id, text);
    if !store.insert_answer(answer.clone()).await? {
        return Err(ServiceError::Conflict(format!(
            "reservation `{reservation_id}` already submitted an answer"
        )));
    }

    info!(
        answer_id = %answer.id,
        question_id = %question_id,
        player_id = %player_id,
        "answer submitted"
    );
    Ok(answer.into())
}

/// The admin rules on a pending answer.
///
/// Approval closes the question. Rejection reopens it to `Live`, clears the
/// approved-reservation marker and revokes the reservation's approval so a
/// fresh reservation race can start.
pub async fn judge(
    state: &SharedState,
    answer_id: Uuid,
    verdict: AnswerVerdict,
) -> Result<AnswerSummary, ServiceError> {
    let store = state.require_quiz_store().await?;

    let Some(mut answer) = store.find_answer(answer_id).await? else {
        return Err(ServiceError::NotFound(format!(
            "answer `{answer_id}` not found"
        )));
    };

    if answer.status.is_judged() {
        return Err(ServiceError::Conflict(format!(
            "answer `{answer_id}` was already judged"
        )));
    }

    let Some(question) = store.find_question(answer.question_id).await? else {
        return Err(ServiceError::NotFound(format!(
            "question `{}` not found",
            answer.question_id
        )));
    };

    let (event, answer_status, approved_reservation) = match verdict {
        AnswerVerdict::Approve => (
            QuestionEvent::ApproveAnswer,
            AnswerStatus::Approved,
            Some(answer.reservation_id),
        ),
        AnswerVerdict::Reject => (QuestionEvent::RejectAnswer, AnswerStatus::Rejected, None),
    };

    let next = lifecycle::next_status(question.status, event)?;
    if !store
        .transition_question(question.id, question.status, next, approved_reservation)
        .await?
    {
        return Err(ServiceError::Conflict(format!(
            "question `{}` changed status concurrently",
            question.id
        )));
    }

    if matches!(verdict, AnswerVerdict::Reject) {
        // Revoke the won race so the reopened question starts clean. The
        // question row cleared by the transition above is what authorizes
        // submissions and approvals; the reservation flag is presentation
        // state, so trailing it behind the transition cannot let a stale
        // holder act.
        if let Some(mut reservation) = store.find_reservation(answer.reservation_id).await? {
            reservation.approved = false;
            store.save_reservation(reservation).await?;
        }
    }

    answer.status = answer_status;
    store.save_answer(answer.clone()).await?;

    info!(
        answer_id = %answer_id,
        question_id = %question.id,
        verdict = ?answer_status,
        "answer judged"
    );
    Ok(answer.into())
}

/// The latest answer submitted for a question, for the admin view.
pub async fn current_for_question(
    state: &SharedState,
    question_id: Uuid,
) -> Result<AnswerSummary, ServiceError> {
    let store = state.require_quiz_store().await?;

    if store.find_question(question_id).await?.is_none() {
        return Err(ServiceError::NotFound(format!(
            "question `{question_id}` not found"
        )));
    }

    let mut answers = store.list_answers(question_id).await?;
    let Some(latest) = answers.pop() else {
        return Err(ServiceError::NotFound(format!(
            "question `{question_id}` has no answer yet"
        )));
    };

    Ok(latest.into())
}
