//! Question creation, publication and the player-facing listing.

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::{QuestionEntity, QuestionStatus},
    dto::question::{CurrentQuestionResponse, QuestionSummary},
    error::ServiceError,
    state::{
        SharedState,
        lifecycle::{self, QuestionEvent},
    },
};

/// Create a question in the `Idle` state.
pub async fn create_question(
    state: &SharedState,
    text: String,
) -> Result<QuestionSummary, ServiceError> {
    let store = state.require_quiz_store().await?;

    let question = QuestionEntity::new(text);
    store.save_question(question.clone()).await?;

    info!(question_id = %question.id, "question created");
    Ok(question.into())
}

/// Publish an idle question, making it visible to players.
pub async fn publish_question(
    state: &SharedState,
    id: Uuid,
) -> Result<QuestionSummary, ServiceError> {
    let store = state.require_quiz_store().await?;

    let Some(question) = store.find_question(id).await? else {
        return Err(ServiceError::NotFound(format!("question `{id}` not found")));
    };

    let next = lifecycle::next_status(question.status, QuestionEvent::Publish)?;
    if !store
        .transition_question(id, question.status, next, None)
        .await?
    {
        return Err(ServiceError::Conflict(format!(
            "question `{id}` changed status concurrently"
        )));
    }

    info!(question_id = %id, "question published");
    get_question(state, id).await
}

/// Delete a question, refusing while it is visible to players.
pub async fn delete_question(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_quiz_store().await?;

    let Some(question) = store.find_question(id).await? else {
        return Err(ServiceError::NotFound(format!("question `{id}` not found")));
    };

    if !lifecycle::deletable(question.status) {
        return Err(ServiceError::Conflict(format!(
            "question `{id}` is {:?} and cannot be deleted",
            question.status
        )));
    }

    store.delete_question(id).await?;
    info!(question_id = %id, "question deleted");
    Ok(())
}

/// All questions, for the admin record browser.
pub async fn list_questions(state: &SharedState) -> Result<Vec<QuestionSummary>, ServiceError> {
    let store = state.require_quiz_store().await?;
    let questions = store.list_questions().await?;
    Ok(questions.into_iter().map(Into::into).collect())
}

/// The player-facing listing: the most recently published live question and
/// the count of live questions. Idle, reserved and closed questions are
/// filtered out.
pub async fn current_question(
    state: &SharedState,
) -> Result<CurrentQuestionResponse, ServiceError> {
    let store = state.require_quiz_store().await?;

    let mut live = store.list_live_questions().await?;
    let available = live.len();
    let question = if live.is_empty() {
        None
    } else {
        Some(live.remove(0).into())
    };

    Ok(CurrentQuestionResponse {
        question,
        available,
    })
}

/// Fetch a single question summary, for the admin.
pub async fn get_question(state: &SharedState, id: Uuid) -> Result<QuestionSummary, ServiceError> {
    let store = state.require_quiz_store().await?;
    let Some(question) = store.find_question(id).await? else {
        return Err(ServiceError::NotFound(format!("question `{id}` not found")));
    };
    Ok(question.into())
}

/// Guard used by player-initiated operations that require a live question.
pub async fn require_live_question(
    state: &SharedState,
    id: Uuid,
) -> Result<QuestionEntity, ServiceError> {
    let store = state.require_quiz_store().await?;

    let Some(question) = store.find_question(id).await? else {
        return Err(ServiceError::NotFound(format!("question `{id}` not found")));
    };

    if question.status != QuestionStatus::Live {
        return Err(ServiceError::Conflict(format!(
            "question `{id}` is not open for reservations"
        )));
    }

    Ok(question)
}
