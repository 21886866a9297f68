//! End-to-end exercises of the question/reservation/answer workflow against
//! the in-memory store.

use std::{sync::Arc, time::Duration};

use quiz_reserve_back::{
    config::AppConfig,
    dao::{
        models::{AnswerStatus, QuestionStatus},
        quiz_store::{QuizStore, memory::MemoryQuizStore},
    },
    dto::{answer::AnswerVerdict, health::StorageHealth, player::SignupRequest},
    error::ServiceError,
    services::{
        answer_service, health_service, player_service,
        poller::{self, PollOutcome},
        question_service, reservation_service, status_service,
    },
    state::{AppState, SharedState},
};
use tokio::sync::watch;
use uuid::Uuid;

async fn test_state() -> SharedState {
    let config = AppConfig::with_values(Some("secret".into()), Duration::from_millis(4_000));
    let state = AppState::new(config);
    let store: Arc<dyn QuizStore> = Arc::new(MemoryQuizStore::default());
    state.set_quiz_store(store).await;
    state
}

fn signup_request(nickname: &str) -> SignupRequest {
    SignupRequest {
        nickname: nickname.to_owned(),
        password: "hunter2".to_owned(),
        password_confirm: "hunter2".to_owned(),
    }
}

#[tokio::test]
async fn full_round_trip_approves_answer() {
    let state = test_state().await;

    let alice = player_service::signup(&state, signup_request("alice"))
        .await
        .unwrap();

    let question = question_service::create_question(&state, "What is 2+2?".to_owned())
        .await
        .unwrap();
    assert_eq!(question.status, QuestionStatus::Idle);

    let published = question_service::publish_question(&state, question.id)
        .await
        .unwrap();
    assert_eq!(published.status, QuestionStatus::Live);

    let current = question_service::current_question(&state).await.unwrap();
    assert_eq!(current.question.as_ref().map(|q| q.id), Some(question.id));
    assert_eq!(current.available, 1);

    let (reservation, created) = reservation_service::reserve(&state, question.id, alice.id)
        .await
        .unwrap();
    assert!(created);
    assert!(!reservation.approved);

    let pending = status_service::reservation_status(&state, reservation.id)
        .await
        .unwrap();
    assert!(!pending.approved);
    assert_eq!(pending.question_status, QuestionStatus::Live);

    let approved = reservation_service::approve(&state, reservation.id)
        .await
        .unwrap();
    assert!(approved.approved);

    let status = status_service::reservation_status(&state, reservation.id)
        .await
        .unwrap();
    assert!(status.approved);
    assert_eq!(status.question_status, QuestionStatus::Reserved);

    let answer = answer_service::submit(&state, question.id, alice.id, "4".to_owned())
        .await
        .unwrap();
    assert_eq!(answer.status, AnswerStatus::Pending);

    let unjudged = status_service::answer_status(&state, answer.id).await.unwrap();
    assert!(!unjudged.judged);

    let judged = answer_service::judge(&state, answer.id, AnswerVerdict::Approve)
        .await
        .unwrap();
    assert_eq!(judged.status, AnswerStatus::Approved);

    let final_status = status_service::answer_status(&state, answer.id).await.unwrap();
    assert!(final_status.judged);
    assert_eq!(final_status.status, AnswerStatus::Approved);

    let closed = question_service::get_question(&state, question.id)
        .await
        .unwrap();
    assert_eq!(closed.status, QuestionStatus::Closed);
    assert_eq!(closed.approved_reservation, Some(reservation.id));
}

#[tokio::test]
async fn publishing_returns_the_updated_summary() {
    let state = test_state().await;

    let question = question_service::create_question(&state, "Tallest mountain?".to_owned())
        .await
        .unwrap();

    let published = question_service::publish_question(&state, question.id)
        .await
        .unwrap();
    assert_eq!(published.id, question.id);
    assert_eq!(published.status, QuestionStatus::Live);
    assert_eq!(published.approved_reservation, None);

    let again = question_service::publish_question(&state, question.id).await;
    assert!(matches!(again, Err(ServiceError::Conflict(_))));
}

#[tokio::test]
async fn only_one_reservation_can_be_approved() {
    let state = test_state().await;

    let alice = player_service::signup(&state, signup_request("alice"))
        .await
        .unwrap();
    let bob = player_service::signup(&state, signup_request("bob"))
        .await
        .unwrap();

    let question = question_service::create_question(&state, "Capital of France?".to_owned())
        .await
        .unwrap();
    question_service::publish_question(&state, question.id)
        .await
        .unwrap();

    let (first, _) = reservation_service::reserve(&state, question.id, alice.id)
        .await
        .unwrap();
    let (second, _) = reservation_service::reserve(&state, question.id, bob.id)
        .await
        .unwrap();

    // The admin is free to pick a later claim than the oldest one.
    reservation_service::approve(&state, second.id).await.unwrap();

    let result = reservation_service::approve(&state, first.id).await;
    assert!(matches!(result, Err(ServiceError::Conflict(_))));

    let losing = status_service::reservation_status(&state, first.id)
        .await
        .unwrap();
    assert!(!losing.approved);
    assert_eq!(losing.question_status, QuestionStatus::Reserved);
}

#[tokio::test]
async fn repeated_claims_return_the_original_reservation() {
    let state = test_state().await;

    let alice = player_service::signup(&state, signup_request("alice"))
        .await
        .unwrap();
    let question = question_service::create_question(&state, "Largest planet?".to_owned())
        .await
        .unwrap();
    question_service::publish_question(&state, question.id)
        .await
        .unwrap();

    let (first, created) = reservation_service::reserve(&state, question.id, alice.id)
        .await
        .unwrap();
    assert!(created);

    let (again, created) = reservation_service::reserve(&state, question.id, alice.id)
        .await
        .unwrap();
    assert!(!created);
    assert_eq!(again.id, first.id);

    let listed = reservation_service::list_for_question(&state, question.id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].player_nickname.as_deref(), Some("alice"));
}

#[tokio::test]
async fn rejected_answer_reopens_the_question() {
    let state = test_state().await;

    let alice = player_service::signup(&state, signup_request("alice"))
        .await
        .unwrap();
    let question = question_service::create_question(&state, "6 times 7?".to_owned())
        .await
        .unwrap();
    question_service::publish_question(&state, question.id)
        .await
        .unwrap();

    let (reservation, _) = reservation_service::reserve(&state, question.id, alice.id)
        .await
        .unwrap();
    reservation_service::approve(&state, reservation.id)
        .await
        .unwrap();

    let answer = answer_service::submit(&state, question.id, alice.id, "41".to_owned())
        .await
        .unwrap();
    let judged = answer_service::judge(&state, answer.id, AnswerVerdict::Reject)
        .await
        .unwrap();
    assert_eq!(judged.status, AnswerStatus::Rejected);

    // The race is open again and the old approval no longer stands.
    let reopened = question_service::get_question(&state, question.id)
        .await
        .unwrap();
    assert_eq!(reopened.status, QuestionStatus::Live);
    assert_eq!(reopened.approved_reservation, None);

    let revoked = status_service::reservation_status(&state, reservation.id)
        .await
        .unwrap();
    assert!(!revoked.approved);

    // A second round with the same reservation can produce a new answer.
    reservation_service::approve(&state, reservation.id)
        .await
        .unwrap();
    let retry = answer_service::submit(&state, question.id, alice.id, "42".to_owned())
        .await
        .unwrap();
    let judged = answer_service::judge(&state, retry.id, AnswerVerdict::Approve)
        .await
        .unwrap();
    assert_eq!(judged.status, AnswerStatus::Approved);
}

#[tokio::test]
async fn only_the_approved_holder_may_answer() {
    let state = test_state().await;

    let alice = player_service::signup(&state, signup_request("alice"))
        .await
        .unwrap();
    let carol = player_service::signup(&state, signup_request("carol"))
        .await
        .unwrap();

    let question = question_service::create_question(&state, "Speed of light?".to_owned())
        .await
        .unwrap();
    question_service::publish_question(&state, question.id)
        .await
        .unwrap();

    let (reservation, _) = reservation_service::reserve(&state, question.id, alice.id)
        .await
        .unwrap();

    // No approval yet: nobody may answer.
    let early = answer_service::submit(&state, question.id, alice.id, "c".to_owned()).await;
    assert!(matches!(early, Err(ServiceError::Conflict(_))));

    reservation_service::approve(&state, reservation.id)
        .await
        .unwrap();

    let intruder = answer_service::submit(&state, question.id, carol.id, "c".to_owned()).await;
    assert!(matches!(intruder, Err(ServiceError::Unauthorized(_))));
}

#[tokio::test]
async fn reservations_require_a_live_question() {
    let state = test_state().await;

    let alice = player_service::signup(&state, signup_request("alice"))
        .await
        .unwrap();
    let question = question_service::create_question(&state, "Idle question".to_owned())
        .await
        .unwrap();

    let result = reservation_service::reserve(&state, question.id, alice.id).await;
    assert!(matches!(result, Err(ServiceError::Conflict(_))));

    let unknown_player = Uuid::new_v4();
    question_service::publish_question(&state, question.id)
        .await
        .unwrap();
    let result = reservation_service::reserve(&state, question.id, unknown_player).await;
    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn unknown_status_ids_report_not_found() {
    let state = test_state().await;

    let reservation = status_service::reservation_status(&state, Uuid::new_v4()).await;
    assert!(matches!(reservation, Err(ServiceError::NotFound(_))));

    let answer = status_service::answer_status(&state, Uuid::new_v4()).await;
    assert!(matches!(answer, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn in_play_questions_cannot_be_deleted() {
    let state = test_state().await;

    let question = question_service::create_question(&state, "Delete me".to_owned())
        .await
        .unwrap();
    question_service::publish_question(&state, question.id)
        .await
        .unwrap();

    let result = question_service::delete_question(&state, question.id).await;
    assert!(matches!(result, Err(ServiceError::Conflict(_))));

    let idle = question_service::create_question(&state, "Unpublished".to_owned())
        .await
        .unwrap();
    question_service::delete_question(&state, idle.id)
        .await
        .unwrap();

    let result = question_service::get_question(&state, idle.id).await;
    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn healthcheck_reports_storage_state() {
    let state = test_state().await;

    let healthy = health_service::health_status(&state).await;
    assert_eq!(healthy.status, "ok");
    assert_eq!(healthy.storage, StorageHealth::Reachable);

    let bare = AppState::new(AppConfig::with_values(None, Duration::from_millis(4_000)));
    let degraded = health_service::health_status(&bare).await;
    assert_eq!(degraded.status, "degraded");
    assert_eq!(degraded.storage, StorageHealth::NotInstalled);
}

#[tokio::test]
async fn nicknames_are_unique() {
    let state = test_state().await;

    player_service::signup(&state, signup_request("alice"))
        .await
        .unwrap();
    let duplicate = player_service::signup(&state, signup_request("alice")).await;
    assert!(matches!(duplicate, Err(ServiceError::Conflict(_))));
}

#[tokio::test(start_paused = true)]
async fn poller_observes_reservation_approval() {
    let state = test_state().await;

    let alice = player_service::signup(&state, signup_request("alice"))
        .await
        .unwrap();
    let question = question_service::create_question(&state, "Deepest ocean?".to_owned())
        .await
        .unwrap();
    question_service::publish_question(&state, question.id)
        .await
        .unwrap();
    let (reservation, _) = reservation_service::reserve(&state, question.id, alice.id)
        .await
        .unwrap();

    let (_cancel, cancelled) = watch::channel(false);
    let poll_state = state.clone();
    let reservation_id = reservation.id;
    let poll = tokio::spawn(poller::poll_until_approved(
        state.config().poll_interval(),
        cancelled,
        move || {
            let state = poll_state.clone();
            async move {
                let status = status_service::reservation_status(&state, reservation_id).await?;
                Ok::<_, ServiceError>(status.approved)
            }
        },
    ));

    reservation_service::approve(&state, reservation.id)
        .await
        .unwrap();

    assert_eq!(poll.await.unwrap(), PollOutcome::Approved);
}

#[tokio::test(start_paused = true)]
async fn poller_surfaces_probe_failures() {
    let state = test_state().await;
    let missing = Uuid::new_v4();

    let (_cancel, cancelled) = watch::channel(false);
    let poll_state = state.clone();
    let outcome = poller::poll_until_approved(
        state.config().poll_interval(),
        cancelled,
        move || {
            let state = poll_state.clone();
            async move {
                let status = status_service::answer_status(&state, missing).await?;
                Ok::<_, ServiceError>(status.judged)
            }
        },
    )
    .await;

    assert!(matches!(outcome, PollOutcome::Failed(_)));
}

#[tokio::test]
async fn signup_verifies_credentials_roundtrip() {
    let state = test_state().await;

    let alice = player_service::signup(&state, signup_request("alice"))
        .await
        .unwrap();

    let verified = player_service::verify_credentials(&state, "alice", "hunter2")
        .await
        .unwrap();
    assert_eq!(verified.id, alice.id);

    let wrong = player_service::verify_credentials(&state, "alice", "letmein").await;
    assert!(matches!(wrong, Err(ServiceError::Unauthorized(_))));
}
