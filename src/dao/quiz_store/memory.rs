//! Map-backed [`QuizStore`] used by the test suite and local demos.

use std::sync::Arc;

use dashmap::DashMap;
use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::{
    models::{
        AnswerEntity, AnswerStatus, PlayerEntity, QuestionEntity, QuestionStatus,
        ReservationEntity,
    },
    quiz_store::QuizStore,
    storage::StorageResult,
};

/// In-memory store; every operation is atomic per touched key.
#[derive(Clone, Default)]
pub struct MemoryQuizStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    players: DashMap<Uuid, PlayerEntity>,
    /// Nickname -> player id; the entry API makes sign-up races safe.
    nicknames: DashMap<String, Uuid>,
    questions: DashMap<Uuid, QuestionEntity>,
    reservations: DashMap<Uuid, ReservationEntity>,
    answers: DashMap<Uuid, AnswerEntity>,
    /// (question id, reservation id) -> answer id uniqueness index.
    answer_index: DashMap<(Uuid, Uuid), Uuid>,
}

impl QuizStore for MemoryQuizStore {
    fn insert_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<bool>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            match inner.nicknames.entry(player.nickname.clone()) {
                dashmap::Entry::Occupied(_) => Ok(false),
                dashmap::Entry::Vacant(slot) => {
                    slot.insert(player.id);
                    inner.players.insert(player.id, player);
                    Ok(true)
                }
            }
        })
    }

    fn find_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.players.get(&id).map(|entry| entry.clone())) })
    }

    fn find_player_by_nickname(
        &self,
        nickname: String,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let id = inner.nicknames.get(&nickname).map(|entry| *entry);
            Ok(id.and_then(|id| inner.players.get(&id).map(|entry| entry.clone())))
        })
    }

    fn list_players(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut players: Vec<PlayerEntity> =
                inner.players.iter().map(|entry| entry.clone()).collect();
            players.sort_by(|a, b| a.nickname.cmp(&b.nickname));
            Ok(players)
        })
    }

    fn save_question(&self, question: QuestionEntity) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.questions.insert(question.id, question);
            Ok(())
        })
    }

    fn find_question(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<QuestionEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.questions.get(&id).map(|entry| entry.clone())) })
    }

    fn list_questions(&self) -> BoxFuture<'static, StorageResult<Vec<QuestionEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut questions: Vec<QuestionEntity> =
                inner.questions.iter().map(|entry| entry.clone()).collect();
            questions.sort_by_key(|question| question.created_at);
            Ok(questions)
        })
    }

    fn list_live_questions(&self) -> BoxFuture<'static, StorageResult<Vec<QuestionEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut questions: Vec<QuestionEntity> = inner
                .questions
                .iter()
                .filter(|entry| entry.status == QuestionStatus::Live)
                .map(|entry| entry.clone())
                .collect();
            questions.sort_by_key(|question| question.created_at);
            questions.reverse();
            Ok(questions)
        })
    }

    fn delete_question(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.questions.remove(&id).is_some()) })
    }

    fn transition_question(
        &self,
        id: Uuid,
        expected: QuestionStatus,
        next: QuestionStatus,
        approved_reservation: Option<Uuid>,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            // The DashMap entry lock makes the check-then-set atomic.
            let Some(mut question) = inner.questions.get_mut(&id) else {
                return Ok(false);
            };
            if question.status != expected {
                return Ok(false);
            }
            question.status = next;
            question.approved_reservation = approved_reservation;
            Ok(true)
        })
    }

    fn save_reservation(
        &self,
        reservation: ReservationEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.reservations.insert(reservation.id, reservation);
            Ok(())
        })
    }

    fn find_reservation(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<ReservationEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.reservations.get(&id).map(|entry| entry.clone())) })
    }

    fn find_reservation_for_player(
        &self,
        question_id: Uuid,
        player_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<ReservationEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            Ok(inner
                .reservations
                .iter()
                .find(|entry| entry.question_id == question_id && entry.player_id == player_id)
                .map(|entry| entry.clone()))
        })
    }

    fn list_reservations(
        &self,
        question_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<ReservationEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut reservations: Vec<ReservationEntity> = inner
                .reservations
                .iter()
                .filter(|entry| entry.question_id == question_id)
                .map(|entry| entry.clone())
                .collect();
            reservations.sort_by_key(|reservation| reservation.reserved_at);
            Ok(reservations)
        })
    }

    fn insert_answer(&self, answer: AnswerEntity) -> BoxFuture<'static, StorageResult<bool>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            match inner
                .answer_index
                .entry((answer.question_id, answer.reservation_id))
            {
                // A rejected answer is history after the question reopens;
                // it must not block a resubmission from the same reservation.
                dashmap::Entry::Occupied(mut slot) => {
                    let existing = inner
                        .answers
                        .get(slot.get())
                        .map(|entry| entry.status);
                    if existing.is_some_and(|status| status != AnswerStatus::Rejected) {
                        return Ok(false);
                    }
                    slot.insert(answer.id);
                    inner.answers.insert(answer.id, answer);
                    Ok(true)
                }
                dashmap::Entry::Vacant(slot) => {
                    slot.insert(answer.id);
                    inner.answers.insert(answer.id, answer);
                    Ok(true)
                }
            }
        })
    }

    fn save_answer(&self, answer: AnswerEntity) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner
                .answer_index
                .insert((answer.question_id, answer.reservation_id), answer.id);
            inner.answers.insert(answer.id, answer);
            Ok(())
        })
    }

    fn find_answer(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<AnswerEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.answers.get(&id).map(|entry| entry.clone())) })
    }

    fn list_answers(
        &self,
        question_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<AnswerEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut answers: Vec<AnswerEntity> = inner
                .answers
                .iter()
                .filter(|entry| entry.question_id == question_id)
                .map(|entry| entry.clone())
                .collect();
            answers.sort_by_key(|answer| answer.created_at);
            Ok(answers)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
