//! Persistence abstraction over players, questions, reservations and answers.

pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::{
    models::{AnswerEntity, PlayerEntity, QuestionEntity, QuestionStatus, ReservationEntity},
    storage::StorageResult,
};

/// Abstraction over the persistence layer for the quiz workflow.
///
/// Insertion methods that enforce a uniqueness rule return `bool`: `true` when
/// the row was written, `false` when the rule already held for another row.
pub trait QuizStore: Send + Sync {
    /// Insert a player; returns `false` when the nickname is already taken.
    fn insert_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<bool>>;
    /// Fetch a player by id.
    fn find_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>>;
    /// Fetch a player by their unique nickname.
    fn find_player_by_nickname(
        &self,
        nickname: String,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>>;
    /// All registered players, ordered by nickname.
    fn list_players(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>>;

    /// Upsert a question row.
    fn save_question(&self, question: QuestionEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Fetch a question by id.
    fn find_question(&self, id: Uuid)
    -> BoxFuture<'static, StorageResult<Option<QuestionEntity>>>;
    /// All questions, ordered by creation time ascending.
    fn list_questions(&self) -> BoxFuture<'static, StorageResult<Vec<QuestionEntity>>>;
    /// Questions currently in the `Live` status, most recent first.
    fn list_live_questions(&self) -> BoxFuture<'static, StorageResult<Vec<QuestionEntity>>>;
    /// Delete a question row; returns `false` when no such row existed.
    fn delete_question(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;
    /// Compare-and-set status transition.
    ///
    /// Moves the question from `expected` to `next` and stores
    /// `approved_reservation`, in one atomic write. Returns `false` when the
    /// question is missing or its status no longer matches `expected`, in
    /// which case nothing is modified.
    fn transition_question(
        &self,
        id: Uuid,
        expected: QuestionStatus,
        next: QuestionStatus,
        approved_reservation: Option<Uuid>,
    ) -> BoxFuture<'static, StorageResult<bool>>;

    /// Upsert a reservation row.
    fn save_reservation(
        &self,
        reservation: ReservationEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Fetch a reservation by id.
    fn find_reservation(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<ReservationEntity>>>;
    /// Fetch the reservation a player already holds on a question, if any.
    fn find_reservation_for_player(
        &self,
        question_id: Uuid,
        player_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<ReservationEntity>>>;
    /// All reservations for a question, ordered by creation time ascending.
    fn list_reservations(
        &self,
        question_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<ReservationEntity>>>;

    /// Insert an answer; returns `false` when the reservation already has an
    /// unrejected answer on this question. A rejected answer does not block
    /// a resubmission after the question reopens.
    fn insert_answer(&self, answer: AnswerEntity) -> BoxFuture<'static, StorageResult<bool>>;
    /// Upsert an answer row (used when judging).
    fn save_answer(&self, answer: AnswerEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Fetch an answer by id.
    fn find_answer(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<AnswerEntity>>>;
    /// All answers submitted for a question, ordered by creation time
    /// ascending. More than one can exist once a question has been reopened
    /// after a rejection.
    fn list_answers(
        &self,
        question_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<AnswerEntity>>>;

    /// Cheap connectivity probe used by the storage supervisor.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Attempt to re-establish a broken connection.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
