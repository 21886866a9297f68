//! Immutable snapshots consumed by status pollers.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dao::models::{AnswerStatus, QuestionStatus};

/// Snapshot of a reservation's approval state.
///
/// Polled by a player waiting to learn whether they won the reservation race.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReservationStatusResponse {
    /// Reservation the snapshot describes.
    pub reservation_id: Uuid,
    /// Question the reservation is for.
    pub question_id: Uuid,
    /// Whether this reservation was approved by the admin.
    pub approved: bool,
    /// Status of the parent question at snapshot time. `Reserved` with
    /// `approved == false` means another player won the race.
    pub question_status: QuestionStatus,
}

/// Snapshot of an answer's judgement state.
///
/// Polled by the answering player waiting for the admin verdict.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnswerStatusResponse {
    /// Answer the snapshot describes.
    pub answer_id: Uuid,
    /// Whether the admin has ruled on the answer yet.
    pub judged: bool,
    /// Current judgement status.
    pub status: AnswerStatus,
}
