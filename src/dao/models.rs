use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle status of a question.
///
/// The flow is linear (`Idle -> Live -> Reserved -> Closed`) with one reopen
/// edge: rejecting an answer puts the question back to `Live`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionStatus {
    /// Created by the admin but not yet visible to players.
    Idle,
    /// Published and open for reservations.
    Live,
    /// A reservation has been approved; only its holder may answer.
    Reserved,
    /// The answer was approved; the question is finished.
    Closed,
}

/// Judgement status of a submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnswerStatus {
    /// Submitted and awaiting the admin verdict.
    Pending,
    /// Judged correct; closes the question.
    Approved,
    /// Judged wrong; the question reopens for reservations.
    Rejected,
}

impl AnswerStatus {
    /// Whether the admin has already ruled on this answer.
    pub fn is_judged(self) -> bool {
        !matches!(self, AnswerStatus::Pending)
    }
}

/// A registered player identified by a unique nickname.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Stable identifier for the player.
    pub id: Uuid,
    /// Unique display name chosen at sign-up.
    pub nickname: String,
    /// Argon2-encoded password hash.
    pub password_hash: String,
    /// Whether the player has administrative rights.
    pub is_admin: bool,
    /// Sign-up timestamp.
    pub joined_at: SystemTime,
}

/// A quiz question owned by the administrator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionEntity {
    /// Stable identifier for the question.
    pub id: Uuid,
    /// The question text shown to players once live.
    pub text: String,
    /// Creation timestamp for auditing and player-facing ordering.
    pub created_at: SystemTime,
    /// Current lifecycle status.
    pub status: QuestionStatus,
    /// Identifier of the approved reservation, if any.
    ///
    /// Carried on the question row so the single-approval invariant can be
    /// enforced with one compare-and-set write.
    pub approved_reservation: Option<Uuid>,
}

impl QuestionEntity {
    /// Create a fresh question in the `Idle` state.
    pub fn new(text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            created_at: SystemTime::now(),
            status: QuestionStatus::Idle,
            approved_reservation: None,
        }
    }
}

/// A player's timestamped claim of first-answer rights on a question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReservationEntity {
    /// Stable identifier for the reservation.
    pub id: Uuid,
    /// Question being claimed.
    pub question_id: Uuid,
    /// Player making the claim.
    pub player_id: Uuid,
    /// Creation timestamp; listing order for the admin is ascending on this.
    pub reserved_at: SystemTime,
    /// Whether the admin approved this claim.
    pub approved: bool,
}

impl ReservationEntity {
    /// Create a fresh, unapproved reservation.
    pub fn new(question_id: Uuid, player_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            question_id,
            player_id,
            reserved_at: SystemTime::now(),
            approved: false,
        }
    }
}

/// An answer submitted for a question.
///
/// At most one unjudged answer exists per question; rejected answers remain
/// as history when the question reopens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnswerEntity {
    /// Stable identifier for the answer.
    pub id: Uuid,
    /// Question being answered.
    pub question_id: Uuid,
    /// Player who submitted, i.e. the approved reservation holder.
    pub player_id: Uuid,
    /// Reservation that authorized this answer.
    pub reservation_id: Uuid,
    /// The answer text.
    pub text: String,
    /// Submission timestamp.
    pub created_at: SystemTime,
    /// Judgement status.
    pub status: AnswerStatus,
}

impl AnswerEntity {
    /// Create a fresh answer awaiting judgement.
    pub fn new(question_id: Uuid, player_id: Uuid, reservation_id: Uuid, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            question_id,
            player_id,
            reservation_id,
            text,
            created_at: SystemTime::now(),
            status: AnswerStatus::Pending,
        }
    }
}
