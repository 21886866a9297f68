use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{AnswerEntity, AnswerStatus},
    dto::format_system_time,
};

/// Payload used by the approved reservation holder to submit an answer.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SubmitAnswerRequest {
    /// Identifier of the submitting player; must hold the approved
    /// reservation.
    pub player_id: Uuid,
    /// The answer text.
    #[validate(length(min = 1, max = 2000))]
    pub text: String,
}

/// The admin verdict on a submitted answer.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnswerVerdict {
    /// The answer is correct; the question closes.
    Approve,
    /// The answer is wrong; the question reopens for reservations.
    Reject,
}

/// Payload used by the admin to judge an answer.
#[derive(Debug, Deserialize, ToSchema)]
pub struct JudgeAnswerRequest {
    /// The verdict to record.
    pub verdict: AnswerVerdict,
}

/// Projection of an answer.
#[derive(Debug, Serialize, ToSchema)]
pub struct AnswerSummary {
    /// Stable identifier for the answer.
    pub id: Uuid,
    /// Question being answered.
    pub question_id: Uuid,
    /// Player who submitted.
    pub player_id: Uuid,
    /// Reservation that authorized the submission.
    pub reservation_id: Uuid,
    /// The answer text.
    pub text: String,
    /// Judgement status.
    pub status: AnswerStatus,
    /// RFC3339 submission timestamp.
    pub created_at: String,
}

impl From<AnswerEntity> for AnswerSummary {
    fn from(entity: AnswerEntity) -> Self {
        Self {
            id: entity.id,
            question_id: entity.question_id,
            player_id: entity.player_id,
            reservation_id: entity.reservation_id,
            text: entity.text,
            status: entity.status,
            created_at: format_system_time(entity.created_at),
        }
    }
}
