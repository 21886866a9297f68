use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{QuestionEntity, QuestionStatus},
    dto::format_system_time,
};

/// Payload used by the admin to create a question.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateQuestionRequest {
    /// The question text; starts hidden from players.
    #[validate(length(min = 1, max = 2000))]
    pub text: String,
}

/// Full projection of a question for the admin.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionSummary {
    /// Stable identifier for the question.
    pub id: Uuid,
    /// The question text.
    pub text: String,
    /// Current lifecycle status.
    pub status: QuestionStatus,
    /// Identifier of the approved reservation, if any.
    pub approved_reservation: Option<Uuid>,
    /// RFC3339 creation timestamp.
    pub created_at: String,
}

impl From<QuestionEntity> for QuestionSummary {
    fn from(entity: QuestionEntity) -> Self {
        Self {
            id: entity.id,
            text: entity.text,
            status: entity.status,
            approved_reservation: entity.approved_reservation,
            created_at: format_system_time(entity.created_at),
        }
    }
}

/// Player-facing view of a live question.
#[derive(Debug, Serialize, ToSchema)]
pub struct LiveQuestion {
    /// Stable identifier for the question.
    pub id: Uuid,
    /// The question text.
    pub text: String,
}

/// Response for the player-facing listing: the most recently published live
/// question, plus how many live questions exist in total.
#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentQuestionResponse {
    /// The question players may reserve right now, if any.
    pub question: Option<LiveQuestion>,
    /// Number of questions currently live.
    pub available: usize,
}

impl From<QuestionEntity> for LiveQuestion {
    fn from(entity: QuestionEntity) -> Self {
        Self {
            id: entity.id,
            text: entity.text,
        }
    }
}
