use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{dao::models::ReservationEntity, dto::format_system_time};

/// Payload used by a player to claim first-answer rights on a question.
///
/// Sessions are out of scope; player identity travels in the body.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReservationRequest {
    /// Identifier of the claiming player.
    pub player_id: Uuid,
}

/// Projection of a reservation.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationSummary {
    /// Stable identifier for the reservation.
    pub id: Uuid,
    /// Question being claimed.
    pub question_id: Uuid,
    /// Claiming player.
    pub player_id: Uuid,
    /// Nickname of the claiming player, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_nickname: Option<String>,
    /// Whether the admin approved this claim.
    pub approved: bool,
    /// RFC3339 claim timestamp; admin listing is ascending on this.
    pub reserved_at: String,
}

impl ReservationSummary {
    /// Build a summary, attaching the player nickname when available.
    pub fn with_nickname(entity: ReservationEntity, nickname: Option<String>) -> Self {
        Self {
            id: entity.id,
            question_id: entity.question_id,
            player_id: entity.player_id,
            player_nickname: nickname,
            approved: entity.approved,
            reserved_at: format_system_time(entity.reserved_at),
        }
    }
}

impl From<ReservationEntity> for ReservationSummary {
    fn from(entity: ReservationEntity) -> Self {
        Self::with_nickname(entity, None)
    }
}
