//! Pure transition rules for the question lifecycle.
//!
//! Services validate a transition here first, then apply it to the store with
//! a compare-and-set on the expected current status. The store write is what
//! protects against concurrent administrators; this module only encodes which
//! edges exist.

use thiserror::Error;

use crate::dao::models::QuestionStatus;

/// Events that move a question through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionEvent {
    /// Admin publishes the question to players.
    Publish,
    /// Admin approves one reservation, blocking new ones.
    ApproveReservation,
    /// Admin approves the submitted answer, finishing the question.
    ApproveAnswer,
    /// Admin rejects the submitted answer; the question reopens.
    RejectAnswer,
}

/// Error returned when an event cannot be applied from the current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while {from:?}")]
pub struct InvalidTransition {
    /// Status the question was in when the event was received.
    pub from: QuestionStatus,
    /// The event that cannot be applied from this status.
    pub event: QuestionEvent,
}

/// Compute the status an event leads to, or fail when the edge does not exist.
pub fn next_status(
    from: QuestionStatus,
    event: QuestionEvent,
) -> Result<QuestionStatus, InvalidTransition> {
    let next = match (from, event) {
        (QuestionStatus::Idle, QuestionEvent::Publish) => QuestionStatus::Live,
        (QuestionStatus::Live, QuestionEvent::ApproveReservation) => QuestionStatus::Reserved,
        (QuestionStatus::Reserved, QuestionEvent::ApproveAnswer) => QuestionStatus::Closed,
        // Rejection reopens the reservation race instead of dead-ending.
        (QuestionStatus::Reserved, QuestionEvent::RejectAnswer) => QuestionStatus::Live,
        (from, event) => return Err(InvalidTransition { from, event }),
    };

    Ok(next)
}

/// Whether a question in this status may be deleted by the admin.
///
/// Questions visible to players (`Live`) or mid-round (`Reserved`) must not
/// disappear under them.
pub fn deletable(status: QuestionStatus) -> bool {
    matches!(status, QuestionStatus::Idle | QuestionStatus::Closed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_is_linear() {
        let live = next_status(QuestionStatus::Idle, QuestionEvent::Publish).unwrap();
        assert_eq!(live, QuestionStatus::Live);

        let reserved = next_status(live, QuestionEvent::ApproveReservation).unwrap();
        assert_eq!(reserved, QuestionStatus::Reserved);

        let closed = next_status(reserved, QuestionEvent::ApproveAnswer).unwrap();
        assert_eq!(closed, QuestionStatus::Closed);
    }

    #[test]
    fn rejection_reopens_the_question() {
        let next = next_status(QuestionStatus::Reserved, QuestionEvent::RejectAnswer).unwrap();
        assert_eq!(next, QuestionStatus::Live);
    }

    #[test]
    fn closed_is_terminal() {
        for event in [
            QuestionEvent::Publish,
            QuestionEvent::ApproveReservation,
            QuestionEvent::ApproveAnswer,
            QuestionEvent::RejectAnswer,
        ] {
            let err = next_status(QuestionStatus::Closed, event).unwrap_err();
            assert_eq!(err.from, QuestionStatus::Closed);
            assert_eq!(err.event, event);
        }
    }

    #[test]
    fn reservation_requires_a_live_question() {
        let err = next_status(QuestionStatus::Idle, QuestionEvent::ApproveReservation).unwrap_err();
        assert_eq!(err.from, QuestionStatus::Idle);
    }

    #[test]
    fn publish_is_not_repeatable() {
        assert!(next_status(QuestionStatus::Live, QuestionEvent::Publish).is_err());
        assert!(next_status(QuestionStatus::Reserved, QuestionEvent::Publish).is_err());
    }

    #[test]
    fn delete_guard_tracks_player_visibility() {
        assert!(deletable(QuestionStatus::Idle));
        assert!(deletable(QuestionStatus::Closed));
        assert!(!deletable(QuestionStatus::Live));
        assert!(!deletable(QuestionStatus::Reserved));
    }
}
