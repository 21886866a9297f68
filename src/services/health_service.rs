use tracing::warn;

use crate::{
    dto::health::{HealthResponse, StorageHealth},
    state::SharedState,
};

/// Probe the installed quiz store and fold the result into a health payload.
///
/// The probe never fails the request; an unreachable store is reported in the
/// body and logged so the supervisor's reconnect activity can be correlated.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let storage = match state.quiz_store().await {
        Some(store) => match store.health_check().await {
            Ok(()) => StorageHealth::Reachable,
            Err(err) => {
                warn!(error = %err, "quiz store ping failed");
                StorageHealth::Unreachable
            }
        },
        None => {
            warn!("no quiz store installed (degraded mode)");
            StorageHealth::NotInstalled
        }
    };

    HealthResponse::new(state.is_degraded().await, storage)
}
