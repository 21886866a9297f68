use serde::Serialize;
use utoipa::ToSchema;

/// Reachability of the quiz store as seen by the last health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StorageHealth {
    /// A store is installed and answered the ping.
    Reachable,
    /// A store is installed but the ping failed.
    Unreachable,
    /// No store has been installed yet.
    NotInstalled,
}

/// Health payload returned by the `/healthcheck` route: the degraded flag
/// plus the storage probe result behind it.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Overall service status ("ok" or "degraded").
    pub status: String,
    /// State of the quiz store backing the service.
    pub storage: StorageHealth,
}

impl HealthResponse {
    /// Combine the degraded flag with the storage probe outcome.
    pub fn new(degraded: bool, storage: StorageHealth) -> Self {
        let status = if degraded { "degraded" } else { "ok" };
        Self {
            status: status.to_owned(),
            storage,
        }
    }
}
