/// Answer submission and judging logic.
pub mod answer_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Player signup and credential verification.
pub mod player_service;
/// Cancellable status polling task.
pub mod poller;
/// Question lifecycle management.
pub mod question_service;
/// Reservation creation and approval logic.
pub mod reservation_service;
/// Read models for the client polling endpoints.
pub mod status_service;
/// Storage reconnection loop with degraded mode handling.
pub mod storage_supervisor;
