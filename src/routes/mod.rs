use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{services::documentation::ApiDoc, state::SharedState};

pub mod admin;
pub mod answer;
pub mod health;
pub mod player;
pub mod question;
pub mod reservation;
pub mod status;

/// Compose the player, admin and documentation route trees over the shared
/// state. Swagger UI lives at `/docs`, backed by the generated document at
/// `/api-doc/openapi.json`.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(player::router())
        .merge(question::router())
        .merge(reservation::router())
        .merge(answer::router())
        .merge(status::router())
        .merge(admin::router(state.clone()));

    let swagger: Router<SharedState> =
        SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()).into();

    api_router.merge(swagger).with_state(state)
}
