use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Quiz Reserve Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::player::signup,
        crate::routes::question::current_question,
        crate::routes::reservation::create_reservation,
        crate::routes::answer::submit_answer,
        crate::routes::status::reservation_status,
        crate::routes::status::answer_status,
        crate::routes::admin::list_questions,
        crate::routes::admin::create_question,
        crate::routes::admin::delete_question,
        crate::routes::admin::publish_question,
        crate::routes::admin::list_reservations,
        crate::routes::admin::approve_reservation,
        crate::routes::admin::current_answer,
        crate::routes::admin::judge_answer,
        crate::routes::admin::list_players,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::StorageHealth,
            crate::dto::player::SignupRequest,
            crate::dto::player::PlayerSummary,
            crate::dto::question::CreateQuestionRequest,
            crate::dto::question::QuestionSummary,
            crate::dto::question::LiveQuestion,
            crate::dto::question::CurrentQuestionResponse,
            crate::dto::reservation::CreateReservationRequest,
            crate::dto::reservation::ReservationSummary,
            crate::dto::answer::SubmitAnswerRequest,
            crate::dto::answer::JudgeAnswerRequest,
            crate::dto::answer::AnswerVerdict,
            crate::dto::answer::AnswerSummary,
            crate::dto::status::ReservationStatusResponse,
            crate::dto::status::AnswerStatusResponse,
            crate::dao::models::QuestionStatus,
            crate::dao::models::AnswerStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "players", description = "Player signup and listing"),
        (name = "questions", description = "Question lifecycle operations"),
        (name = "reservations", description = "Answer-right reservations"),
        (name = "answers", description = "Answer submission and judging"),
        (name = "status", description = "Polling endpoints for pending decisions"),
    )
)]
pub struct ApiDoc;
