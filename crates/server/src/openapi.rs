use utoipa::OpenApi;

/// OpenAPI document for the callback surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tribuna",
        description = "Benefit-appeals event dispatch and evidence distribution"
    ),
    paths(
        crate::health::health_check,
        crate::rest::callback::receive_callback,
    ),
    components(schemas(
        shared_types::AppError,
        shared_types::CaseSnapshot,
        crate::health::HealthResponse,
        crate::rest::callback::CallbackPayload,
        crate::rest::callback::CallbackResponse,
    ))
)]
pub struct ApiDoc;
