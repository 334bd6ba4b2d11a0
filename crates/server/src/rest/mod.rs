pub mod callback;

use axum::{
    routing::{get, post},
    Json, Router,
};

use crate::state::AppState;

/// Build the REST API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/callback", post(callback::receive_callback))
        .route("/health", get(crate::health::health_check))
        .route("/api/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    use utoipa::OpenApi;
    Json(crate::openapi::ApiDoc::openapi())
}
