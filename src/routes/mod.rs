pub mod capture;
pub mod generate;
pub mod health;
pub mod webhooks;

use axum::{
    extract::DefaultBodyLimit,
    routing::{any, get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        webhooks::list_webhooks,
        webhooks::get_webhook,
        webhooks::delete_webhook,
        generate::generate_handler,
    ),
    components(schemas(
        crate::models::webhook::Webhook,
        crate::models::webhook::ListOrder,
        crate::dto::webhook_dto::WebhookListResponse,
        crate::dto::webhook_dto::GenerateRequest,
        crate::dto::webhook_dto::GenerateResponse,
        crate::dto::webhook_dto::ErrorResponse,
    )),
    tags((name = "Webhooks", description = "Captured webhook inspection"))
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Full application router: capture endpoint, inspection API, docs and health.
pub fn build_router(state: AppState) -> Router {
    let capture_path = state.config.capture_path.trim_end_matches('/').to_string();
    let capture_path = if capture_path.is_empty() {
        "/".to_string()
    } else {
        capture_path
    };
    let capture_rest = format!("{}/*rest", capture_path.trim_end_matches('/'));
    let body_limit = state.config.max_body_bytes;

    let capture_routes = Router::new()
        .route(&capture_path, any(capture::capture_webhook))
        .route(&capture_rest, any(capture::capture_webhook));

    let api = Router::new()
        .route("/api/webhooks", get(webhooks::list_webhooks))
        .route(
            "/api/webhooks/:id",
            get(webhooks::get_webhook).delete(webhooks::delete_webhook),
        )
        .route("/api/generate", post(generate::generate_handler))
        .route("/api/openapi.json", get(openapi_json));

    Router::new()
        .route("/health", get(health::health))
        .merge(api)
        .merge(capture_routes)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit))
}
