use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    dto::webhook_dto::{GenerateRequest, GenerateResponse},
    error::Result,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/generate",
    tag = "Webhooks",
    request_body = GenerateRequest,
    responses(
        (status = 201, description = "Handler code generated from the selected webhooks", body = GenerateResponse),
        (status = 400, description = "No webhooks selected", body = crate::dto::webhook_dto::ErrorResponse),
        (status = 404, description = "None of the selected webhooks exist", body = crate::dto::webhook_dto::ErrorResponse),
        (status = 502, description = "Generation service failed", body = crate::dto::webhook_dto::ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn generate_handler(
    State(state): State<AppState>,
    Json(payload): Json<GenerateRequest>,
) -> Result<impl IntoResponse> {
    let code = state
        .generation_service
        .summarize(&payload.webhook_ids)
        .await?;
    Ok((StatusCode::CREATED, Json(GenerateResponse { code })))
}
