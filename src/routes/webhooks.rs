use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::{
    dto::webhook_dto::{WebhookListQuery, WebhookListResponse, MAX_PAGE_SIZE},
    error::{Error, Result},
    models::webhook::Webhook,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/webhooks",
    tag = "Webhooks",
    params(WebhookListQuery),
    responses(
        (status = 200, description = "One page of captured webhooks, newest first by default", body = WebhookListResponse),
        (status = 400, description = "Malformed cursor", body = crate::dto::webhook_dto::ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn list_webhooks(
    State(state): State<AppState>,
    Query(query): Query<WebhookListQuery>,
) -> Result<impl IntoResponse> {
    let cursor = parse_cursor(query.cursor.as_deref())?;
    let page_size = query
        .limit
        .unwrap_or(state.config.page_size)
        .clamp(1, MAX_PAGE_SIZE);
    let page = state
        .webhook_service
        .list(cursor, page_size, query.order.unwrap_or_default())
        .await?;
    Ok(Json(WebhookListResponse::from(page)))
}

#[utoipa::path(
    get,
    path = "/api/webhooks/{id}",
    tag = "Webhooks",
    params(
        ("id" = Uuid, Path, description = "Webhook ID")
    ),
    responses(
        (status = 200, description = "Webhook found", body = Webhook),
        (status = 404, description = "Webhook not found", body = crate::dto::webhook_dto::ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn get_webhook(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Webhook>> {
    let webhook = state.webhook_service.get(id).await?;
    Ok(Json(webhook))
}

#[utoipa::path(
    delete,
    path = "/api/webhooks/{id}",
    tag = "Webhooks",
    params(
        ("id" = Uuid, Path, description = "Webhook ID")
    ),
    responses(
        (status = 204, description = "Webhook deleted, or it did not exist")
    )
)]
#[axum::debug_handler]
pub async fn delete_webhook(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.webhook_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_cursor(raw: Option<&str>) -> Result<Option<Uuid>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => Uuid::parse_str(value)
            .map(Some)
            .map_err(|_| Error::BadRequest(format!("Invalid cursor: {}", value))),
    }
}
