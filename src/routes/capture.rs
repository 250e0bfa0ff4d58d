use axum::{
    extract::{ConnectInfo, State},
    http::{HeaderMap, Method, Uri},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use std::net::SocketAddr;

use crate::{
    dto::webhook_dto::CaptureResponse, error::Result, services::capture_service::InboundRequest,
    AppState,
};

/// Accepts any method on the capture path and answers with the configured status.
pub async fn capture_webhook(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let request = InboundRequest {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        remote_ip: connect_info.map(|ConnectInfo(addr)| addr.ip().to_string()),
        body,
    };

    let status = state.config.capture_status_code;
    let webhook = state.capture_service.capture(request, status).await?;
    Ok((status, Json(CaptureResponse { id: webhook.id })))
}
