use axum::http::{header, HeaderMap, Method, StatusCode};
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::models::webhook::Webhook;
use crate::store::WebhookStore;
use crate::utils::id::IdGenerator;
use crate::utils::time::{now, timestamp_of};

/// The parts of an inbound HTTP exchange that end up in a captured webhook.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub remote_ip: Option<String>,
    pub body: Bytes,
}

#[derive(Clone)]
pub struct CaptureService {
    store: Arc<dyn WebhookStore>,
    ids: Arc<IdGenerator>,
}

impl CaptureService {
    pub fn new(store: Arc<dyn WebhookStore>, ids: Arc<IdGenerator>) -> Self {
        Self { store, ids }
    }

    /// Persists one inbound request. The insert runs on its own task so that it
    /// completes even if the caller's future is dropped mid-write.
    pub async fn capture(&self, request: InboundRequest, status: StatusCode) -> Result<Webhook> {
        let id = self.ids.next_id();
        let webhook = build_webhook(id, request, status);

        let store = self.store.clone();
        let record = webhook.clone();
        let write = tokio::spawn(async move { store.insert(&record).await });

        match write.await {
            Ok(Ok(())) => {
                tracing::info!(
                    webhook_id = %webhook.id,
                    method = %webhook.method,
                    path = %webhook.path_name,
                    content_length = webhook.content_length,
                    "webhook captured"
                );
                Ok(webhook)
            }
            Ok(Err(e)) => {
                tracing::error!(webhook_id = %id, error = ?e, "failed to store captured webhook");
                Err(Error::CaptureFailed(e.to_string()))
            }
            Err(e) => Err(Error::CaptureFailed(format!("capture task aborted: {}", e))),
        }
    }
}

fn build_webhook(id: uuid::Uuid, request: InboundRequest, status: StatusCode) -> Webhook {
    let body = body_text(id, request.body);
    let content_type = request
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let ip = forwarded_for(&request.headers).or(request.remote_ip);

    Webhook {
        id,
        method: request.method.to_string(),
        path_name: request.path,
        ip,
        status_code: status.as_u16() as i32,
        content_type,
        content_length: body.len() as i64,
        query_params: request.query.as_deref().and_then(parse_query),
        headers: collect_headers(&request.headers),
        body,
        created_at: timestamp_of(&id).unwrap_or_else(now),
    }
}

fn body_text(id: uuid::Uuid, raw: Bytes) -> String {
    match String::from_utf8(raw.to_vec()) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(webhook_id = %id, "webhook body is not valid UTF-8, storing lossy text");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}

/// Flattens a header map; repeated headers are joined with ", ".
pub fn collect_headers(headers: &HeaderMap) -> HashMap<String, String> {
    let mut out: HashMap<String, String> = HashMap::with_capacity(headers.keys_len());
    for (name, value) in headers.iter() {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        out.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    out
}

fn parse_query(query: &str) -> Option<HashMap<String, String>> {
    if query.is_empty() {
        return None;
    }
    Some(url::form_urlencoded::parse(query.as_bytes()).into_owned().collect())
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
