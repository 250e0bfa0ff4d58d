use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;

/// One captured inbound request. Never updated after insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    pub id: Uuid,
    pub method: String,
    pub path_name: String,
    pub ip: Option<String>,
    pub status_code: i32,
    pub content_type: Option<String>,
    pub content_length: i64,
    pub query_params: Option<HashMap<String, String>>,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct WebhookRow {
    pub id: Uuid,
    pub method: String,
    pub path_name: String,
    pub ip: Option<String>,
    pub status_code: i32,
    pub content_type: Option<String>,
    pub content_length: i64,
    pub query_params: Option<Json<HashMap<String, String>>>,
    pub headers: Json<HashMap<String, String>>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<WebhookRow> for Webhook {
    fn from(row: WebhookRow) -> Self {
        Self {
            id: row.id,
            method: row.method,
            path_name: row.path_name,
            ip: row.ip,
            status_code: row.status_code,
            content_type: row.content_type,
            content_length: row.content_length,
            query_params: row.query_params.map(|q| q.0),
            headers: row.headers.0,
            body: row.body,
            created_at: row.created_at,
        }
    }
}

/// Direction of a listing walk. The cursor is always an exclusive bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ListOrder {
    #[default]
    #[serde(alias = "newest")]
    Desc,
    #[serde(alias = "oldest")]
    Asc,
}
