use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::webhook::{ListOrder, Webhook};
use crate::services::webhook_service::WebhookPage;

pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WebhookListQuery {
    /// Id of the last webhook of the previous page.
    pub cursor: Option<String>,
    /// Page size; values outside 1..=100 are clamped.
    pub limit: Option<i64>,
    pub order: Option<ListOrder>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookListResponse {
    pub webhooks: Vec<Webhook>,
    pub next_cursor: Option<Uuid>,
}

impl From<WebhookPage> for WebhookListResponse {
    fn from(page: WebhookPage) -> Self {
        Self {
            webhooks: page.items,
            next_cursor: page.next_cursor,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub webhook_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerateResponse {
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CaptureResponse {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}
