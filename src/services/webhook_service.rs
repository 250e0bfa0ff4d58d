use std::sync::Arc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::webhook::{ListOrder, Webhook};
use crate::store::WebhookStore;

#[derive(Clone)]
pub struct WebhookService {
    store: Arc<dyn WebhookStore>,
}

#[derive(Debug, Clone)]
pub struct WebhookPage {
    pub items: Vec<Webhook>,
    /// Id of the last returned item when more rows exist past it.
    pub next_cursor: Option<Uuid>,
}

impl WebhookService {
    pub fn new(store: Arc<dyn WebhookStore>) -> Self {
        Self { store }
    }

    /// One page of a forward-only walk. The cursor is an exclusive bound, so it
    /// stays valid after the row it names has been deleted.
    pub async fn list(
        &self,
        cursor: Option<Uuid>,
        page_size: i64,
        order: ListOrder,
    ) -> Result<WebhookPage> {
        if page_size < 1 {
            return Err(Error::BadRequest("page size must be positive".to_string()));
        }

        let mut items = self.store.page(cursor, page_size.saturating_add(1), order).await?;
        let has_more = items.len() as i64 > page_size;
        if has_more {
            items.truncate(page_size as usize);
        }
        let next_cursor = if has_more {
            items.last().map(|w| w.id)
        } else {
            None
        };

        tracing::debug!(
            cursor = ?cursor,
            count = items.len(),
            next_cursor = ?next_cursor,
            "listed webhooks"
        );
        Ok(WebhookPage { items, next_cursor })
    }

    pub async fn get(&self, id: Uuid) -> Result<Webhook> {
        self.store.get_by_id(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64> {
        let affected = self.store.delete_by_id(id).await?;
        tracing::info!(webhook_id = %id, affected, "webhook delete");
        Ok(affected)
    }
}
