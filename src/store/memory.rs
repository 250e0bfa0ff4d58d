use async_trait::async_trait;
use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::WebhookStore;
use crate::error::{Error, Result};
use crate::models::webhook::{ListOrder, Webhook};

/// Process-local store keyed by id. Used when no database is configured and in
/// tests. Writers take the lock exclusively; readers share it.
#[derive(Debug, Default)]
pub struct InMemoryWebhookStore {
    rows: RwLock<BTreeMap<Uuid, Webhook>>,
}

impl InMemoryWebhookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WebhookStore for InMemoryWebhookStore {
    async fn insert(&self, webhook: &Webhook) -> Result<()> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&webhook.id) {
            return Err(Error::DuplicateId(webhook.id));
        }
        rows.insert(webhook.id, webhook.clone());
        Ok(())
    }

    async fn insert_many(&self, webhooks: &[Webhook]) -> Result<u64> {
        let mut rows = self.rows.write().await;
        let mut batch = BTreeMap::new();
        for webhook in webhooks {
            if rows.contains_key(&webhook.id) || batch.contains_key(&webhook.id) {
                return Err(Error::DuplicateId(webhook.id));
            }
            batch.insert(webhook.id, webhook.clone());
        }
        let inserted = batch.len() as u64;
        rows.append(&mut batch);
        Ok(inserted)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Webhook> {
        self.rows
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Webhook {} not found", id)))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<u64> {
        Ok(self.rows.write().await.remove(&id).map_or(0, |_| 1))
    }

    async fn clear(&self) -> Result<u64> {
        let mut rows = self.rows.write().await;
        let removed = rows.len() as u64;
        rows.clear();
        Ok(removed)
    }

    async fn page(
        &self,
        cursor: Option<Uuid>,
        limit: i64,
        order: ListOrder,
    ) -> Result<Vec<Webhook>> {
        let limit = limit.max(0) as usize;
        let rows = self.rows.read().await;
        let page = match (order, cursor) {
            (ListOrder::Desc, Some(c)) => rows
                .range(..c)
                .rev()
                .take(limit)
                .map(|(_, w)| w.clone())
                .collect(),
            (ListOrder::Desc, None) => rows.values().rev().take(limit).cloned().collect(),
            (ListOrder::Asc, Some(c)) => rows
                .range((Excluded(c), Unbounded))
                .take(limit)
                .map(|(_, w)| w.clone())
                .collect(),
            (ListOrder::Asc, None) => rows.values().take(limit).cloned().collect(),
        };
        Ok(page)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Webhook>> {
        let rows = self.rows.read().await;
        let mut found: Vec<Webhook> = ids.iter().filter_map(|id| rows.get(id).cloned()).collect();
        found.sort_by_key(|w| w.id);
        found.dedup_by_key(|w| w.id);
        Ok(found)
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.rows.read().await.len() as i64)
    }
}
