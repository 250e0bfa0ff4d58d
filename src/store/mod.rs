//! Persistence seam for captured webhooks.
//!
//! Every service receives an `Arc<dyn WebhookStore>`; the PostgreSQL store is used
//! in production and the in-memory store when no database is configured.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::webhook::{ListOrder, Webhook};

pub use memory::InMemoryWebhookStore;
pub use postgres::PgWebhookStore;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebhookStore: Send + Sync {
    /// Fails with `DuplicateId` when the id is already stored.
    async fn insert(&self, webhook: &Webhook) -> Result<()>;

    /// All or nothing: on error the store is left unchanged.
    async fn insert_many(&self, webhooks: &[Webhook]) -> Result<u64>;

    async fn get_by_id(&self, id: Uuid) -> Result<Webhook>;

    /// Returns the number of removed rows; a missing id removes 0.
    async fn delete_by_id(&self, id: Uuid) -> Result<u64>;

    async fn clear(&self) -> Result<u64>;

    /// Up to `limit` webhooks strictly past `cursor` in `order`.
    async fn page(&self, cursor: Option<Uuid>, limit: i64, order: ListOrder)
        -> Result<Vec<Webhook>>;

    /// Matching webhooks in ascending id order; unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Webhook>>;

    async fn count(&self) -> Result<i64>;
}

/// PostgreSQL when `DATABASE_URL` is set (migrations applied), otherwise the
/// process-local store.
pub async fn connect(config: &crate::config::Config) -> Result<std::sync::Arc<dyn WebhookStore>> {
    match &config.database_url {
        Some(url) => {
            let pool = crate::database::pool::create_pool(config, url).await?;
            crate::database::pool::run_migrations(&pool).await?;
            tracing::info!("using PostgreSQL webhook store");
            Ok(std::sync::Arc::new(PgWebhookStore::new(pool)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, captured webhooks are kept in memory only");
            Ok(std::sync::Arc::new(InMemoryWebhookStore::new()))
        }
    }
}
