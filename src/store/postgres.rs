use async_trait::async_trait;
use sqlx::postgres::PgExecutor;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::WebhookStore;
use crate::error::{Error, Result};
use crate::models::webhook::{ListOrder, Webhook, WebhookRow};

const SELECT_COLUMNS: &str = r#"
    SELECT id, method, path_name, ip, status_code, content_type, content_length,
           query_params, headers, body, created_at
    FROM webhooks
"#;

#[derive(Clone)]
pub struct PgWebhookStore {
    pool: PgPool,
}

impl PgWebhookStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn insert_one<'e, E>(executor: E, webhook: &Webhook) -> Result<()>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO webhooks (
            id, method, path_name, ip, status_code, content_type, content_length,
            query_params, headers, body, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(webhook.id)
    .bind(&webhook.method)
    .bind(&webhook.path_name)
    .bind(&webhook.ip)
    .bind(webhook.status_code)
    .bind(&webhook.content_type)
    .bind(webhook.content_length)
    .bind(webhook.query_params.as_ref().map(Json))
    .bind(Json(&webhook.headers))
    .bind(&webhook.body)
    .bind(webhook.created_at)
    .execute(executor)
    .await
    .map_err(|e| map_insert_error(e, webhook.id))?;
    Ok(())
}

fn map_insert_error(err: sqlx::Error, id: Uuid) -> Error {
    let duplicate = err
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false);
    if duplicate {
        Error::DuplicateId(id)
    } else {
        err.into()
    }
}

#[async_trait]
impl WebhookStore for PgWebhookStore {
    async fn insert(&self, webhook: &Webhook) -> Result<()> {
        insert_one(&self.pool, webhook).await
    }

    async fn insert_many(&self, webhooks: &[Webhook]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        for webhook in webhooks {
            insert_one(&mut *tx, webhook).await?;
        }
        tx.commit().await?;
        Ok(webhooks.len() as u64)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Webhook> {
        let row = sqlx::query_as::<_, WebhookRow>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Webhook::from)
            .ok_or_else(|| Error::NotFound(format!("Webhook {} not found", id)))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM webhooks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn clear(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM webhooks")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn page(
        &self,
        cursor: Option<Uuid>,
        limit: i64,
        order: ListOrder,
    ) -> Result<Vec<Webhook>> {
        let filter = match order {
            ListOrder::Desc => "WHERE ($1::uuid IS NULL OR id < $1) ORDER BY id DESC LIMIT $2",
            ListOrder::Asc => "WHERE ($1::uuid IS NULL OR id > $1) ORDER BY id ASC LIMIT $2",
        };
        let rows = sqlx::query_as::<_, WebhookRow>(&format!("{SELECT_COLUMNS} {filter}"))
            .bind(cursor)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Webhook::from).collect())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Webhook>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, WebhookRow>(&format!(
            "{SELECT_COLUMNS} WHERE id = ANY($1) ORDER BY id ASC"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Webhook::from).collect())
    }

    async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM webhooks")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }
}
