//! Runs against a live database: `DATABASE_URL=... cargo test -- --ignored`.
//! Each test clears the `webhooks` table, so point it at a scratch database.

use std::collections::HashMap;

use webhook_inspector::{
    config::Config,
    database::pool::{create_pool, run_migrations},
    error::Error,
    models::webhook::{ListOrder, Webhook},
    store::{PgWebhookStore, WebhookStore},
    utils::{id::IdGenerator, time::timestamp_of},
};

async fn setup_store() -> PgWebhookStore {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = create_pool(&Config::default(), &url).await.expect("pool");
    run_migrations(&pool).await.expect("migrations");
    let store = PgWebhookStore::new(pool);
    store.clear().await.expect("clear");
    store
}

fn webhook(ids: &IdGenerator, body: &str) -> Webhook {
    let id = ids.next_id();
    Webhook {
        id,
        method: "POST".to_string(),
        path_name: "/capture".to_string(),
        ip: Some("198.51.100.4".to_string()),
        status_code: 200,
        content_type: Some("application/json".to_string()),
        content_length: body.len() as i64,
        query_params: Some(HashMap::from([("source".to_string(), "pg".to_string())])),
        headers: HashMap::from([("content-type".to_string(), "application/json".to_string())]),
        body: body.to_string(),
        created_at: timestamp_of(&id).unwrap(),
    }
}

#[tokio::test]
#[ignore]
async fn insert_get_and_delete_round_trip() {
    let store = setup_store().await;
    let ids = IdGenerator::new();
    let stored = webhook(&ids, r#"{"ok":true}"#);

    store.insert(&stored).await.unwrap();
    let fetched = store.get_by_id(stored.id).await.unwrap();
    assert_eq!(fetched.body, stored.body);
    assert_eq!(fetched.headers, stored.headers);
    assert_eq!(fetched.query_params, stored.query_params);

    let duplicate = store.insert(&stored).await.unwrap_err();
    assert!(matches!(duplicate, Error::DuplicateId(id) if id == stored.id));

    assert_eq!(store.delete_by_id(stored.id).await.unwrap(), 1);
    assert_eq!(store.delete_by_id(stored.id).await.unwrap(), 0);
    assert!(matches!(
        store.get_by_id(stored.id).await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
#[ignore]
async fn pages_follow_id_order_in_both_directions() {
    let store = setup_store().await;
    let ids = IdGenerator::new();
    let rows: Vec<Webhook> = ["a", "b", "c", "d"].iter().map(|b| webhook(&ids, b)).collect();
    assert_eq!(store.insert_many(&rows).await.unwrap(), 4);

    let newest = store.page(None, 3, ListOrder::Desc).await.unwrap();
    let bodies: Vec<&str> = newest.iter().map(|w| w.body.as_str()).collect();
    assert_eq!(bodies, ["d", "c", "b"]);

    let after_b = store.page(Some(rows[1].id), 10, ListOrder::Desc).await.unwrap();
    assert_eq!(after_b.len(), 1);
    assert_eq!(after_b[0].body, "a");

    let oldest = store.page(Some(rows[1].id), 10, ListOrder::Asc).await.unwrap();
    let bodies: Vec<&str> = oldest.iter().map(|w| w.body.as_str()).collect();
    assert_eq!(bodies, ["c", "d"]);

    let selected = store
        .find_by_ids(&[rows[3].id, rows[0].id, uuid::Uuid::new_v4()])
        .await
        .unwrap();
    assert_eq!(selected.len(), 2);
    assert_eq!(selected[0].body, "a");
    assert_eq!(selected[1].body, "d");
}

#[tokio::test]
#[ignore]
async fn failed_batch_leaves_table_unchanged() {
    let store = setup_store().await;
    let ids = IdGenerator::new();
    let existing = webhook(&ids, "existing");
    store.insert(&existing).await.unwrap();

    let batch = vec![webhook(&ids, "new"), existing.clone()];
    assert!(store.insert_many(&batch).await.is_err());
    assert_eq!(store.count().await.unwrap(), 1);
}
