use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;
use webhook_inspector::{
    config::Config,
    routes::build_router,
    services::ai_service::CodeGenerator,
    store::{InMemoryWebhookStore, WebhookStore},
    AppState,
};

/// Records every payload it receives and answers with a fixed snippet.
#[derive(Default)]
struct RecordingGenerator {
    calls: Mutex<Vec<String>>,
    fail: bool,
}

#[async_trait]
impl CodeGenerator for RecordingGenerator {
    async fn generate(&self, samples: &str) -> anyhow::Result<String> {
        self.calls.lock().unwrap().push(samples.to_string());
        if self.fail {
            anyhow::bail!("upstream returned 503");
        }
        Ok("export function handleWebhook(event: unknown) {}".to_string())
    }
}

struct TestApp {
    router: Router,
    store: Arc<InMemoryWebhookStore>,
    generator: Arc<RecordingGenerator>,
}

fn setup_app_with(config: Config, generator: RecordingGenerator) -> TestApp {
    let store = Arc::new(InMemoryWebhookStore::new());
    let generator = Arc::new(generator);
    let state = AppState::new(config, store.clone(), generator.clone());
    TestApp {
        router: build_router(state),
        store,
        generator,
    }
}

fn setup_app() -> TestApp {
    setup_app_with(Config::default(), RecordingGenerator::default())
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn capture(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/capture/stripe?source=test")
        .header("content-type", "application/json")
        .header("x-forwarded-for", "203.0.113.9")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn capture_many(router: &Router, bodies: &[&str]) -> Vec<Uuid> {
    let mut ids = Vec::new();
    for body in bodies {
        let (status, json) = send(router, capture(body)).await;
        assert_eq!(status, StatusCode::OK);
        ids.push(json["id"].as_str().unwrap().parse().unwrap());
    }
    ids
}

#[tokio::test]
async fn captured_request_is_stored_verbatim() {
    let app = setup_app();
    let payload = r#"{"type":"charge.succeeded","amount":2000}"#;

    let ids = capture_many(&app.router, &[payload]).await;
    let (status, webhook) = send(&app.router, get(&format!("/api/webhooks/{}", ids[0]))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(webhook["method"], "POST");
    assert_eq!(webhook["pathName"], "/capture/stripe");
    assert_eq!(webhook["ip"], "203.0.113.9");
    assert_eq!(webhook["statusCode"], 200);
    assert_eq!(webhook["contentType"], "application/json");
    assert_eq!(webhook["contentLength"], payload.len());
    assert_eq!(webhook["queryParams"]["source"], "test");
    assert_eq!(webhook["headers"]["content-type"], "application/json");
    assert_eq!(webhook["body"], payload);
    assert!(webhook["createdAt"].is_string());
}

#[tokio::test]
async fn capture_accepts_any_method_and_uses_configured_status() {
    let config = Config {
        capture_status_code: StatusCode::ACCEPTED,
        ..Config::default()
    };
    let app = setup_app_with(config, RecordingGenerator::default());

    for method in ["PUT", "PATCH", "DELETE", "GET"] {
        let request = Request::builder()
            .method(method)
            .uri("/capture")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app.router, request).await;
        assert_eq!(status, StatusCode::ACCEPTED, "{method}");
        assert!(body["id"].is_string());
    }
    assert_eq!(app.store.count().await.unwrap(), 4);
}

#[tokio::test]
async fn list_walks_newest_first_with_cursor() {
    let app = setup_app();
    let ids = capture_many(&app.router, &["a", "b", "c", "d", "e"]).await;

    let (status, first) = send(&app.router, get("/api/webhooks?limit=2")).await;
    assert_eq!(status, StatusCode::OK);
    let first_ids: Vec<&str> = first["webhooks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["body"].as_str().unwrap())
        .collect();
    assert_eq!(first_ids, ["e", "d"]);
    assert_eq!(first["nextCursor"], ids[3].to_string());

    let (_, second) = send(
        &app.router,
        get(&format!("/api/webhooks?limit=2&cursor={}", ids[3])),
    )
    .await;
    assert_eq!(second["webhooks"][0]["body"], "c");
    assert_eq!(second["webhooks"][1]["body"], "b");
    assert_eq!(second["nextCursor"], ids[1].to_string());

    let (_, last) = send(
        &app.router,
        get(&format!("/api/webhooks?limit=2&cursor={}", ids[1])),
    )
    .await;
    assert_eq!(last["webhooks"].as_array().unwrap().len(), 1);
    assert_eq!(last["webhooks"][0]["body"], "a");
    assert!(last["nextCursor"].is_null());
}

#[tokio::test]
async fn list_supports_oldest_first() {
    let app = setup_app();
    capture_many(&app.router, &["a", "b", "c"]).await;

    let (status, page) = send(&app.router, get("/api/webhooks?order=asc&limit=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["webhooks"][0]["body"], "a");
    assert_eq!(page["webhooks"][1]["body"], "b");
    assert!(page["nextCursor"].is_string());
}

#[tokio::test]
async fn empty_store_lists_nothing() {
    let app = setup_app();
    let (status, page) = send(&app.router, get("/api/webhooks")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["webhooks"], json!([]));
    assert!(page["nextCursor"].is_null());
}

#[tokio::test]
async fn malformed_cursor_is_rejected() {
    let app = setup_app();

    let (status, body) = send(&app.router, get("/api/webhooks?cursor=not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_request");
}

#[tokio::test]
async fn out_of_range_limits_are_clamped() {
    let app = setup_app();
    let bodies: Vec<String> = (0..105).map(|n| n.to_string()).collect();
    let refs: Vec<&str> = bodies.iter().map(String::as_str).collect();
    capture_many(&app.router, &refs).await;

    let (status, page) = send(&app.router, get("/api/webhooks?limit=500")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["webhooks"].as_array().unwrap().len(), 100);
    assert!(page["nextCursor"].is_string());

    for limit in ["0", "-3"] {
        let (status, page) = send(&app.router, get(&format!("/api/webhooks?limit={limit}"))).await;
        assert_eq!(status, StatusCode::OK, "limit={limit}");
        assert_eq!(page["webhooks"].as_array().unwrap().len(), 1);
        assert_eq!(page["webhooks"][0]["body"], "104");
    }
}

#[tokio::test]
async fn delete_is_idempotent() {
    let app = setup_app();
    let ids = capture_many(&app.router, &["doomed"]).await;
    let uri = format!("/api/webhooks/{}", ids[0]);

    for _ in 0..2 {
        let request = Request::builder()
            .method("DELETE")
            .uri(&uri)
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app.router, request).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    let (status, body) = send(&app.router, get(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

fn generate(ids: &[Uuid]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/generate")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "webhookIds": ids }).to_string()))
        .unwrap()
}

#[tokio::test]
async fn generate_sends_joined_bodies_once() {
    let app = setup_app();
    let ids = capture_many(&app.router, &["{\"n\":1}", "{\"n\":2}", "{\"n\":3}"]).await;

    let (status, body) = send(&app.router, generate(&[ids[2], ids[0], Uuid::new_v4()])).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["code"], "export function handleWebhook(event: unknown) {}");
    let calls = app.generator.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0], "{\"n\":1}\n\n{\"n\":3}");
}

#[tokio::test]
async fn generate_rejects_empty_and_unknown_selections() {
    let app = setup_app();

    let (status, body) = send(&app.router, generate(&[])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "empty_selection");

    let (status, body) = send(&app.router, generate(&[Uuid::new_v4()])).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "no_matching_records");

    assert!(app.generator.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn generator_failure_maps_to_bad_gateway() {
    let app = setup_app_with(
        Config::default(),
        RecordingGenerator {
            fail: true,
            ..Default::default()
        },
    );
    let ids = capture_many(&app.router, &["{}"]).await;

    let (status, body) = send(&app.router, generate(&ids)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "generation_failed");
}

#[tokio::test]
async fn health_and_openapi_are_served() {
    let app = setup_app();

    capture_many(&app.router, &["{}"]).await;
    let (status, health) = send(&app.router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");
    assert_eq!(health["webhooks"], 1);

    let (status, doc) = send(&app.router, get("/api/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/webhooks"].is_object());
    assert!(doc["paths"]["/api/generate"].is_object());
}
