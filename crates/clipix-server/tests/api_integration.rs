//! HTTP API integration tests: every endpoint against a temp knowledge file.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use clipix_config::AssistantConfig;
use clipix_config::schema::ServerConfig;
use clipix_llm::MockProvider;
use clipix_memory::{ExpirationPolicy, FactStore};
use clipix_runtime::Assistant;
use clipix_search::MockSearch;
use std::sync::Arc;
use std::time::Duration;

fn open_store(dir: &tempfile::TempDir) -> FactStore {
    FactStore::open(dir.path().join("knowledge.json"), &ExpirationPolicy::default())
}

fn router_for(assistant: Assistant, api_key: Option<&str>) -> axum::Router {
    let server_config = ServerConfig {
        cors: false,
        api_key: api_key.map(str::to_string),
        ..Default::default()
    };
    clipix_server::build_router(
        server_config,
        Arc::new(assistant),
        Duration::from_millis(1250),
    )
}

/// Router over an empty store with no search or LLM.
fn setup(dir: &tempfile::TempDir) -> axum::Router {
    router_for(Assistant::new(open_store(dir), AssistantConfig::default()), None)
}

/// Helper to read the full body bytes from a response.
async fn body_string(resp: axum::response::Response) -> String {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    serde_json::from_str(&body_string(resp).await).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ── Home, Health & Metrics ─────────────────────────────────────

#[tokio::test]
async fn test_home_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let resp = setup(&dir)
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["message"], "Clipix AI Mobile API");
    assert_eq!(json["status"], "running");
    assert_eq!(json["facts"], 0);
    assert_eq!(json["load_time"], "1.25s");
}

#[tokio::test]
async fn test_health_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let resp = setup(&dir)
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "Clipix AI Mobile API");
    assert_eq!(json["facts"], 0);
    assert!(json["timestamp"].as_f64().unwrap() > 1_600_000_000.0);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let resp = setup(&dir)
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let ct = resp
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(ct.starts_with("text/plain"));
    let body = body_string(resp).await;
    assert!(body.contains("clipix_uptime_seconds"));
    assert!(body.contains("clipix_facts 0"));
}

// ── Teach ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_teach_then_stats() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup(&dir);

    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/teach",
            serde_json::json!({
                "topic": "geography",
                "fact": "The capital of France is Paris, a major European city."
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["topic"], "geography");
    assert_eq!(json["total_facts"], 1);
    assert_eq!(
        json["message"],
        "✅ Learned: The capital of France is Paris, a major European ..."
    );

    let resp = app
        .oneshot(Request::get("/api/stats").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["total_facts"], 1);
    assert_eq!(json["total_topics"], 1);
    assert_eq!(json["topics"]["geography"], 1);
    assert_eq!(json["google_enabled"], false);
    assert_eq!(json["deepseek_enabled"], false);

    // Persisted straight away
    let reopened = open_store(&dir);
    assert_eq!(reopened.total_facts(), 1);
}

#[tokio::test]
async fn test_teach_defaults_topic_to_general() {
    let dir = tempfile::tempdir().unwrap();
    let resp = setup(&dir)
        .oneshot(post_json(
            "/api/teach",
            serde_json::json!({ "fact": "Honey never spoils when sealed." }),
        ))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["topic"], "general");
}

#[tokio::test]
async fn test_teach_without_fact() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup(&dir);

    for body in [
        serde_json::json!({ "topic": "science" }),
        serde_json::json!({ "topic": "science", "fact": "   " }),
    ] {
        let resp = app.clone().oneshot(post_json("/api/teach", body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "No fact provided");
        assert!(json.get("total_facts").is_none());
    }
}

#[tokio::test]
async fn test_teach_malformed_body() {
    let dir = tempfile::tempdir().unwrap();
    let req = Request::post("/api/teach")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let resp = setup(&dir).oneshot(req).await.unwrap();

    let json = body_json(resp).await;
    assert_eq!(json["success"], false);
    assert!(json["error"].is_string());
}

// ── Chat ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_chat_answers_from_memory() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open_store(&dir);
    store
        .teach(
            "geography",
            "The capital of France is Paris, a major European city.",
        )
        .unwrap();
    let app = router_for(Assistant::new(store, AssistantConfig::default()), None);

    let resp = app
        .oneshot(post_json(
            "/api/chat",
            serde_json::json!({
                "userId": "phone-1",
                "message": "What is the capital of France?",
                "conversationHistory": [{ "role": "user", "text": "hi" }]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    let reply = json["response"].as_str().unwrap();
    assert!(reply.starts_with("🤖 The capital of France is Paris"));
    assert!(reply.contains("⚡("));
}

#[tokio::test]
async fn test_chat_learns_from_search() {
    let dir = tempfile::tempdir().unwrap();
    let search = MockSearch::new().with_hit(
        "Volcano",
        "Volcanoes form where magma rises through cracks in the crust.",
    );
    let assistant =
        Assistant::new(open_store(&dir), AssistantConfig::default()).with_search(Arc::new(search));
    let app = router_for(assistant, None);

    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/chat",
            serde_json::json!({ "message": "How do volcanoes form" }),
        ))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert!(
        json["response"]
            .as_str()
            .unwrap()
            .starts_with("🔍 Volcano: Volcanoes form")
    );

    let resp = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = body_string(resp).await;
    assert!(body.contains("clipix_search_answers_total 1"));
    assert!(body.contains("clipix_facts_learned_total 1"));
    assert!(body.contains("clipix_facts 1"));
}

#[tokio::test]
async fn test_chat_unknown_without_sources() {
    let dir = tempfile::tempdir().unwrap();
    let resp = setup(&dir)
        .oneshot(post_json(
            "/api/chat",
            serde_json::json!({ "message": "Describe quantum tunnelling" }),
        ))
        .await
        .unwrap();
    let json = body_json(resp).await;
    let reply = json["response"].as_str().unwrap();
    assert!(reply.starts_with("🤖 I don't know about that yet"));
}

#[tokio::test]
async fn test_chat_falls_back_to_llm() {
    let dir = tempfile::tempdir().unwrap();
    let llm = MockProvider::new("mock")
        .with_response("Quantum tunnelling lets particles cross barriers they classically could not.");
    let assistant = Assistant::new(open_store(&dir), AssistantConfig::default())
        .with_search(Arc::new(MockSearch::new().with_no_results()))
        .with_llm(Arc::new(llm));

    let resp = router_for(assistant, None)
        .oneshot(post_json(
            "/api/chat",
            serde_json::json!({ "message": "Describe quantum tunnelling" }),
        ))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert!(
        json["response"]
            .as_str()
            .unwrap()
            .starts_with("🧠 Quantum tunnelling lets particles")
    );
}

#[tokio::test]
async fn test_chat_malformed_body() {
    let dir = tempfile::tempdir().unwrap();
    let req = Request::post("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from("{\"message\": 42"))
        .unwrap();
    let resp = setup(&dir).oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["response"], "🤖 Sorry, I encountered an error");
}

// ── Auth ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_api_key_required_on_api_routes() {
    let dir = tempfile::tempdir().unwrap();
    let app = router_for(
        Assistant::new(open_store(&dir), AssistantConfig::default()),
        Some("secret"),
    );

    let resp = app
        .clone()
        .oneshot(Request::get("/api/stats").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app
        .clone()
        .oneshot(
            Request::get("/api/stats")
                .header("authorization", "Bearer wrong")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app
        .clone()
        .oneshot(
            Request::get("/api/stats")
                .header("authorization", "Bearer secret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Monitoring routes stay open
    let resp = app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = body_string(resp).await;
    assert!(body.contains("clipix_auth_rejections_total 2"));
}
