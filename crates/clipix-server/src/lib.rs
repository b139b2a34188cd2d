//! # clipix-server
//!
//! HTTP API for the Clipix mobile client. Provides:
//!
//! - `POST /api/chat` and `POST /api/teach` for conversations and teaching
//! - `GET /api/stats` for knowledge base statistics
//! - `GET /`, `GET /health`, and `GET /metrics` for monitoring

pub mod metrics;

use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, Request, StatusCode},
    middleware::{self, Next},
    response::{Json, Response},
    routing::{get, post},
};
use clipix_config::schema::ServerConfig;
use clipix_core::DEFAULT_CATEGORY;
use clipix_runtime::Assistant;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Name reported by `/` and `/health`.
pub const SERVICE_NAME: &str = "Clipix AI Mobile API";

const CHAT_ERROR_REPLY: &str = "🤖 Sorry, I encountered an error";

/// Shared server state.
pub struct AppState {
    pub config: ServerConfig,
    pub assistant: Arc<Assistant>,
    /// How long the assistant took to load, reported by `/`.
    pub load_time: Duration,
    /// Prometheus-compatible metrics.
    pub metrics: metrics::Metrics,
}

#[derive(Serialize)]
struct HomeResponse {
    message: &'static str,
    status: &'static str,
    facts: usize,
    load_time: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    facts: usize,
    /// Unix time in seconds.
    timestamp: f64,
}

/// Chat request body sent by the mobile client.
#[derive(Deserialize)]
struct ChatRequest {
    #[serde(rename = "userId", default)]
    user_id: Option<String>,
    #[serde(default)]
    message: String,
    /// Earlier turns; logged only, answers don't depend on them.
    #[serde(rename = "conversationHistory", default)]
    conversation_history: Vec<serde_json::Value>,
}

#[derive(Serialize)]
struct ChatResponse {
    response: String,
}

#[derive(Deserialize)]
struct TeachRequest {
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    fact: Option<String>,
}

#[derive(Serialize, Default)]
struct TeachResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_facts: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl TeachResponse {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

#[derive(Serialize)]
struct StatsResponse {
    total_facts: usize,
    total_topics: usize,
    topics: BTreeMap<String, usize>,
    google_enabled: bool,
    deepseek_enabled: bool,
}

/// Build the Axum router.
pub fn build_router(config: ServerConfig, assistant: Arc<Assistant>, load_time: Duration) -> Router {
    let state = Arc::new(AppState {
        config: config.clone(),
        assistant,
        load_time,
        metrics: metrics::Metrics::new(),
    });

    let api_routes = Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/api/teach", post(teach_handler))
        .route("/api/stats", get(stats_handler));

    // Apply API key auth if configured
    let api_routes = if config.api_key.is_some() {
        api_routes.layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
    } else {
        api_routes
    };

    let mut router = Router::new()
        .route("/", get(home_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .merge(api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if config.cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
}

async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    request: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    if let Some(ref expected_key) = state.config.api_key {
        let provided = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        match provided {
            Some(key) if key == expected_key => {}
            _ => {
                warn!("unauthorized API request: invalid or missing API key");
                state.metrics.inc_auth_rejections();
                return Err(StatusCode::UNAUTHORIZED);
            }
        }
    }
    Ok(next.run(request).await)
}

async fn home_handler(State(state): State<Arc<AppState>>) -> Json<HomeResponse> {
    state.metrics.inc_http_requests();
    Json(HomeResponse {
        message: SERVICE_NAME,
        status: "running",
        facts: state.assistant.total_facts(),
        load_time: format!("{:.2}s", state.load_time.as_secs_f64()),
    })
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    state.metrics.inc_http_requests();
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        facts: state.assistant.total_facts(),
        timestamp: chrono::Utc::now().timestamp_millis() as f64 / 1000.0,
    })
}

/// Prometheus-compatible metrics endpoint.
async fn metrics_handler(
    State(state): State<Arc<AppState>>,
) -> (
    StatusCode,
    [(axum::http::header::HeaderName, &'static str); 1],
    String,
) {
    let body = state
        .metrics
        .render_prometheus(state.assistant.total_facts());
    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        body,
    )
}

async fn chat_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Json<ChatResponse> {
    state.metrics.inc_http_requests();
    state.metrics.inc_chat_messages();

    let req = match body {
        Ok(Json(req)) => req,
        Err(e) => {
            warn!(error = %e, "bad chat request");
            return Json(ChatResponse {
                response: CHAT_ERROR_REPLY.into(),
            });
        }
    };

    info!(
        user = req.user_id.as_deref().unwrap_or("default"),
        history = req.conversation_history.len(),
        message = %req.message,
        "chat message"
    );

    let answer = state.assistant.chat(&req.message).await;
    state.metrics.record_answer(&answer);

    Json(ChatResponse {
        response: answer.to_string(),
    })
}

async fn teach_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<TeachRequest>, JsonRejection>,
) -> Json<TeachResponse> {
    state.metrics.inc_http_requests();
    state.metrics.inc_teach_requests();

    let req = match body {
        Ok(Json(req)) => req,
        Err(e) => return Json(TeachResponse::failure(e.body_text())),
    };

    let fact = req.fact.as_deref().unwrap_or("").trim();
    if fact.is_empty() {
        return Json(TeachResponse::failure("No fact provided"));
    }
    let topic = req.topic.as_deref().unwrap_or(DEFAULT_CATEGORY);

    match state.assistant.teach(topic, fact) {
        Ok(outcome) => {
            state.metrics.inc_facts_learned();
            let preview: String = outcome.fact.chars().take(50).collect();
            Json(TeachResponse {
                success: true,
                message: Some(format!("✅ Learned: {preview}...")),
                topic: Some(outcome.category),
                total_facts: Some(outcome.total_facts),
                error: None,
            })
        }
        Err(e) => {
            warn!(error = %e, "teach failed");
            Json(TeachResponse::failure(e.to_string()))
        }
    }
}

async fn stats_handler(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    state.metrics.inc_http_requests();
    let stats = state.assistant.stats();
    Json(StatsResponse {
        total_facts: stats.total_facts,
        total_topics: stats.total_topics(),
        topics: stats.topics,
        google_enabled: stats.search_enabled,
        deepseek_enabled: stats.llm_enabled,
    })
}

/// Start the HTTP server.
pub async fn start_server(
    config: ServerConfig,
    assistant: Arc<Assistant>,
    load_time: Duration,
) -> clipix_core::Result<()> {
    let listen = config.listen.clone();
    let router = build_router(config, assistant, load_time);

    info!(listen = %listen, "starting HTTP server");

    let listener = tokio::net::TcpListener::bind(&listen)
        .await
        .map_err(|e| clipix_core::ClipixError::Config(format!("failed to bind {}: {}", listen, e)))?;

    axum::serve(listener, router)
        .await
        .map_err(clipix_core::ClipixError::Io)?;

    Ok(())
}
