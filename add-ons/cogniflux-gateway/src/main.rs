//! Cogniflux Gateway: chat, speech and session-report API for the web client.
//!
//! Holds every vendor key server-side; the browser only sends messages and interaction
//! signals. Routes:
//! - `POST /api/chat`   live memory + model reply
//! - `POST /api/speak`  text-to-speech with cognitive-state voice settings
//! - `POST /api/report` Cognitive Journey Report for a transcript
//! - `GET  /health`

mod handlers;
mod state;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Method, Request},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use cogniflux_core::CoreConfig;
use state::AppState;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env first; vendor keys stay in the backend only.
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[cogniflux-gateway] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match CoreConfig::load() {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Config load failed: {}; using defaults", e);
            CoreConfig::default()
        }
    };
    let addr = config.bind_addr();
    let state = AppState::from_env(config);
    let app = build_app(state);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    tracing::info!("Cogniflux gateway listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

fn build_app(state: AppState) -> Router {
    let origins = &state.config.allowed_origins;
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins.iter().filter_map(|o| HeaderValue::from_str(o).ok()))
    };
    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(handlers::chat::chat))
        .route("/api/speak", post(handlers::speak::speak))
        .route("/api/report", post(handlers::report::report))
        .with_state(state)
        .layer(axum::middleware::from_fn(log_request))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();
    let response = next.run(request).await;
    tracing::info!(
        target: "cogniflux::http",
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "app_name": state.config.app_name,
        "llm": state.llm.name(),
        "tts": state.tts.as_ref().map(|t| t.name()),
        "version": cogniflux_core::version(),
    }))
}
