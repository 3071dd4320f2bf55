//! Documentation of the wellness companion backend.
//!
//! Serves the web and mobile clients: chat with a supportive assistant, mood check-ins,
//! profile analysis over past check-ins, therapist booking, and mood-based media recommendations.
//!
//!
//!
//! # Endpoints
//! - `POST /chat`: prompt the configured model with the message, mood, and last 5 history entries; reply as `• ` bullets
//! - `POST /checkin`: append to the session list and write through to the check-in store
//! - `GET /checkins`: session list, optional `?user_id=` filter
//! - `GET /analysis?user_id=`: aggregates, word cloud, summary, recommendations
//! - `GET /therapists`, `GET /appointments`, `POST /book`: fixed directory and in-memory bookings
//! - `POST /recommend`: detect mood with the local model, then search videos and articles
//! - `GET /health`
//!
//!
//!
//! # Upstreams
//! - Gemini (cloud) or Ollama (local) for chat and summaries, chosen by `LLM_PROVIDER`
//! - Ollama for one-word mood detection
//! - YouTube Data API and GNews for recommendations
//! - Redis for check-ins when `REDIS_URL` is set, otherwise memory
//!
//! Upstream failures never take an endpoint down except the check-in store. Chat answers with
//! `Error: ...`, summaries fall back to a fixed sentence, searches return an error line.
//!
//!
//!
//! # Secrets
//!
//! `GEMINI_API_KEY`, `GNEWS_API_KEY` and `YOUTUBE_API_KEY` are read from `/run/secrets/<NAME>`,
//! falling back to the environment.
//!
//!
//!
//! # Setup
//!
//! Run locally with request logs.
//! ```sh
//! RUST_LOG=info cargo run -p backend
//! ```
//!
//! Log prompts and raw model replies.
//! ```sh
//! RUST_LOG=info cargo run -p backend --features wellness/verbose
//! ```
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod analysis;
pub mod chat;
pub mod config;
pub mod database;
pub mod error;
pub mod llm;
pub mod media;
pub mod models;
pub mod recommend;
pub mod routes;
pub mod state;
pub mod therapists;
pub mod utils;

use analysis::analysis_handler;
use chat::chat_handler;
use recommend::recommend_handler;
use routes::{checkin_handler, checkins_handler, health_handler};
use state::State;
use therapists::{appointments_handler, book_handler, therapists_handler};

pub fn app(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allow_origin(&state.config.cors_origin))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/chat", post(chat_handler))
        .route("/checkin", post(checkin_handler))
        .route("/checkins", get(checkins_handler))
        .route("/analysis", get(analysis_handler))
        .route("/therapists", get(therapists_handler))
        .route("/appointments", get(appointments_handler))
        .route("/book", post(book_handler))
        .route("/recommend", post(recommend_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state)
}

fn allow_origin(origin: &str) -> AllowOrigin {
    if origin == "*" {
        return Any.into();
    }

    match origin.parse::<HeaderValue>() {
        Ok(origin) => origin.into(),
        Err(e) => {
            warn!("Invalid CORS_ORIGIN {origin}: {e}, allowing any origin");
            Any.into()
        }
    }
}

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new().await;

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    let router = app(state);

    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .expect("Failed to bind address");
    info!("Server running on {address}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    info!("Server shut down");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
