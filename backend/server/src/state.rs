use std::sync::Arc;

use reqwest::Client;
use tokio::sync::RwLock;

use super::{
    config::Config,
    database::{CheckinStore, init_store},
    llm::LlmClient,
    models::{Appointment, WellnessCheckIn},
};

pub struct State {
    pub config: Config,
    pub http: Client,
    pub chat_model: LlmClient,
    pub mood_model: LlmClient,
    pub store: CheckinStore,
    pub checkins: RwLock<Vec<WellnessCheckIn>>,
    pub appointments: RwLock<Vec<Appointment>>,
}

impl State {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let store = init_store(config.redis_url.as_deref())
            .await
            .expect("Redis misconfigured!");

        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: CheckinStore) -> Arc<Self> {
        let http = Client::builder()
            .timeout(config.llm_timeout)
            .build()
            .expect("HTTP client misconfigured!");

        Arc::new(Self {
            chat_model: config.chat_model(),
            mood_model: config.local_model(),
            config,
            http,
            store,
            checkins: RwLock::new(Vec::new()),
            appointments: RwLock::new(Vec::new()),
        })
    }
}

/// Config whose upstreams live at `upstream` and whose keys are all unset.
#[cfg(test)]
pub fn test_config(upstream: &str) -> Config {
    use std::time::Duration;

    Config {
        port: 0,
        llm_provider: "gemini".to_string(),
        gemini_url: upstream.to_string(),
        gemini_model: "gemini-2.0-flash".to_string(),
        gemini_key: None,
        ollama_url: upstream.to_string(),
        ollama_model: "mistral".to_string(),
        llm_timeout: Duration::from_secs(2),
        redis_url: None,
        cors_origin: "*".to_string(),
        gnews_key: None,
        youtube_key: None,
    }
}

#[cfg(test)]
pub fn test_state_with(config: Config) -> Arc<State> {
    State::with_store(config, CheckinStore::Memory(RwLock::new(Vec::new())))
}

/// State whose upstreams all point at a closed local port.
#[cfg(test)]
pub fn test_state() -> Arc<State> {
    test_state_with(test_config("http://127.0.0.1:9"))
}

/// Local stand-in for Gemini and Ollama that answers every prompt with a fixed reply.
#[cfg(test)]
pub mod upstream {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    use axum::{
        Json, Router,
        extract::{Path, Query, State},
        routing::post,
    };
    use serde_json::{Value, json};
    use tokio::net::TcpListener;

    #[derive(Clone, Debug)]
    pub struct Call {
        pub path: String,
        pub query: HashMap<String, String>,
        pub body: Value,
    }

    #[derive(Clone)]
    struct Upstream {
        reply: &'static str,
        calls: Arc<Mutex<Vec<Call>>>,
    }

    pub struct Handle {
        pub url: String,
        calls: Arc<Mutex<Vec<Call>>>,
    }

    impl Handle {
        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    async fn gemini(
        State(upstream): State<Upstream>,
        Path(call): Path<String>,
        Query(query): Query<HashMap<String, String>>,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        upstream.calls.lock().unwrap().push(Call {
            path: format!("/v1beta/models/{call}"),
            query,
            body,
        });

        Json(json!({ "candidates": [{ "content": { "parts": [{ "text": upstream.reply }] } }] }))
    }

    async fn ollama(State(upstream): State<Upstream>, Json(body): Json<Value>) -> Json<Value> {
        upstream.calls.lock().unwrap().push(Call {
            path: "/api/generate".to_string(),
            query: HashMap::new(),
            body,
        });

        Json(json!({ "response": upstream.reply }))
    }

    pub async fn spawn(reply: &'static str) -> Handle {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let upstream = Upstream {
            reply,
            calls: calls.clone(),
        };

        let router = Router::new()
            .route("/v1beta/models/{call}", post(gemini))
            .route("/api/generate", post(ollama))
            .with_state(upstream);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Handle { url, calls }
    }
}
