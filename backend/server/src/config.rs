use std::{env, fmt::Display, fs::read_to_string, str::FromStr, time::Duration};

use tracing::{info, warn};

use crate::llm::LlmClient;

pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const GNEWS_API_KEY: &str = "GNEWS_API_KEY";
pub const YOUTUBE_API_KEY: &str = "YOUTUBE_API_KEY";

pub struct Config {
    pub port: u16,
    pub llm_provider: String,
    pub gemini_url: String,
    pub gemini_model: String,
    pub gemini_key: Option<String>,
    pub ollama_url: String,
    pub ollama_model: String,
    pub llm_timeout: Duration,
    pub redis_url: Option<String>,
    pub cors_origin: String,
    pub gnews_key: Option<String>,
    pub youtube_key: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("RUST_PORT", "8000"),
            llm_provider: try_load::<String>("LLM_PROVIDER", "gemini").to_lowercase(),
            gemini_url: try_load("GEMINI_URL", "https://generativelanguage.googleapis.com"),
            gemini_model: try_load("GEMINI_MODEL", "gemini-2.0-flash"),
            gemini_key: read_secret(GEMINI_API_KEY),
            ollama_url: try_load("OLLAMA_URL", "http://127.0.0.1:11434"),
            ollama_model: try_load("OLLAMA_MODEL", "mistral"),
            llm_timeout: Duration::from_secs(try_load("LLM_TIMEOUT_SECS", "30")),
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
            cors_origin: try_load("CORS_ORIGIN", "*"),
            gnews_key: read_secret(GNEWS_API_KEY),
            youtube_key: read_secret(YOUTUBE_API_KEY),
        }
    }

    /// Model answering chat messages and writing analysis summaries.
    pub fn chat_model(&self) -> LlmClient {
        match self.llm_provider.as_str() {
            "ollama" => self.local_model(),
            "gemini" => self.gemini(),
            other => {
                warn!("Unknown LLM_PROVIDER {other}, falling back to gemini");
                self.gemini()
            }
        }
    }

    /// Local model used for one-word mood detection.
    pub fn local_model(&self) -> LlmClient {
        LlmClient::Ollama {
            url: self.ollama_url.trim_end_matches('/').to_string(),
            model: self.ollama_model.clone(),
        }
    }

    fn gemini(&self) -> LlmClient {
        LlmClient::Gemini {
            url: self.gemini_url.trim_end_matches('/').to_string(),
            model: self.gemini_model.clone(),
            api_key: self.gemini_key.clone(),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

/// Secrets come from `/run/secrets` first, then the environment.
fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            info!("Failed to read {secret_name} from file: {e}");
        })
        .or_else(|_| var(secret_name))
        .ok()
        .filter(|secret| !secret.is_empty())
        .or_else(|| {
            warn!("{secret_name} is not configured, dependent endpoints will report errors");
            None
        })
}

#[cfg(test)]
mod tests {
    use super::try_load;

    #[test]
    fn test_default_used_when_unset() {
        let port: u16 = try_load("WELLNESS_TEST_UNSET_PORT", "8000");
        assert_eq!(port, 8000);
    }

    #[test]
    fn test_string_default() {
        let provider: String = try_load("WELLNESS_TEST_UNSET_PROVIDER", "gemini");
        assert_eq!(provider, "gemini");
    }
}
