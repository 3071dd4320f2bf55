//! # Language models
//!
//! Chat replies and analysis summaries go to a cloud model (Gemini) or a local one (Ollama),
//! picked by `LLM_PROVIDER`. Mood detection for recommendations always asks the local model.
//!
//! Both providers take a single prompt and return plain text. Nothing is streamed.
use reqwest::Client;
use serde_json::{Value, json};
#[cfg(feature = "verbose")]
use tracing::info;

use crate::{config::GEMINI_API_KEY, error::AppError};

#[derive(Clone, Debug)]
pub enum LlmClient {
    Gemini {
        url: String,
        model: String,
        api_key: Option<String>,
    },
    Ollama {
        url: String,
        model: String,
    },
}

impl LlmClient {
    pub fn name(&self) -> &str {
        match self {
            LlmClient::Gemini { model, .. } | LlmClient::Ollama { model, .. } => model,
        }
    }

    pub async fn generate(&self, http: &Client, prompt: &str) -> Result<String, AppError> {
        #[cfg(feature = "verbose")]
        info!("Prompt for {}: {prompt}", self.name());

        let (request, parse): (_, fn(&Value) -> Option<String>) = match self {
            LlmClient::Gemini {
                url,
                model,
                api_key,
            } => {
                let key = api_key.as_deref().ok_or(AppError::MissingKey(GEMINI_API_KEY))?;
                let request = http
                    .post(format!("{url}/v1beta/models/{model}:generateContent"))
                    .query(&[("key", key)])
                    .json(&json!({ "contents": [{ "parts": [{ "text": prompt }] }] }));

                (request, parse_gemini_response)
            }
            LlmClient::Ollama { url, model } => {
                let request = http.post(format!("{url}/api/generate")).json(&json!({
                    "model": model,
                    "prompt": prompt,
                    "stream": false,
                }));

                (request, parse_ollama_response)
            }
        };

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;

        #[cfg(feature = "verbose")]
        info!("Reply from {}: {body}", self.name());

        parse(&body).ok_or(AppError::EmptyReply)
    }
}

/// Joins every text part of the first candidate.
pub fn parse_gemini_response(body: &Value) -> Option<String> {
    let parts = body["candidates"][0]["content"]["parts"].as_array()?;

    let text: String = parts
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect();

    (!text.is_empty()).then_some(text)
}

pub fn parse_ollama_response(body: &Value) -> Option<String> {
    body["response"]
        .as_str()
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
