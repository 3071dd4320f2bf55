use std::{fmt::Write, sync::Arc};

use axum::{Json, extract::State as AxumState};
use tracing::{info, warn};

use crate::{
    models::{ChatMessage, ChatRequest, ChatResponse},
    state::State,
    utils::{capitalize, format_bullets},
};

pub const HISTORY_WINDOW: usize = 5;

pub fn build_chat_prompt(text: &str, mood: Option<&str>, history: &[ChatMessage]) -> String {
    let mut prompt = String::from(
        "You are a compassionate mental health assistant acting like a supportive, caring friend. ",
    );

    if let Some(mood) = mood.filter(|mood| !mood.is_empty()) {
        let _ = write!(
            prompt,
            "The user's current mood is: {mood}. Please be gentle and talk to them nicely. "
        );
    }

    prompt.push_str(
        "Provide short and Be empathetic, use simple words, and encourage calmness. \
         Don't repeat generic phrases. Avoid medical advice.\n\n",
    );

    let recent = &history[history.len().saturating_sub(HISTORY_WINDOW)..];
    if !recent.is_empty() {
        prompt.push_str("Recent conversation:\n");
        for message in recent {
            let _ = writeln!(prompt, "{}: {}", capitalize(message.sender()), message.text());
        }
        prompt.push('\n');
    }

    let _ = write!(prompt, "User: {text}\n\nResponse:");
    prompt
}

pub async fn chat_handler(
    AxumState(state): AxumState<Arc<State>>,
    Json(payload): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let prompt = build_chat_prompt(
        payload.text.as_deref().unwrap_or_default(),
        payload.mood.as_deref(),
        payload.history.as_deref().unwrap_or_default(),
    );

    let response = match state.chat_model.generate(&state.http, &prompt).await {
        Ok(reply) => {
            info!("Chat reply generated");
            format_bullets(&reply)
        }
        Err(e) => {
            warn!("Chat model failed: {e}");
            format!("Error: {e}")
        }
    };

    Json(ChatResponse { response })
}

#[cfg(test)]
mod tests {
    use axum::{Json, extract::State as AxumState};
    use serde_json::json;

    use super::{build_chat_prompt, chat_handler};
    use crate::{
        models::{ChatMessage, ChatRequest},
        state::{test_config, test_state_with, upstream},
    };

    async fn chat_with(
        reply: &'static str,
        request: serde_json::Value,
    ) -> (String, Vec<upstream::Call>) {
        let upstream = upstream::spawn(reply).await;
        let mut config = test_config(&upstream.url);
        config.gemini_key = Some("secret".to_string());

        let request: ChatRequest = serde_json::from_value(request).unwrap();
        let Json(reply) = chat_handler(AxumState(test_state_with(config)), Json(request)).await;

        (reply.response, upstream.calls())
    }

    fn message(sender: &str, text: &str) -> ChatMessage {
        ChatMessage {
            sender: Some(sender.to_string()),
            text: Some(text.to_string()),
        }
    }

    #[test]
    fn test_prompt_without_mood_or_history() {
        let prompt = build_chat_prompt("I can't sleep", None, &[]);

        assert!(!prompt.contains("current mood"));
        assert!(!prompt.contains("Recent conversation"));
        assert!(prompt.ends_with("User: I can't sleep\n\nResponse:"));
    }

    #[test]
    fn test_prompt_with_mood() {
        let prompt = build_chat_prompt("hi", Some("anxious"), &[]);
        assert!(prompt.contains("The user's current mood is: anxious."));
    }

    #[test]
    fn test_prompt_keeps_last_five_messages() {
        let history: Vec<ChatMessage> = (0..7)
            .map(|i| message(if i % 2 == 0 { "user" } else { "bot" }, &format!("m{i}")))
            .collect();

        let prompt = build_chat_prompt("now", None, &history);

        assert!(!prompt.contains("m0"));
        assert!(!prompt.contains("m1"));
        assert!(prompt.contains("Recent conversation:\nUser: m2\nBot: m3\nUser: m4\nBot: m5\nUser: m6\n\n"));
    }

    #[tokio::test]
    async fn test_reply_formatted_as_bullets() {
        let (response, calls) = chat_with(
            "* Breathe in slowly\n\n- Let it out\nYou are doing fine",
            json!({ "text": "I feel tense", "mood": "anxious" }),
        )
        .await;

        assert_eq!(response, "•  Breathe in slowly\n•  Let it out\n• You are doing fine");

        let prompt = calls[0].body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("The user's current mood is: anxious."));
        assert!(prompt.ends_with("User: I feel tense\n\nResponse:"));
    }

    #[tokio::test]
    async fn test_null_fields_answered() {
        let (response, calls) = chat_with(
            "Take a short walk",
            json!({ "text": "hi", "mood": null, "history": null }),
        )
        .await;

        assert_eq!(response, "• Take a short walk");

        let prompt = calls[0].body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(!prompt.contains("Recent conversation"));
        assert!(!prompt.contains("current mood"));
    }
}
