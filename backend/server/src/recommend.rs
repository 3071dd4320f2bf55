use std::sync::Arc;

use axum::{Json, extract::State as AxumState};
use chrono::Utc;
use tracing::{info, warn};

use crate::{
    media::{news_articles, self_care_product, youtube_videos},
    models::{MoodRequest, Recommendation},
    state::State,
};

pub const MEDIA_LIMIT: usize = 5;
pub const NEUTRAL: &str = "neutral";

const SAD_QUERIES: [&str; 3] = [
    "deal with sadness",
    "ways to lift mood",
    "cope with feeling down",
];
const ANXIOUS_QUERIES: [&str; 3] = [
    "reduce anxiety",
    "calm anxious mind",
    "relaxation for anxiety",
];

pub fn mood_prompt(user_input: &str) -> String {
    format!(
        "What is the user's emotional mood based on this input: '{user_input}'? \
         Reply only with one word (e.g., Sad, Happy, Angry, Anxious, Neutral)."
    )
}

/// Folds a one-word model answer into the moods the recommendations know about.
pub fn normalize_mood(answer: &str) -> &'static str {
    match answer.trim().to_lowercase().as_str() {
        "sad" | "unhappy" | "depressed" | "down" => "sad",
        "happy" | "excited" | "joyful" => "happy",
        "angry" | "mad" | "furious" => "angry",
        "anxious" | "nervous" | "stressed" => "anxious",
        _ => NEUTRAL,
    }
}

async fn detect_mood(state: &State, user_input: &str) -> &'static str {
    match state
        .mood_model
        .generate(&state.http, &mood_prompt(user_input))
        .await
    {
        Ok(answer) => normalize_mood(&answer),
        Err(e) => {
            warn!("Mood detection failed: {e}");
            NEUTRAL
        }
    }
}

/// Search terms for one detected mood.
#[derive(Debug, PartialEq)]
pub struct MediaPlan {
    pub video_query: String,
    pub article_query: String,
    pub product_query: String,
}

pub fn media_plan(detected_mood: &str, user_mood: &str, pick: usize) -> MediaPlan {
    let plan = |video: &str, article: &str, product: &str| MediaPlan {
        video_query: video.to_string(),
        article_query: article.to_string(),
        product_query: product.to_string(),
    };

    match detected_mood {
        "sad" | "anxious" | "depressed" => {
            let queries = if detected_mood == "anxious" {
                ANXIOUS_QUERIES
            } else {
                SAD_QUERIES
            };

            plan(
                format!("motivational videos for {detected_mood}").as_str(),
                queries[pick % queries.len()],
                "stress relief, fidget spinner",
            )
        }
        "happy" | "excited" => plan(
            "happy motivational videos",
            "articles about happiness",
            "celebration products, gift",
        ),
        "angry" => plan(
            "calming videos for anger",
            "how to control anger",
            "stress relief balls, calming tea",
        ),
        _ => plan(user_mood, user_mood, user_mood),
    }
}

pub async fn recommend_handler(
    AxumState(state): AxumState<Arc<State>>,
    Json(payload): Json<MoodRequest>,
) -> Json<Recommendation> {
    let detected_mood = detect_mood(&state, &payload.user_mood).await;
    info!("Detected mood: {detected_mood}");

    // pseudo-random pick from the clock, not uniformly distributed
    let pick = Utc::now().timestamp_subsec_nanos() as usize;
    let plan = media_plan(detected_mood, &payload.user_mood, pick);

    let (videos, articles) = tokio::join!(
        youtube_videos(
            &state.http,
            state.config.youtube_key.as_deref(),
            &plan.video_query,
            MEDIA_LIMIT,
        ),
        news_articles(
            &state.http,
            state.config.gnews_key.as_deref(),
            &plan.article_query,
            MEDIA_LIMIT,
        ),
    );

    Json(Recommendation {
        detected_mood: detected_mood.to_string(),
        videos,
        articles,
        product: self_care_product(&plan.product_query),
    })
}
