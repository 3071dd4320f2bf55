//! # Profile analysis
//!
//! Aggregates over one user's stored check-ins:
//! - Most common mood (ties go to whichever mood appeared first)
//! - Wellness score, the mean mood rating out of 5
//! - Mood over time, stable-sorted by UTC date
//! - Word cloud from free-text descriptions, stopwords removed
//! - Model-written summary with a fixed fallback
//! - Tiered recommendations
use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fmt::Write,
    sync::{Arc, LazyLock},
};

use axum::{
    Json,
    extract::{Query, State as AxumState},
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::{
    error::AppError,
    models::{UserQuery, WellnessCheckIn},
    state::State,
    utils::{UNKNOWN_DATE, format_date, strip_punctuation},
};

pub const WORD_CLOUD_SIZE: usize = 20;
pub const SUMMARY_WINDOW: usize = 5;
pub const SUMMARY_FALLBACK: &str = "Your mental wellness journey is unique. Keep tracking your moods to better understand your patterns.";

static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
        "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
        "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
        "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
        "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
        "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
        "for", "with", "about", "against", "between", "into", "through", "during", "before",
        "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
        "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
        "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
        "nor", "not", "only", "own", "same", "so", "than", "too", "very", "can", "will", "just",
        "don", "should", "now", "today", "yesterday", "tomorrow",
    ]
    .into_iter()
    .collect()
});

#[derive(Debug, PartialEq, Serialize)]
pub struct MoodPoint {
    pub date: String,
    pub mood: i64,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct VoiceInsights {
    pub most_common: String,
    pub spike_date: String,
    pub spike_reason: &'static str,
    pub trend: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ProfileAnalysis {
    pub name: &'static str,
    pub total_checkins: usize,
    pub overall_mood: String,
    pub last_checkin: String,
    pub wellness_score: f64,
    pub mood_over_time: Vec<MoodPoint>,
    pub mood_distribution: BTreeMap<String, usize>,
    pub voice_insights: VoiceInsights,
    pub word_cloud: Vec<String>,
    pub word_frequencies: Vec<WordCount>,
    pub ai_summary: String,
    pub recommendations: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AnalysisResponse {
    Empty { message: &'static str },
    Report(Box<ProfileAnalysis>),
}

/// Most common mood and its distribution. `None` when there are no check-ins.
pub fn mood_summary(checkins: &[WellnessCheckIn]) -> Option<(String, BTreeMap<String, usize>)> {
    let mut distribution = BTreeMap::new();
    let mut first_seen = Vec::new();

    for checkin in checkins {
        let count = distribution
            .entry(checkin.mood_description.clone())
            .or_insert(0);
        if *count == 0 {
            first_seen.push(checkin.mood_description.as_str());
        }
        *count += 1;
    }

    let mut overall: Option<(&str, usize)> = None;
    for mood in first_seen {
        let count = distribution[mood];
        if overall.is_none_or(|(_, best)| count > best) {
            overall = Some((mood, count));
        }
    }

    overall.map(|(mood, _)| (mood.to_string(), distribution))
}

pub fn wellness_score(checkins: &[WellnessCheckIn]) -> f64 {
    if checkins.is_empty() {
        return 0.0;
    }

    let total: f64 = checkins
        .iter()
        .map(|checkin| checkin.mood_rating as f64)
        .sum();
    total / checkins.len() as f64
}

pub fn mood_over_time(checkins: &[WellnessCheckIn]) -> Vec<MoodPoint> {
    let mut points: Vec<MoodPoint> = checkins
        .iter()
        .map(|checkin| MoodPoint {
            date: format_date(checkin.timestamp),
            mood: checkin.mood_rating,
        })
        .collect();

    points.sort_by(|a, b| a.date.cmp(&b.date));
    points
}

/// Description words in order of appearance, repeats kept, stopwords removed.
pub fn description_words(checkins: &[WellnessCheckIn]) -> Vec<String> {
    checkins
        .iter()
        .filter_map(|checkin| checkin.description.as_deref())
        .flat_map(str::split_whitespace)
        .map(|word| strip_punctuation(word).to_lowercase())
        .filter(|word| word.chars().count() > 2 && !STOPWORDS.contains(word.as_str()))
        .collect()
}

/// Most frequent description words, ties broken by first appearance.
pub fn word_frequencies(checkins: &[WellnessCheckIn], limit: usize) -> Vec<WordCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for word in description_words(checkins) {
        let count = counts.entry(word.clone()).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }

    let mut ranked: Vec<WordCount> = order
        .into_iter()
        .map(|word| WordCount {
            count: counts[&word],
            word,
        })
        .collect();

    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

pub fn recommendations(overall_mood: &str, wellness_score: f64) -> Vec<&'static str> {
    let mut recommendations = if wellness_score >= 4.0 {
        vec![
            "Continue your current self-care routine",
            "Share your wellness strategies with others",
            "Try new mindfulness techniques to maintain balance",
            "Consider setting new wellness goals",
        ]
    } else if wellness_score >= 3.0 {
        vec![
            "Establish a regular sleep schedule",
            "Try 10 minutes of daily meditation",
            "Engage in moderate exercise 3 times a week",
            "Practice gratitude journaling",
        ]
    } else {
        vec![
            "Consider speaking with a mental health professional",
            "Start with small daily self-care activities",
            "Practice deep breathing exercises",
            "Connect with supportive friends or family",
            "Try gentle activities like walking or listening to music",
        ]
    };

    if overall_mood.contains("Poor") {
        recommendations.push("Consider professional counseling support");
        recommendations.push("Engage in activities that bring you joy");
    } else if overall_mood.contains("Good") {
        recommendations.push("Maintain your positive habits");
        recommendations.push("Help others to boost your own well-being");
    }

    recommendations
}

pub fn build_summary_prompt(
    checkins: &[WellnessCheckIn],
    overall_mood: &str,
    wellness_score: f64,
) -> String {
    let recent = &checkins[checkins.len().saturating_sub(SUMMARY_WINDOW)..];

    let mut prompt = String::from(
        "You are a mental health assistant. Summarize the user's mental wellness journey in a \
         supportive, professional, and empathetic tone. Highlight strengths, areas for \
         improvement, and encourage positive steps. Do not give medical advice.\n\
         Keep it short and also concise. Give point form summary. \
         Do not give any extra information directly start with summary.\n",
    );

    let _ = writeln!(prompt, "Total check-ins: {}", checkins.len());
    let _ = writeln!(prompt, "Most common mood: {overall_mood}");
    let _ = writeln!(prompt, "Wellness score (avg mood rating, out of 5): {wellness_score:.1}");
    prompt.push_str("Recent check-ins:\n");

    for checkin in recent {
        let _ = writeln!(
            prompt,
            "Date: {}, Mood: {}, Rating: {}, Note: {}",
            format_date(checkin.timestamp),
            checkin.mood_description,
            checkin.mood_rating,
            checkin.description.as_deref().unwrap_or_default()
        );
    }

    prompt.push_str("Summary:");
    prompt
}

async fn ai_summary(
    state: &State,
    checkins: &[WellnessCheckIn],
    overall_mood: &str,
    wellness_score: f64,
) -> String {
    let prompt = build_summary_prompt(checkins, overall_mood, wellness_score);

    match state.chat_model.generate(&state.http, &prompt).await {
        Ok(summary) => summary.trim().to_string(),
        Err(e) => {
            warn!("Summary generation failed, using fallback: {e}");
            SUMMARY_FALLBACK.to_string()
        }
    }
}

/// Everything except the model-written summary.
pub fn analyze(checkins: &[WellnessCheckIn]) -> Option<ProfileAnalysis> {
    let (overall_mood, mood_distribution) = mood_summary(checkins)?;
    let wellness_score = wellness_score(checkins);
    let mood_over_time = mood_over_time(checkins);
    let word_frequencies = word_frequencies(checkins, WORD_CLOUD_SIZE);

    let last_checkin = checkins
        .last()
        .map_or_else(|| UNKNOWN_DATE.to_string(), |checkin| format_date(checkin.timestamp));

    let voice_insights = VoiceInsights {
        most_common: overall_mood.clone(),
        spike_date: mood_over_time
            .last()
            .map_or_else(|| UNKNOWN_DATE.to_string(), |point| point.date.clone()),
        spike_reason: "Recent mood entry",
        trend: if wellness_score >= 3.0 {
            "Stable"
        } else {
            "Needs attention"
        },
    };

    Some(ProfileAnalysis {
        name: "User",
        total_checkins: checkins.len(),
        recommendations: recommendations(&overall_mood, wellness_score),
        overall_mood,
        last_checkin,
        wellness_score,
        mood_over_time,
        mood_distribution,
        voice_insights,
        word_cloud: description_words(checkins)
            .into_iter()
            .take(WORD_CLOUD_SIZE)
            .collect(),
        word_frequencies,
        ai_summary: String::new(),
    })
}

pub async fn analysis_handler(
    AxumState(state): AxumState<Arc<State>>,
    Query(query): Query<UserQuery>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let user_id = query
        .user_id
        .filter(|user_id| !user_id.is_empty())
        .ok_or(AppError::MissingUserId)?;

    let checkins = state.store.fetch(Some(&user_id)).await.map_err(|e| {
        error!("Error fetching check-ins for {user_id}: {e}");
        e
    })?;

    let Some(mut report) = analyze(&checkins) else {
        info!("No check-ins for {user_id}");
        return Ok(Json(AnalysisResponse::Empty {
            message: "No check-ins available",
        }));
    };

    report.ai_summary = ai_summary(
        &state,
        &checkins,
        &report.overall_mood,
        report.wellness_score,
    )
    .await;

    Ok(Json(AnalysisResponse::Report(Box::new(report))))
}
