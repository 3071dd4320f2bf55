use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State as AxumState},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{error, info};

use crate::{
    error::AppError,
    models::{CheckInReceipt, UserQuery, WellnessCheckIn},
    state::State,
};

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn checkin_handler(
    AxumState(state): AxumState<Arc<State>>,
    Json(checkin): Json<WellnessCheckIn>,
) -> Result<Json<CheckInReceipt>, AppError> {
    state.checkins.write().await.push(checkin.clone());

    state.store.add(&checkin).await.map_err(|e| {
        error!("Failed to persist check-in: {e}");
        e
    })?;

    info!(
        "Stored check-in for {}",
        checkin.user_id.as_deref().unwrap_or("anonymous")
    );

    Ok(Json(CheckInReceipt {
        message: "Wellness check-in received",
        data: checkin,
    }))
}

pub async fn checkins_handler(
    AxumState(state): AxumState<Arc<State>>,
    Query(query): Query<UserQuery>,
) -> Json<Vec<WellnessCheckIn>> {
    let checkins = state.checkins.read().await;

    Json(match query.user_id.as_deref() {
        Some(user_id) => checkins
            .iter()
            .filter(|checkin| checkin.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect(),
        None => checkins.clone(),
    })
}

#[cfg(test)]
mod tests {
    use axum::{
        Json,
        extract::{Query, State as AxumState},
        response::IntoResponse,
    };

    use super::{checkin_handler, checkins_handler};
    use crate::{
        analysis::{AnalysisResponse, analysis_handler},
        chat::chat_handler,
        error::AppError,
        models::{ChatRequest, UserQuery, WellnessCheckIn},
        state::{test_config, test_state, test_state_with, upstream},
    };

    fn checkin(user_id: &str, rating: i64, mood: &str, description: &str) -> WellnessCheckIn {
        WellnessCheckIn {
            mood_rating: rating,
            mood_description: mood.to_string(),
            description: Some(description.to_string()),
            voice_url: None,
            timestamp: 1_714_000_000_000,
            user_id: Some(user_id.to_string()),
            user_email: None,
        }
    }

    fn user(user_id: Option<&str>) -> Query<UserQuery> {
        Query(UserQuery {
            user_id: user_id.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn test_checkin_then_list() {
        let state = test_state();

        let Json(receipt) = checkin_handler(
            AxumState(state.clone()),
            Json(checkin("a", 4, "Good", "walked outside")),
        )
        .await
        .unwrap();
        assert_eq!(receipt.message, "Wellness check-in received");
        assert_eq!(receipt.data.mood_rating, 4);

        checkin_handler(AxumState(state.clone()), Json(checkin("b", 2, "Poor", "tired")))
            .await
            .unwrap();

        let Json(all) = checkins_handler(AxumState(state.clone()), user(None)).await;
        assert_eq!(all.len(), 2);

        let Json(only_b) = checkins_handler(AxumState(state), user(Some("b"))).await;
        assert_eq!(only_b.len(), 1);
        assert_eq!(only_b[0].mood_description, "Poor");
    }

    #[tokio::test]
    async fn test_analysis_requires_user() {
        let result = analysis_handler(AxumState(test_state()), user(None)).await;
        assert!(matches!(result, Err(AppError::MissingUserId)));

        let result = analysis_handler(AxumState(test_state()), user(Some(""))).await;
        assert!(matches!(result, Err(AppError::MissingUserId)));
    }

    #[tokio::test]
    async fn test_analysis_without_checkins() {
        let Json(response) = analysis_handler(AxumState(test_state()), user(Some("nobody")))
            .await
            .unwrap();

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["message"], "No check-ins available");
    }

    #[tokio::test]
    async fn test_analysis_uses_fallback_summary() {
        let state = test_state();

        for (rating, mood) in [(2, "Poor"), (3, "Okay"), (2, "Poor")] {
            checkin_handler(
                AxumState(state.clone()),
                Json(checkin("a", rating, mood, "restless night, anxious morning")),
            )
            .await
            .unwrap();
        }
        checkin_handler(AxumState(state.clone()), Json(checkin("b", 5, "Great", "sunny")))
            .await
            .unwrap();

        let Json(response) = analysis_handler(AxumState(state), user(Some("a")))
            .await
            .unwrap();

        let AnalysisResponse::Report(report) = response else {
            panic!("expected a report");
        };
        assert_eq!(report.total_checkins, 3);
        assert_eq!(report.overall_mood, "Poor");
        assert_eq!(report.ai_summary, crate::analysis::SUMMARY_FALLBACK);
        assert_eq!(report.word_cloud[0], "restless");
        assert_eq!(report.word_frequencies[0].count, 3);
    }

    #[tokio::test]
    async fn test_analysis_uses_model_summary() {
        let upstream = upstream::spawn("\n  • Steady week, keep walking.  \n\n").await;
        let mut config = test_config(&upstream.url);
        config.gemini_key = Some("secret".to_string());
        let state = test_state_with(config);

        for (rating, mood) in [(4, "Good"), (5, "Great")] {
            checkin_handler(
                AxumState(state.clone()),
                Json(checkin("a", rating, mood, "walked by the river")),
            )
            .await
            .unwrap();
        }

        let Json(response) = analysis_handler(AxumState(state), user(Some("a")))
            .await
            .unwrap();

        let AnalysisResponse::Report(report) = response else {
            panic!("expected a report");
        };
        assert_eq!(report.ai_summary, "• Steady week, keep walking.");

        let prompt = upstream.calls()[0].body["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(prompt.contains("Total check-ins: 2\n"));
        assert!(prompt.contains("Wellness score (avg mood rating, out of 5): 4.5\n"));
        assert!(prompt.ends_with("Summary:"));
    }

    #[tokio::test]
    async fn test_chat_with_null_history() {
        let request: ChatRequest = serde_json::from_value(serde_json::json!({
            "text": "hello",
            "history": null
        }))
        .unwrap();

        let response = chat_handler(AxumState(test_state()), Json(request))
            .await
            .into_response();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }

    #[tokio::test]
    async fn test_chat_reports_provider_error() {
        let request: ChatRequest =
            serde_json::from_value(serde_json::json!({ "text": "hello" })).unwrap();

        let response = chat_handler(AxumState(test_state()), Json(request))
            .await
            .into_response();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }

    #[tokio::test]
    async fn test_chat_error_text() {
        let request: ChatRequest =
            serde_json::from_value(serde_json::json!({ "text": "hello", "mood": "sad" })).unwrap();

        let Json(reply) = chat_handler(AxumState(test_state()), Json(request)).await;
        assert_eq!(reply.response, "Error: GEMINI_API_KEY is not configured");
    }
}
