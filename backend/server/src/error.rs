use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("User ID is required")]
    MissingUserId,

    #[error("Failed to fetch check-ins from store.")]
    StoreRead(#[source] redis::RedisError),

    #[error("Failed to store check-in.")]
    StoreWrite(#[source] redis::RedisError),

    #[error("Stored check-in is malformed: {0}")]
    MalformedDocument(#[from] serde_json::Error),

    #[error("{0} is not configured")]
    MissingKey(&'static str),

    #[error("Upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Upstream reply had no text")]
    EmptyReply,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MissingUserId => StatusCode::BAD_REQUEST,
            AppError::StoreRead { .. }
            | AppError::StoreWrite { .. }
            | AppError::MalformedDocument { .. }
            | AppError::MissingKey { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Http { .. } | AppError::Upstream { .. } | AppError::EmptyReply => {
                StatusCode::BAD_GATEWAY
            }
        };

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::AppError;

    #[test]
    fn test_missing_user_id_is_bad_request() {
        let response = AppError::MissingUserId.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_is_bad_gateway() {
        let response = AppError::Upstream {
            status: 503,
            body: "overloaded".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_messages() {
        assert_eq!(AppError::MissingUserId.to_string(), "User ID is required");
        assert_eq!(
            AppError::MissingKey("GNEWS_API_KEY").to_string(),
            "GNEWS_API_KEY is not configured"
        );
    }
}
