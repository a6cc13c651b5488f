use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Extraction produced empty result: {0}")]
    EmptyExtraction(String),

    #[error("Could not satisfy {stage} constraint within {attempts} attempts: {reason}")]
    ConstraintUnsatisfied {
        stage: &'static str,
        attempts: u32,
        reason: String,
    },

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "A valid secret is required".to_string(),
            ),
            AppError::EmptyExtraction(field) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EMPTY_EXTRACTION",
                format!("Extraction produced empty result for {field}"),
            ),
            AppError::ConstraintUnsatisfied { .. } => {
                tracing::error!("{self}");
                (StatusCode::BAD_GATEWAY, "CONSTRAINT_UNSATISFIED", self.to_string())
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_unsatisfied_message_names_stage_and_attempts() {
        let err = AppError::ConstraintUnsatisfied {
            stage: "writing plan",
            attempts: 5,
            reason: "total length 900 is outside 1400..=1600".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("writing plan"));
        assert!(message.contains("5 attempts"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Validation("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::EmptyExtraction("restaurant".into())
                .into_response()
                .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::Llm("boom".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
