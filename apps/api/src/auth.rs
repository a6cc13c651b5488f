//! Shared-secret authentication.
//!
//! The frontend sends the secret once to `POST /api/v1/auth`, then attaches it
//! to every generation call in the `x-blog-agent-secret` header.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::state::AppState;

pub const SECRET_HEADER: &str = "x-blog-agent-secret";

/// True iff `candidate` is a JSON string equal to `expected`.
/// The candidate itself is never logged.
pub fn authenticate(candidate: &Value, expected: &str) -> bool {
    let Some(secret) = candidate.as_str() else {
        warn!("Invalid secret type: {}", json_type(candidate));
        return false;
    };
    if secret != expected {
        warn!("Mismatched secret ({} characters)", secret.chars().count());
        return false;
    }
    info!("Pass secret");
    true
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    #[serde(default)]
    pub secret: Value,
}

/// POST /api/v1/auth
pub async fn handle_auth(
    State(state): State<AppState>,
    Json(request): Json<AuthRequest>,
) -> Result<StatusCode, AppError> {
    if authenticate(&request.secret, &state.secret) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Unauthorized)
    }
}

/// Rejects requests whose `x-blog-agent-secret` header does not match.
pub async fn require_secret(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let candidate = request
        .headers()
        .get(SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| Value::String(v.to_string()))
        .unwrap_or(Value::Null);

    if !authenticate(&candidate, &state.secret) {
        return Err(AppError::Unauthorized);
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_matching_secret_passes() {
        assert!(authenticate(&json!("TEST_SECRET"), "TEST_SECRET"));
    }

    #[test]
    fn test_mismatch_fails() {
        assert!(!authenticate(&json!("WRONG"), "TEST_SECRET"));
        assert!(!authenticate(&json!(""), "TEST_SECRET"));
    }

    #[test]
    fn test_non_string_fails() {
        assert!(!authenticate(&json!(null), "TEST_SECRET"));
        assert!(!authenticate(&json!(42), "42"));
        assert!(!authenticate(&json!(["TEST_SECRET"]), "TEST_SECRET"));
    }

    #[test]
    fn test_missing_field_deserializes_to_null() {
        let request: AuthRequest = serde_json::from_value(json!({})).unwrap();
        assert!(request.secret.is_null());
    }
}
