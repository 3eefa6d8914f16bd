//! Wire error mapping.
//!
//! Core errors map to one HTTP status each; the body is always the
//! `{success: false, error}` envelope. Spell failures carry the resolver
//! code 900 in-body on an HTTP 200 response (900 is not a transportable
//! HTTP status).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use covenant_core::CovenantError;
use serde_json::json;

/// An error ready to leave the service.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status.
    pub status: StatusCode,
    /// Message placed verbatim in the `error` field.
    pub message: String,
}

impl ApiError {
    /// Build from status + message.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Malformed request body or parameters.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<CovenantError> for ApiError {
    fn from(err: CovenantError) -> Self {
        let status = match &err {
            CovenantError::Validation(_) | CovenantError::StepAlreadyComplete { .. } => {
                StatusCode::BAD_REQUEST
            }
            CovenantError::AuthFailed | CovenantError::InvalidStepSignature => {
                StatusCode::UNAUTHORIZED
            }
            CovenantError::Forbidden(_) => StatusCode::FORBIDDEN,
            CovenantError::ContractNotFound { .. }
            | CovenantError::StepNotFound { .. }
            | CovenantError::UserNotFound { .. } => StatusCode::NOT_FOUND,
            CovenantError::KeyNotFound { .. } | CovenantError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "error": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

/// Success envelope.
pub fn success<T: serde::Serialize>(data: T) -> Response {
    Json(json!({
        "success": true,
        "data": data,
    }))
    .into_response()
}

/// Spell-failure envelope: resolver code 900, carried in-body.
pub fn spell_failure(message: impl Into<String>) -> Response {
    Json(json!({
        "success": false,
        "error": message.into(),
        "code": 900,
    }))
    .into_response()
}
