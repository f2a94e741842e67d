//! Mapping of [`AgencyError`] onto HTTP responses.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::AgencyError;

/// Seconds a client should wait before retrying after a 503.
const RETRY_AFTER_SECS: &str = "30";

/// The HTTP status for each error kind.
pub fn status_for(err: &AgencyError) -> StatusCode {
    match err {
        AgencyError::NotFound { .. } => StatusCode::NOT_FOUND,
        AgencyError::InvalidInput(_)
        | AgencyError::InvalidBreed(_)
        | AgencyError::InvalidTargetCount(_)
        | AgencyError::DuplicateTarget { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        AgencyError::MissionAlreadyAssigned
        | AgencyError::MissionCompleted
        | AgencyError::CatBusy
        | AgencyError::TargetFrozen
        | AgencyError::MissionAssigned
        | AgencyError::CatHasActiveMission => StatusCode::CONFLICT,
        AgencyError::ExternalServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        AgencyError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Storage failures are logged in full but reach the client as a generic
/// message. Everything else is a rule violation the client can act on.
impl IntoResponse for AgencyError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        let message = match &self {
            AgencyError::Database(e) => {
                tracing::error!(error = %e, "Internal error");
                "Internal server error".to_string()
            }
            AgencyError::ExternalServiceUnavailable(_) => {
                tracing::warn!(code = self.code(), "{}", self);
                self.to_string()
            }
            other => {
                tracing::warn!(code = other.code(), "Request rejected: {}", other);
                other.to_string()
            }
        };

        let body = json!({
            "error": message,
            "code": self.code(),
            "retryable": self.is_retryable(),
        });

        let mut response = (status, Json(body)).into_response();
        if self.is_retryable() {
            response.headers_mut().insert(
                header::RETRY_AFTER,
                HeaderValue::from_static(RETRY_AFTER_SECS),
            );
        }
        response
    }
}
