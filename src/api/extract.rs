//! Request extractors whose rejections use the agency error envelope.
//!
//! Axum's own `Json` and `Path` reject with plain-text bodies. These wrappers
//! turn a malformed body into `InvalidInput` and an unparsable path id into
//! `NotFound`, so every failure carries `{error, code, retryable}`.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::AgencyError;

/// JSON request body.
pub struct AgencyJson<T>(pub T);

impl<T, S> FromRequest<S> for AgencyJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AgencyError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> AgencyError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            AgencyError::invalid_input("expected a JSON request body")
        }
        other => AgencyError::InvalidInput(other.body_text()),
    }
}

/// Path parameters. Anything that fails to parse names no existing record.
pub struct AgencyPath<T>(pub T);

impl<T, S> FromRequestParts<S> for AgencyPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AgencyError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(path_rejection(rejection)),
        }
    }
}

fn path_rejection(rejection: PathRejection) -> AgencyError {
    tracing::debug!(error = %rejection.body_text(), "Unparsable path parameter");
    AgencyError::not_found("Resource")
}
