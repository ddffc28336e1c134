//! Public API types

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde_json::json;

use crate::event::EventError;

// Errors

pub struct ApiError(anyhow::Error);

/// Convert `ApiError` into an Axum compatible response.
///
/// Domain errors carry their own status: bad identifiers and invalid
/// payloads are the caller's fault, a missing event is a 404, and
/// everything else is a 500 whose details stay in the server log.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Always log the error
        tracing::error!("{}", self.0);

        let (status, message) = match self.0.downcast_ref::<EventError>() {
            Some(err @ (EventError::InvalidId(_) | EventError::Invalid(_))) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Some(EventError::NotFound) => (
                StatusCode::NOT_FOUND,
                "the requested resource could not be found".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "your request cannot be processed due to a server error".to_string(),
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Enables using `?` on functions that return `Result<_,
/// anyhow::Error>` to turn them into `Result<_, ApiError>`
impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

// Re-export public types from each route

pub mod events {
    pub use crate::api::routes::events::public::*;
}
