//! Error types for the post API.
//!
//! [`ApiError`] unifies all failure modes into a single enum that can be
//! converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. Bodies
//! always have the shape `{"error": <message>, "status": <code>}`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use quire_db::ConnectionError;

use crate::service::ServiceError;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested post was not found.
    #[error("{0}")]
    NotFound(String),

    /// A path id was not a valid UUID.
    #[error("invalid UUID: {0}")]
    InvalidUuid(String),

    /// The request body could not be parsed.
    #[error("invalid request body: {0}")]
    BadRequest(String),

    /// The request body parsed but failed validation.
    #[error("validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// The data layer could not serve the request.
    #[error("database unavailable: {0}")]
    Database(#[from] ConnectionError),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(msg) => Self::NotFound(msg),
            ServiceError::Database(e) => Self::Database(e),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    /// The HTTP status this error maps to.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidUuid(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Driver errors can carry query text; log them, return a fixed message.
        let message = match &self {
            Self::Database(e) => {
                tracing::error!(error = %e, "Database operation failed");
                String::from("Database unavailable")
            }
            other => other.to_string(),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        let not_found = ApiError::from(ServiceError::NotFound(String::from("Post not found")));
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "Post not found");

        let db = ApiError::from(ServiceError::Database(ConnectionError::Unavailable(
            String::from("pool closed"),
        )));
        assert_eq!(db.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn database_message_is_not_leaked() {
        let err = ApiError::Database(ConnectionError::Config(String::from("secret detail")));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn invalid_uuid_is_bad_request() {
        assert_eq!(
            ApiError::InvalidUuid(String::from("nope")).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
