//! Unified error handling with Sentry integration.
//!
//! Provides a unified `ApiError` type that captures unexpected errors to
//! Sentry before responding to the client. All route handlers should return
//! `Result<T, ApiError>`.
//!
//! The error taxonomy mirrors what the frontend expects:
//! - validation failures carry a per-field error map and map to 422
//! - authentication failures map to 401 with a deliberately generic message
//! - role failures map to 403
//! - unknown resources map to 404
//! - rejected status transitions map to 409
//! - everything else maps to 500 with the detail kept server-side

use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use gala_core::InvalidTransition;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Per-field validation messages, keyed the way the frontend displays them
/// (`client_email`, `produits.0.id`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    /// Create an empty error map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Whether any field has a recorded message.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for one field, if any.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Turn the accumulated map into a result: `Ok` when no field failed.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one message was recorded.
    pub fn into_result(self) -> std::result::Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed for {} field(s)", self.0.len())
    }
}

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request payload failed validation; nothing was persisted.
    #[error("{0}")]
    Validation(ValidationErrors),

    /// Missing, invalid, expired or revoked credentials.
    #[error("unauthenticated")]
    Unauthorized,

    /// Valid credentials, insufficient role.
    #[error("forbidden")]
    Forbidden,

    /// Resource does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Status change rejected by the lifecycle table.
    #[error(transparent)]
    Transition(#[from] InvalidTransition),

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(RepositoryError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound("resource"),
            other => Self::Database(other),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Repository(e) => Self::Database(e),
            // Everything else collapses into one generic rejection so the
            // response never reveals which check failed.
            _ => Self::Unauthorized,
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Wire shape of an error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<ValidationErrors>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Transition(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let (message, errors) = match self {
            Self::Validation(errors) => ("validation failed".to_string(), Some(errors)),
            Self::Unauthorized => ("invalid credentials".to_string(), None),
            Self::Forbidden => ("insufficient permissions".to_string(), None),
            Self::NotFound(what) => (format!("{what} not found"), None),
            Self::Transition(err) => (err.to_string(), None),
            Self::Database(_) | Self::Internal(_) => ("internal server error".to_string(), None),
        };

        let body = ErrorBody {
            success: false,
            message,
            errors,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use gala_core::OrderStatus;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        let mut errors = ValidationErrors::new();
        errors.add("client_name", "required");
        assert_eq!(
            status_of(ApiError::Validation(errors)),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status_of(ApiError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(ApiError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(status_of(ApiError::NotFound("order")), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(ApiError::Transition(InvalidTransition {
                from: OrderStatus::Confirmed,
                to: OrderStatus::Cancelled,
            })),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ApiError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_error_collapses_to_generic_401() {
        // Whatever failed internally, the caller sees the same rejection.
        for err in [AuthError::InvalidCredentials, AuthError::InvalidToken, AuthError::InvalidHandshake] {
            let api: ApiError = err.into();
            assert!(matches!(api, ApiError::Unauthorized));
        }
    }

    #[test]
    fn test_repository_not_found_maps_to_404() {
        let api: ApiError = RepositoryError::NotFound.into();
        assert_eq!(status_of(api), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_errors_accumulate() {
        let mut errors = ValidationErrors::new();
        errors.add("produits.0.id", "unknown product reference");
        errors.add("produits.0.id", "still unknown");
        errors.add("client_phone", "required");
        assert_eq!(errors.field("produits.0.id").map(<[String]>::len), Some(2));
        assert!(errors.into_result().is_err());

        assert!(ValidationErrors::new().into_result().is_ok());
    }
}
