//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. [`AppError`] renders as
//! `{"code", "message", "errors"?}` and captures server errors to Sentry
//! before responding.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::middleware::AuthError;
use crate::validation::{FieldError, Location, ValidationErrors};

/// Application-level error type for the shop API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request failed schema validation.
    #[error("Validation error")]
    Validation(ValidationErrors),

    /// Missing or invalid credentials.
    #[error("Unauthorized")]
    Unauthorized,

    /// Credentials lack the required role.
    #[error("Forbidden")]
    Forbidden,

    /// No such shop.
    #[error("Shop does not exist")]
    NotFound,

    /// Write collided with a unique field.
    #[error("{0}")]
    Conflict(String),

    /// Store operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::Conflict(message) => Self::Conflict(message),
            RepositoryError::Invalid(violation) => Self::Validation(ValidationErrors::single(
                violation.field(),
                Location::Body,
                violation.to_string(),
            )),
            RepositoryError::DataCorruption(detail) => Self::Internal(detail),
            other => Self::Database(other),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthorized => Self::Unauthorized,
            AuthError::Forbidden { .. } => Self::Forbidden,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else if let Self::Validation(errors) = &self {
            let fields: Vec<&str> = errors.errors().iter().map(|e| e.field.as_str()).collect();
            tracing::debug!(?fields, "Request failed validation");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        let unauthorized = matches!(self, Self::Unauthorized);
        let errors = match self {
            Self::Validation(errors) => Some(errors.into_errors()),
            _ => None,
        };

        let body = ErrorBody {
            code: status.as_u16(),
            message,
            errors,
        };

        let mut response = (status, Json(body)).into_response();
        if unauthorized {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
