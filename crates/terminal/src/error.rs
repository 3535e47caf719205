//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-class errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`. Register guard failures are client errors with a
//! machine-readable code; back-office failures surface with a generic
//! message when the upstream supplies none.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use countertop_register::{RegisterError, StoreError};

use crate::backoffice::BackofficeError;

/// Application-level error type for the terminal.
#[derive(Debug, Error)]
pub enum AppError {
    /// A register mutation was rejected.
    #[error("Register error: {0}")]
    Register(#[from] RegisterError),

    /// A back-office API call failed.
    #[error("Back-office error: {0}")]
    Backoffice(#[from] BackofficeError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        Self::Register(RegisterError::Store(error))
    }
}

/// JSON error payload: `{"error": {"code": ..., "message": ...}}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

impl AppError {
    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Internal(_)
                | Self::Register(RegisterError::Store(_))
                | Self::Backoffice(BackofficeError::Http(_) | BackofficeError::Status { .. })
        )
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Register(error) => match error {
                RegisterError::OutOfStock { .. }
                | RegisterError::InsufficientStock { .. }
                | RegisterError::VariantRequired { .. }
                | RegisterError::EmptyCart => StatusCode::CONFLICT,
                RegisterError::UnknownVariant { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                RegisterError::UnknownSavedCart { .. } => StatusCode::NOT_FOUND,
                RegisterError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Backoffice(error) => match error {
                BackofficeError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
                BackofficeError::NotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Register(error) => error.code(),
            Self::Backoffice(error) => error.code(),
            Self::NotFound(_) => "not_found",
            Self::BadRequest(_) => "bad_request",
            Self::Internal(_) => "internal",
        }
    }

    /// Message shown to the client; internal details stay in the logs.
    fn message(&self) -> String {
        match self {
            Self::Register(RegisterError::Store(_)) | Self::Internal(_) => {
                "Internal server error".to_string()
            }
            Self::Backoffice(error) => match error {
                BackofficeError::RateLimited(seconds) => {
                    format!("Back-office rate limited, retry after {seconds} seconds")
                }
                BackofficeError::NotFound(what) => format!("Not found: {what}"),
                _ => "Back-office unavailable".to_string(),
            },
            Self::Register(error) => error.to_string(),
            Self::NotFound(what) => format!("Not found: {what}"),
            Self::BadRequest(message) => message.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code(),
                message: self.message(),
            },
        };

        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use countertop_core::ProductId;

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_register_guards_are_conflicts() {
        assert_eq!(
            get_status(AppError::Register(RegisterError::OutOfStock {
                product: ProductId::new(1)
            })),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Register(RegisterError::InsufficientStock {
                requested: 4,
                available: 2
            })),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Register(RegisterError::VariantRequired {
                product: ProductId::new(1)
            })),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_rate_limit_maps_to_429() {
        assert_eq!(
            get_status(AppError::Backoffice(BackofficeError::RateLimited(3))),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = AppError::Internal("connection pool exhausted".to_string());
        assert_eq!(err.message(), "Internal server error");
        assert_eq!(get_status(err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_not_found_passthrough() {
        let err = AppError::NotFound("saved cart".to_string());
        assert_eq!(err.to_string(), "Not found: saved cart");
        assert_eq!(get_status(err), StatusCode::NOT_FOUND);
    }
}
