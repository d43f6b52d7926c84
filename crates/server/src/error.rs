//! Unified error handling for route handlers.
//!
//! Provides a single `AppError` type; all route handlers return
//! `Result<T, AppError>`. Validation failures that should re-render the
//! originating form are handled inside the handlers themselves - only
//! failures that escape a handler end up here.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Session load/store failed.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad or missing user input.
    #[error("validation: {0}")]
    Validation(String),

    /// Request requires an authenticated admin session.
    #[error("unauthorized")]
    Unauthorized,

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(
            self,
            Self::Database(_) | Self::Session(_) | Self::Internal(_)
        ) {
            tracing::error!(error = %self, "request error");
        }

        match self {
            Self::Unauthorized => Redirect::to("/admin/login").into_response(),
            Self::NotFound(what) => {
                (StatusCode::NOT_FOUND, format!("not found: {what}")).into_response()
            }
            Self::Validation(message) => {
                (StatusCode::UNPROCESSABLE_ENTITY, message).into_response()
            }
            Self::Auth(_) => (StatusCode::UNAUTHORIZED, "invalid credentials").into_response(),
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => {
                // Don't expose internal error details to clients
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(
            status_of(AppError::NotFound("product 9".to_string())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn validation_maps_to_422() {
        assert_eq!(
            status_of(AppError::Validation("bad price".to_string())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn unauthorized_redirects_to_login() {
        let response = AppError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response
                .headers()
                .get(axum::http::header::LOCATION)
                .and_then(|v| v.to_str().ok()),
            Some("/admin/login")
        );
    }

    #[test]
    fn internal_failures_hide_details() {
        assert_eq!(
            status_of(AppError::Internal("secret detail".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
