//! # Error Handling
//!
//! This module defines the application error type and how each variant is
//! turned into an HTTP response.
//!
//! Every handler and middleware returns [`AppResult`], so failures are
//! mapped to a status code in exactly one place. Server-side failures are
//! logged in full and reported to the client with a generic message.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-wide error type
///
/// ## The `#[from]` attribute
/// Store, hashing and token errors convert automatically with `?`:
/// ```rust,ignore
/// let user = sqlx::query_as::<_, User>(...).fetch_one(pool).await?;
/// // sqlx::Error -> AppError::Database
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Database errors (SQLx library errors)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password hashing or verification failed inside bcrypt
    #[error("Password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    /// Signing a session token failed
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Field-level validation errors (400)
    ///
    /// Carries every message collected while validating the input.
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Bad request errors (400)
    #[error("{0}")]
    BadRequest(String),

    /// No session was presented (401)
    #[error("{0}")]
    Unauthenticated(String),

    /// A session token was presented but is forged, malformed or expired (401)
    #[error("Invalid or expired token")]
    InvalidSession,

    /// Authenticated but not allowed (403)
    #[error("{0}")]
    Forbidden(String),

    /// CSRF header missing or not matching the cookie (403)
    #[error("Invalid CSRF token")]
    InvalidCsrf,

    /// Resource not found errors (404)
    #[error("{0}")]
    NotFound(String),

    /// Unique constraint collisions, e.g. a taken username (409)
    #[error("{0}")]
    Conflict(String),

    /// Unexpected failures that shouldn't normally occur (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable, machine-readable code sent alongside the message
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Unauthenticated(_) => "UNAUTHENTICATED",
            AppError::InvalidSession => "INVALID_SESSION",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::InvalidCsrf => "INVALID_CSRF_TOKEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Database(_)
            | AppError::Hashing(_)
            | AppError::Token(_)
            | AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) | AppError::InvalidSession => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) | AppError::InvalidCsrf => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_)
            | AppError::Hashing(_)
            | AppError::Token(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert AppError into an HTTP response
///
/// Body format:
/// ```json
/// { "error": "message", "code": "NOT_FOUND" }
/// ```
/// Validation errors also carry `"errors": ["...", "..."]`.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let body = match &self {
            AppError::Database(e) => {
                // Log detailed error for debugging (not shown to user)
                tracing::error!("Database error: {:?}", e);
                json!({ "error": "Internal server error", "code": code })
            }
            AppError::Hashing(e) => {
                tracing::error!("Password hashing error: {:?}", e);
                json!({ "error": "Internal server error", "code": code })
            }
            AppError::Token(e) => {
                tracing::error!("Token signing error: {:?}", e);
                json!({ "error": "Internal server error", "code": code })
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                json!({ "error": "Internal server error", "code": code })
            }
            AppError::Validation(errors) => json!({
                "error": errors.first().cloned().unwrap_or_else(|| "Invalid input".to_string()),
                "code": code,
                "errors": errors,
            }),
            // For the remaining errors the message is safe to show to users
            _ => json!({ "error": self.to_string(), "code": code }),
        };

        (status, Json(body)).into_response()
    }
}

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Extractor rejections, so malformed requests get the same JSON body as
/// every other error
///
/// A well-formed body whose fields have the wrong types is a validation
/// failure; anything else the client sent is a plain bad request.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => AppError::Validation(vec![e.body_text()]),
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
