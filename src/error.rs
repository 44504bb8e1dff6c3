use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// ApiError
///
/// The single error taxonomy surfaced by every handler. Each variant maps to
/// exactly one HTTP status; none are retried or recovered internally.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or duplicate input (400).
    #[error("{0}")]
    Validation(String),

    /// The request carries no usable credentials (401).
    #[error("Authentication credentials were not provided.")]
    AuthenticationRequired,

    /// Bearer token failed signature/expiry validation (401).
    #[error("Invalid or expired token.")]
    InvalidToken,

    /// Token-exchange specific: confirmation code mismatch (401).
    #[error("Invalid confirmation code.")]
    InvalidConfirmationCode,

    /// Authenticated but not allowed (403).
    #[error("You do not have permission to perform this action.")]
    PermissionDenied,

    #[error("Not found.")]
    NotFound,

    #[error("Method not allowed.")]
    MethodNotAllowed,

    /// The email channel rejected the message; never swallowed (502).
    #[error("Failed to deliver confirmation email: {0}")]
    EmailDelivery(String),

    #[error("Database error")]
    Database(sqlx::Error),

    #[error("Internal server error")]
    Internal(String),
}

/// JSON error body, DRF-style: a single `detail` message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::InvalidConfirmationCode => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::EmailDelivery(_) => StatusCode::BAD_GATEWAY,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }

        let body = Json(ErrorBody {
            detail: self.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound,
            // Uniqueness constraints (username, email, slug, one review per
            // title/user pair) surface as plain validation failures.
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Validation("This value already exists.".to_string())
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                Self::Validation("This object is still referenced.".to_string())
            }
            _ => Self::Database(err),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(_: jsonwebtoken::errors::Error) -> Self {
        Self::InvalidToken
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
