//! services/api/src/web/error.rs
//!
//! The typed handler error and its single, central mapping to HTTP
//! responses. Handlers convert every failure into a `WebError` variant;
//! nothing else in the web layer picks status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diary_core::ports::PortError;
use serde_json::json;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// A missing or malformed request field.
    #[error("{0}")]
    Validation(String),

    /// Uniform message for both unknown email and wrong password, so the
    /// two cases cannot be told apart from the outside.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The account exists but the email was never confirmed.
    #[error("Email not confirmed")]
    Unconfirmed,

    #[error("No token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("No refresh token")]
    MissingRefreshToken,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("{0}")]
    NotFound(String),

    /// A persistence failure, echoing the store's message. Leaking the raw
    /// text is part of the legacy contract.
    #[error("{0}")]
    Store(String),

    /// A downstream dependency (mail delivery) failed. The cause is logged,
    /// never echoed.
    #[error("Failed to send confirmation email")]
    Dependency(String),

    #[error("Internal server error")]
    Internal(String),
}

impl From<PortError> for WebError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound(msg) => WebError::NotFound(msg),
            PortError::Conflict(msg) => WebError::Store(msg),
            PortError::Unexpected(msg) => WebError::Store(msg),
        }
    }
}

impl WebError {
    fn status(&self) -> StatusCode {
        match self {
            WebError::Validation(_)
            | WebError::InvalidCredentials
            | WebError::Store(_) => StatusCode::BAD_REQUEST,
            WebError::Unconfirmed => StatusCode::FORBIDDEN,
            WebError::MissingToken
            | WebError::InvalidToken
            | WebError::MissingRefreshToken
            | WebError::InvalidRefreshToken => StatusCode::UNAUTHORIZED,
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::Dependency(_) | WebError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match &self {
            WebError::Dependency(cause) => error!("Mail delivery failed: {}", cause),
            WebError::Internal(cause) => error!("Internal error: {}", cause),
            _ => {}
        }

        let status = self.status();
        let body = Json(json!({ "message": self.to_string() }));
        (status, body).into_response()
    }
}
