//! services/api/src/error.rs
//!
//! Defines the process-level error type for the `api` service binary.
//! Handler-level failures use `web::error::WebError` instead.

use crate::config::ConfigError;

/// The primary error type for service startup and shutdown.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// An error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// An error building the SMTP transport.
    #[error("Mail transport error: {0}")]
    Mail(#[from] lettre::transport::smtp::Error),

    /// A standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected startup errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
