//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables once at startup
//! into an immutable struct that is passed by `Arc` into every component.
//! The `.env` file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,

    /// Secret for signing access tokens.
    pub jwt_secret: String,
    /// Separate secret for signing refresh tokens. Must differ from
    /// `jwt_secret`, otherwise a leaked refresh token could be replayed
    /// as an access token and vice versa.
    pub refresh_secret: String,
    /// Access-token lifetime in seconds.
    pub jwt_expire_secs: i64,
    /// Refresh-token lifetime in seconds.
    pub refresh_expire_secs: i64,

    /// When true, session cookies are emitted with `Secure; SameSite=None`
    /// for cross-site deployments. Otherwise `SameSite=Lax` is used and
    /// `Secure` follows `cookie_secure`.
    pub cross_site_cookies: bool,
    pub cookie_secure: bool,

    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_pass: String,
    /// The `From:` mailbox, e.g. `"MyApp <noreply@myapp.com>"`.
    pub mail_from: String,
    /// Base URL embedded in confirmation links.
    pub public_base_url: String,

    pub cors_origins: Vec<String>,
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name.to_string()))
}

fn parse_var<T: std::str::FromStr>(name: &str, raw: String) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string()))
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for
    /// development, but this is skipped in test builds to keep tests hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Server and database ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address: SocketAddr = parse_var("BIND_ADDRESS", bind_address_str)?;

        let database_url = required("DATABASE_URL")?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Token signing ---
        let jwt_secret = required("JWT_SECRET")?;
        let refresh_secret = required("REFRESH_SECRET")?;
        if jwt_secret == refresh_secret {
            return Err(ConfigError::InvalidValue(
                "REFRESH_SECRET".to_string(),
                "must differ from JWT_SECRET".to_string(),
            ));
        }

        let jwt_expire_secs = match std::env::var("JWT_EXPIRE") {
            Ok(raw) => parse_var("JWT_EXPIRE", raw)?,
            Err(_) => 15 * 60,
        };
        let refresh_expire_secs = match std::env::var("REFRESH_EXPIRE") {
            Ok(raw) => parse_var("REFRESH_EXPIRE", raw)?,
            Err(_) => 7 * 24 * 60 * 60,
        };

        // --- Cookies ---
        let cross_site_cookies = std::env::var("CROSS_SITE_COOKIES")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let cookie_secure = std::env::var("COOKIE_SECURE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(true);

        // --- Mail ---
        let smtp_host = required("SMTP_HOST")?;
        let smtp_port = match std::env::var("SMTP_PORT") {
            Ok(raw) => parse_var("SMTP_PORT", raw)?,
            Err(_) => 587,
        };
        let smtp_user = required("SMTP_USER")?;
        let smtp_pass = required("SMTP_PASS")?;
        let mail_from = std::env::var("MAIL_FROM")
            .unwrap_or_else(|_| "MyApp <noreply@myapp.com>".to_string());
        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        // --- CORS ---
        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            jwt_secret,
            refresh_secret,
            jwt_expire_secs,
            refresh_expire_secs,
            cross_site_cookies,
            cookie_secure,
            smtp_host,
            smtp_port,
            smtp_user,
            smtp_pass,
            mail_from,
            public_base_url,
            cors_origins,
        })
    }
}
