//! services/api/src/web/auth.rs
//!
//! Authentication endpoints: register, confirm, login, refresh, logout,
//! and the profile fetch.

use argon2::{
    password_hash::{rand_core::OsRng as HashOsRng, PasswordHash, PasswordHasher,
        PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{Extension, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse},
    Json,
};
use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use utoipa::ToSchema;

use diary_core::domain::NewUser;

use crate::web::cookies::{
    self, clear_cookie, session_cookie, CookiePolicy, ACCESS_COOKIE, REFRESH_COOKIE,
};
use crate::web::error::WebError;
use crate::web::middleware::CurrentUser;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub username: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct ConfirmQuery {
    pub token: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct PublicUser {
    pub email: String,
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
pub struct MeResponse {
    pub user: PublicUser,
}

//=========================================================================================
// Helpers
//=========================================================================================

/// Rejects absent or empty credential fields with a 400.
fn require_field(value: Option<String>, message: &str) -> Result<String, WebError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| WebError::Validation(message.to_string()))
}

/// Generates the 256-bit confirmation token as hex.
fn confirmation_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/register - Create a new, unconfirmed account and mail the
/// confirmation link.
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered; confirmation email sent", body = MessageResponse),
        (status = 400, description = "Missing fields or duplicate email"),
        (status = 500, description = "Email delivery failed; the account still exists unconfirmed")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<MessageResponse>, WebError> {
    let email = require_field(req.email, "Email and password are required")?;
    let password = require_field(req.password, "Email and password are required")?;

    // 1. Hash the password.
    let salt = SaltString::generate(&mut HashOsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| WebError::Internal(format!("Failed to hash password: {}", e)))?
        .to_string();

    // 2. Insert the user row. A duplicate email surfaces the store's
    // message as a 400.
    let confirm_token = confirmation_token();
    let user = state
        .store
        .create_user(NewUser {
            email: email.clone(),
            username: req.username.filter(|u| !u.is_empty()),
            password_hash,
            confirm_token: confirm_token.clone(),
        })
        .await?;

    // 3. Best-effort empty diary; the read path creates it lazily anyway.
    if let Err(e) = state.store.get_or_create_diary(user.id).await {
        warn!("Could not pre-create diary for {}: {}", user.email, e);
    }

    // 4. Send the confirmation link. On failure the user row persists in
    // its unconfirmed, token-holding state; there is no rollback.
    let confirm_url = format!(
        "{}/api/confirm?token={}",
        state.config.public_base_url, confirm_token
    );
    state
        .mailer
        .send_confirmation(&email, &confirm_url)
        .await
        .map_err(|e| WebError::Dependency(e.to_string()))?;

    Ok(Json(MessageResponse::new(
        "Registered! Check your email to confirm the address.",
    )))
}

/// GET /api/confirm - Consume a confirmation token. Plain-text responses,
/// served directly to the browser from the emailed link.
#[utoipa::path(
    get,
    path = "/api/confirm",
    params(("token" = Option<String>, Query, description = "The emailed confirmation token")),
    responses(
        (status = 200, description = "Email confirmed", content_type = "text/plain"),
        (status = 400, description = "Missing, unknown, or already consumed token"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn confirm_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConfirmQuery>,
) -> (StatusCode, String) {
    let Some(token) = query.token.filter(|t| !t.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "The token is missing".to_string());
    };

    match state.store.confirm_email(&token).await {
        // A second attempt with the same token finds no row: indistinguishable
        // from an invalid token.
        Ok(true) => (
            StatusCode::OK,
            "Email confirmed! You can now login to the site.".to_string(),
        ),
        Ok(false) => (StatusCode::BAD_REQUEST, "Invalid token".to_string()),
        Err(e) => {
            tracing::error!("Confirmation failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
        }
    }
}

/// POST /api/login - Verify credentials and set the session cookies.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; access and refresh cookies set", body = MessageResponse),
        (status = 400, description = "Missing fields or invalid credentials"),
        (status = 403, description = "Email not confirmed")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, WebError> {
    let email = require_field(req.email, "Email and password are required")?;
    let password = require_field(req.password, "Email and password are required")?;

    // Unknown email and wrong password must be indistinguishable.
    let user = state
        .store
        .find_user_by_email(&email)
        .await?
        .ok_or(WebError::InvalidCredentials)?;

    if !user.is_confirmed {
        return Err(WebError::Unconfirmed);
    }

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| WebError::Internal(format!("Stored hash is unparseable: {}", e)))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| WebError::InvalidCredentials)?;

    let access = state
        .tokens
        .issue_access(&user.email)
        .map_err(|e| WebError::Internal(format!("Failed to sign access token: {}", e)))?;
    let refresh = state
        .tokens
        .issue_refresh(&user.email)
        .map_err(|e| WebError::Internal(format!("Failed to sign refresh token: {}", e)))?;

    // Tokens travel only as cookies; the body carries no token material.
    let policy = CookiePolicy::from_config(&state.config);
    let cookies = AppendHeaders([
        (
            header::SET_COOKIE,
            session_cookie(ACCESS_COOKIE, &access, state.tokens.access_ttl_secs(), policy),
        ),
        (
            header::SET_COOKIE,
            session_cookie(
                REFRESH_COOKIE,
                &refresh,
                state.tokens.refresh_ttl_secs(),
                policy,
            ),
        ),
    ]);

    Ok((cookies, Json(MessageResponse::new("Logged in!"))))
}

/// POST /api/refresh - Mint a new access token from the refresh cookie.
/// The refresh token itself is never rotated.
#[utoipa::path(
    post,
    path = "/api/refresh",
    responses(
        (status = 200, description = "New access cookie set", body = MessageResponse),
        (status = 401, description = "Missing or invalid refresh token")
    )
)]
pub async fn refresh_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, WebError> {
    let cookie_header = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .ok_or(WebError::MissingRefreshToken)?;
    let refresh_token = cookies::cookie_value(cookie_header, REFRESH_COOKIE)
        .ok_or(WebError::MissingRefreshToken)?;

    let claims = state
        .tokens
        .verify_refresh(refresh_token)
        .map_err(|_| WebError::InvalidRefreshToken)?;

    let access = state
        .tokens
        .issue_access(&claims.email)
        .map_err(|e| WebError::Internal(format!("Failed to sign access token: {}", e)))?;

    let policy = CookiePolicy::from_config(&state.config);
    let cookie = [(
        header::SET_COOKIE,
        session_cookie(ACCESS_COOKIE, &access, state.tokens.access_ttl_secs(), policy),
    )];

    Ok((cookie, Json(MessageResponse::new("Token refreshed"))))
}

/// POST /api/logout - Clear both session cookies. Stateless: tokens already
/// issued remain valid until their natural expiry.
#[utoipa::path(
    post,
    path = "/api/logout",
    responses((status = 200, description = "Cookies cleared", body = MessageResponse))
)]
pub async fn logout_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let policy = CookiePolicy::from_config(&state.config);
    let cookies = AppendHeaders([
        (header::SET_COOKIE, clear_cookie(ACCESS_COOKIE, policy)),
        (header::SET_COOKIE, clear_cookie(REFRESH_COOKIE, policy)),
    ]);

    (cookies, Json(MessageResponse::new("Logged out")))
}

/// GET /api/me - Return the authenticated user's public profile.
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "The authenticated user", body = MeResponse),
        (status = 401, description = "Missing or invalid access token"),
        (status = 404, description = "The user no longer exists")
    )
)]
pub async fn me_handler(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<MeResponse>, WebError> {
    let user = state
        .store
        .find_user_by_email(&current.email)
        .await?
        .ok_or_else(|| WebError::NotFound("User not found".to_string()))?;

    Ok(Json(MeResponse {
        user: PublicUser {
            email: user.email,
            username: user.username,
            created_at: user.created_at,
        },
    }))
}
