//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for the protected routes.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::web::cookies::{self, ACCESS_COOKIE};
use crate::web::error::WebError;
use crate::web::state::AppState;

/// The authenticated identity, inserted into request extensions for the
/// handlers behind this middleware.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub email: String,
}

/// Middleware that verifies the access-token cookie.
///
/// On success the claims email is inserted as a `CurrentUser` extension;
/// a missing or invalid token short-circuits with 401.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let cookie_header = req
        .headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .ok_or(WebError::MissingToken)?;

    let token = cookies::cookie_value(cookie_header, ACCESS_COOKIE)
        .ok_or(WebError::MissingToken)?;

    let claims = state
        .tokens
        .verify_access(token)
        .map_err(|_| WebError::InvalidToken)?;

    req.extensions_mut().insert(CurrentUser {
        email: claims.email,
    });

    Ok(next.run(req).await)
}
