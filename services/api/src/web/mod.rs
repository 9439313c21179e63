//! services/api/src/web/mod.rs
//!
//! The HTTP surface: route table, CORS policy, and the shared state.

pub mod auth;
pub mod cookies;
pub mod diary;
pub mod error;
pub mod middleware;
pub mod rest;
pub mod state;
pub mod tokens;

use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::Config;
use state::AppState;

/// Builds the complete application router. Shared between the `api` binary
/// and the integration tests.
pub fn router(app_state: Arc<AppState>) -> Router {
    let cors = cors_layer(&app_state.config);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/api/register", post(auth::register_handler))
        .route("/api/confirm", get(auth::confirm_handler))
        .route("/api/login", post(auth::login_handler))
        .route("/api/refresh", post(auth::refresh_handler))
        .route("/api/logout", post(auth::logout_handler))
        .route("/api/ping", get(rest::ping_handler));

    // Protected routes (valid access cookie required)
    let protected_routes = Router::new()
        .route("/api/me", get(auth::me_handler))
        .route("/api/diary", post(diary::diary_handler))
        .route("/api/diary-send", post(diary::diary_send_handler))
        .route("/api/diary-append", post(diary::diary_append_handler))
        .route("/api/diary-edit", post(diary::diary_edit_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .with_state(app_state)
}

/// Credentialed CORS for the configured browser origins. Cookies require
/// explicit origins; wildcard is not allowed with credentials.
fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT])
}
