//! services/api/src/web/state.rs
//!
//! Defines the shared application state.

use std::sync::Arc;

use diary_core::ports::{DiaryStore, Mailer};

use crate::config::Config;
use crate::web::tokens::TokenIssuer;

/// The shared application state, created once at startup and passed to all
/// handlers. Requests hold no other mutable state; every handler call is
/// independent.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DiaryStore>,
    pub mailer: Arc<dyn Mailer>,
    pub tokens: TokenIssuer,
    pub config: Arc<Config>,
}
