//! crates/diary_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the diary backend's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of the concrete database and mail transport.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{DiaryDocument, DiaryRecord, NewUser, User, UserCredentials};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations, abstracting away the
/// specific errors of the underlying store or transport.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    /// A uniqueness conflict, carrying the store's own message.
    #[error("{0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Persistence port: user rows plus the one-per-user diary document.
#[async_trait]
pub trait DiaryStore: Send + Sync {
    // --- Users ---

    /// Inserts a new, unconfirmed user. A duplicate email surfaces as
    /// `PortError::Conflict` carrying the store's message.
    async fn create_user(&self, new_user: NewUser) -> PortResult<User>;

    async fn find_user_by_email(&self, email: &str) -> PortResult<Option<UserCredentials>>;

    /// Atomically flips `is_confirmed` and clears the token for the user
    /// holding `confirm_token`. Returns `false` when no row matched, which
    /// covers both unknown and already-consumed tokens.
    async fn confirm_email(&self, confirm_token: &str) -> PortResult<bool>;

    // --- Diary documents ---

    async fn fetch_diary(&self, user_id: Uuid) -> PortResult<Option<DiaryDocument>>;

    /// Returns the user's diary, creating it with empty defaults if absent.
    async fn get_or_create_diary(&self, user_id: Uuid) -> PortResult<DiaryDocument>;

    /// Whole-document upsert: replaces the record collection and the tag
    /// aggregates. The check-then-write sequence is not atomic; concurrent
    /// writers race and the later write wins in full.
    async fn save_diary(&self, user_id: Uuid, records: Vec<DiaryRecord>)
        -> PortResult<DiaryDocument>;
}

/// Notification port: delivers the confirmation email.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends the confirmation message containing `confirm_url`.
    /// No retries; the first failure is final.
    async fn send_confirmation(&self, to: &str, confirm_url: &str) -> PortResult<()>;
}
