//! crates/diary_core/src/domain.rs
//!
//! Defines the core data structures for the diary backend.
//! The diary types carry serde derives because a diary is, by definition,
//! a JSON document: the same shape is stored as JSONB and served on the wire.
//! Legacy field names (`color_Tags`, `all_Tags`, `all_Color_Tags`) are kept
//! for compatibility with existing clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user as exposed to the rest of the application. Never carries the
/// password hash or the confirmation token.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub is_confirmed: bool,
    pub created_at: DateTime<Utc>,
}

/// The full credential row, used only by the auth flows.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub password_hash: String,
    pub is_confirmed: bool,
    pub created_at: DateTime<Utc>,
}

/// The fields needed to insert a new, unconfirmed user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: Option<String>,
    pub password_hash: String,
    pub confirm_token: String,
}

/// One diary entry. `id` is client-assigned and identifies the record
/// for edit-in-place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub feels: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, rename = "color_Tags")]
    pub color_tags: Vec<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
}

/// Aggregate tag indexes over a whole diary, recomputed on every write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagAggregates {
    #[serde(rename = "all_Tags")]
    pub all_tags: Vec<String>,
    #[serde(rename = "all_Color_Tags")]
    pub all_color_tags: Vec<String>,
}

/// The per-user diary document: at most one per user, created lazily
/// with empty defaults on first read or write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiaryDocument {
    pub id_user: Uuid,
    pub records: Vec<DiaryRecord>,
    #[serde(flatten)]
    pub aggregates: TagAggregates,
    pub updated_at: DateTime<Utc>,
}

/// Computes the aggregate tag indexes for a record collection: the sorted,
/// deduplicated union of every record's `tags` and `color_Tags`.
pub fn tag_aggregates(records: &[DiaryRecord]) -> TagAggregates {
    let mut all_tags: Vec<String> = records
        .iter()
        .flat_map(|r| r.tags.iter().cloned())
        .collect();
    all_tags.sort();
    all_tags.dedup();

    let mut all_color_tags: Vec<String> = records
        .iter()
        .flat_map(|r| r.color_tags.iter().cloned())
        .collect();
    all_color_tags.sort();
    all_color_tags.dedup();

    TagAggregates {
        all_tags,
        all_color_tags,
    }
}
