//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, the concrete implementation of
//! the `DiaryStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diary_core::domain::{
    tag_aggregates, DiaryDocument, DiaryRecord, NewUser, TagAggregates, User, UserCredentials,
};
use diary_core::ports::{DiaryStore, PortError, PortResult};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DiaryStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

fn store_err(e: sqlx::Error) -> PortError {
    // Unique violations carry the store's own message so the caller can
    // surface it verbatim, matching the legacy contract.
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return PortError::Conflict(db_err.message().to_string());
        }
    }
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    username: Option<String>,
    is_confirmed: bool,
    created_at: DateTime<Utc>,
}
impl UserRow {
    fn to_domain(self) -> User {
        User {
            id: self.id,
            email: self.email,
            username: self.username,
            is_confirmed: self.is_confirmed,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRow {
    id: Uuid,
    email: String,
    username: Option<String>,
    password_hash: String,
    is_confirmed: bool,
    created_at: DateTime<Utc>,
}
impl CredentialsRow {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            id: self.id,
            email: self.email,
            username: self.username,
            password_hash: self.password_hash,
            is_confirmed: self.is_confirmed,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct DiaryRow {
    id_user: Uuid,
    records: Json<Vec<DiaryRecord>>,
    all_tags: Vec<String>,
    all_color_tags: Vec<String>,
    updated_at: DateTime<Utc>,
}
impl DiaryRow {
    fn to_domain(self) -> DiaryDocument {
        DiaryDocument {
            id_user: self.id_user,
            records: self.records.0,
            aggregates: TagAggregates {
                all_tags: self.all_tags,
                all_color_tags: self.all_color_tags,
            },
            updated_at: self.updated_at,
        }
    }
}

//=========================================================================================
// `DiaryStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl DiaryStore for DbAdapter {
    async fn create_user(&self, new_user: NewUser) -> PortResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (email, username, password_hash, confirm_token) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, email, username, is_confirmed, created_at",
        )
        .bind(&new_user.email)
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .bind(&new_user.confirm_token)
        .fetch_one(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.to_domain())
    }

    async fn find_user_by_email(&self, email: &str) -> PortResult<Option<UserCredentials>> {
        let row = sqlx::query_as::<_, CredentialsRow>(
            "SELECT id, email, username, password_hash, is_confirmed, created_at \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.map(CredentialsRow::to_domain))
    }

    async fn confirm_email(&self, confirm_token: &str) -> PortResult<bool> {
        // Single statement: the flip and the token clearing are atomic, so a
        // consumed token can never match again.
        let result = sqlx::query(
            "UPDATE users SET is_confirmed = TRUE, confirm_token = NULL \
             WHERE confirm_token = $1",
        )
        .bind(confirm_token)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn fetch_diary(&self, user_id: Uuid) -> PortResult<Option<DiaryDocument>> {
        let row = sqlx::query_as::<_, DiaryRow>(
            "SELECT id_user, records, all_tags, all_color_tags, updated_at \
             FROM diaries WHERE id_user = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.map(DiaryRow::to_domain))
    }

    async fn get_or_create_diary(&self, user_id: Uuid) -> PortResult<DiaryDocument> {
        if let Some(diary) = self.fetch_diary(user_id).await? {
            return Ok(diary);
        }

        let row = sqlx::query_as::<_, DiaryRow>(
            "INSERT INTO diaries (id_user) VALUES ($1) \
             ON CONFLICT (id_user) DO UPDATE SET id_user = EXCLUDED.id_user \
             RETURNING id_user, records, all_tags, all_color_tags, updated_at",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.to_domain())
    }

    async fn save_diary(
        &self,
        user_id: Uuid,
        records: Vec<DiaryRecord>,
    ) -> PortResult<DiaryDocument> {
        let aggregates = tag_aggregates(&records);

        // Check-then-write upsert. The two statements are not wrapped in a
        // transaction: concurrent writers for the same user race and the
        // later write wins in full (legacy last-write-wins contract).
        let exists = sqlx::query_scalar::<_, i32>("SELECT 1 FROM diaries WHERE id_user = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)?
            .is_some();

        // Both statements bind (id_user, records, all_tags, all_color_tags).
        let query = if exists {
            "UPDATE diaries \
             SET records = $2, all_tags = $3, all_color_tags = $4, updated_at = now() \
             WHERE id_user = $1 \
             RETURNING id_user, records, all_tags, all_color_tags, updated_at"
        } else {
            "INSERT INTO diaries (id_user, records, all_tags, all_color_tags) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id_user, records, all_tags, all_color_tags, updated_at"
        };

        let row = sqlx::query_as::<_, DiaryRow>(query)
            .bind(user_id)
            .bind(Json(&records))
            .bind(&aggregates.all_tags)
            .bind(&aggregates.all_color_tags)
            .fetch_one(&self.pool)
            .await
            .map_err(store_err)?;

        Ok(row.to_domain())
    }
}
