//! Record store subsystem.
//!
//! # Data Flow
//! ```text
//! orchestrator / health handler
//!     → ProfileStore (port, this file)
//!         → postgres.rs (sqlx PgPool, production)
//!         → memory.rs   (DashMap tables, tests and demo runs)
//! ```
//!
//! # Design Decisions
//! - The store handle is shared read-only by every concurrent operation
//! - "No such subject" is `Ok(None)`, never an error, so callers can tell a
//!   missing resource from a failing store
//! - The store owns retries (connection pool); callers never retry

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use memory::{MemoryStore, StoreEvent, StoreOp};
pub use postgres::PostgresStore;

/// Failure talking to the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A row of the `users` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub created_at: NaiveDateTime,
    pub last_login: Option<NaiveDateTime>,
    pub settings: serde_json::Value,
}

/// A row of the `posts` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PostRecord {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub views: i32,
    pub created_at: NaiveDateTime,
}

/// Port for the key-value record store consumed by the orchestrator.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Point read of a user by email. `None` when no such user exists.
    async fn fetch_user(&self, email: &str) -> StoreResult<Option<UserRecord>>;

    /// The `limit` most viewed posts across all users.
    async fn fetch_trending(&self, limit: i64) -> StoreResult<Vec<PostRecord>>;

    /// Stamp the user's `last_login` with the current time and return the
    /// stored value.
    async fn record_last_login(&self, user_id: i32) -> StoreResult<Option<NaiveDateTime>>;

    /// The user's `limit` most recent posts.
    async fn fetch_user_posts(&self, user_id: i32, limit: i64) -> StoreResult<Vec<PostRecord>>;

    /// Cheap liveness probe.
    async fn ping(&self) -> StoreResult<()>;
}
