//! PostgreSQL adapter for [`ProfileStore`].

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::store::{PostRecord, ProfileStore, StoreResult, UserRecord};

#[derive(Clone, Debug)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Open the connection pool described by `config`.
    ///
    /// The pool is filled to `min_connections` eagerly; connections are not
    /// pinged before being handed out.
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let options = PgConnectOptions::from_str(&config.url())?.disable_statement_logging();

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .test_before_acquire(false)
            .connect_with(options)
            .await?;

        tracing::info!(
            host = %config.host,
            database = %config.name,
            min_connections = config.min_connections,
            max_connections = config.max_connections,
            "Database pool ready"
        );

        Ok(Self { pool })
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ProfileStore for PostgresStore {
    async fn fetch_user(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, email, created_at, last_login, settings FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool())
        .await?;
        Ok(user)
    }

    async fn fetch_trending(&self, limit: i64) -> StoreResult<Vec<PostRecord>> {
        let posts = sqlx::query_as::<_, PostRecord>(
            "SELECT id, title, content, views, created_at FROM posts ORDER BY views DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await?;
        Ok(posts)
    }

    async fn record_last_login(&self, user_id: i32) -> StoreResult<Option<NaiveDateTime>> {
        let last_login = sqlx::query_scalar::<_, Option<NaiveDateTime>>(
            "UPDATE users SET last_login = NOW() WHERE id = $1 RETURNING last_login",
        )
        .bind(user_id)
        .fetch_one(self.pool())
        .await?;
        Ok(last_login)
    }

    async fn fetch_user_posts(&self, user_id: i32, limit: i64) -> StoreResult<Vec<PostRecord>> {
        let posts = sqlx::query_as::<_, PostRecord>(
            r#"
            SELECT id, title, content, views, created_at
            FROM posts
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.pool())
        .await?;
        Ok(posts)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(self.pool()).await?;
        Ok(())
    }
}
