//! PostgreSQL storage adapter for Till.
//!
//! Implements [`till_commerce::store::CommerceStore`] on a pooled `sqlx`
//! connection. Every mutating operation is request-scoped: a connection (or
//! transaction) is acquired at the start, and committed or rolled back
//! before the call returns, on every exit path.

mod sessions;
mod store;

use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use thiserror::Error;
use till_commerce::CommerceError;

/// Errors raised while bringing the store up.
#[derive(Debug, Error)]
pub enum PgStoreError {
    /// The connection pool could not be created.
    #[error("failed to create postgres connection pool")]
    ConnectionFailed(#[source] sqlx::Error),

    /// Embedded migrations failed to apply.
    #[error("failed to run database migrations")]
    MigrationFailed(#[source] sqlx::migrate::MigrateError),
}

/// Connection pool configuration.
#[derive(Debug, Clone)]
pub struct PgConfig {
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// Timeout for acquiring a connection from the pool.
    pub acquire_timeout: Duration,
    /// Idle timeout for pooled connections.
    pub idle_timeout: Duration,
}

impl Default for PgConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
        }
    }
}

/// PostgreSQL-backed commerce store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    /// Connect with the default pool configuration.
    pub async fn connect(database_url: &str) -> Result<Self, PgStoreError> {
        Self::connect_with(database_url, PgConfig::default()).await
    }

    /// Connect with a custom pool configuration.
    pub async fn connect_with(database_url: &str, config: PgConfig) -> Result<Self, PgStoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout)
            .connect(database_url)
            .await
            .map_err(PgStoreError::ConnectionFailed)?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    ///
    /// Use this when pool configuration is managed elsewhere or the pool is
    /// shared across components.
    pub fn from_pool(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Apply embedded migrations.
    pub async fn migrate(&self) -> Result<(), PgStoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(PgStoreError::MigrationFailed)
    }

    /// The underlying pool.
    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

/// Map a driver error to the storage-fault variant.
///
/// The driver's error text stays out of client responses; it is logged
/// here instead.
pub(crate) fn storage_err(error: sqlx::Error) -> CommerceError {
    tracing::error!(%error, "postgres operation failed");
    CommerceError::Storage(error.to_string())
}
