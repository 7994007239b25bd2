//! Connection pool management for the finding store.

use crate::error::{DatabaseError, Result};
use crate::migrations;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;

/// SQLite-backed store of scans and findings.
///
/// Wraps a `SQLx` connection pool; pools are `Arc`-based internally, so
/// the store is cheap to clone and share across tasks.
#[derive(Debug, Clone)]
pub struct ScanStore {
    pool: Pool<Sqlite>,
}

impl ScanStore {
    /// Open (or create) the database at `path` and run migrations.
    ///
    /// # Errors
    /// Returns `DatabaseError` if the file cannot be opened or a
    /// migration fails.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_str = path
            .as_ref()
            .to_str()
            .ok_or_else(|| DatabaseError::Open("database path is not valid UTF-8".to_string()))?;

        let connect_options = SqliteConnectOptions::from_str(path_str)
            .map_err(|e| DatabaseError::Open(format!("invalid connection string: {e}")))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await
            .map_err(|e| DatabaseError::Open(format!("failed to connect: {e}")))?;

        migrations::run_migrations(&pool).await?;

        tracing::info!("Finding store opened at {}", path_str);

        Ok(Self { pool })
    }

    /// Open an in-memory database for tests.
    ///
    /// Pinned to a single connection so every query sees the same
    /// in-memory instance.
    ///
    /// # Errors
    /// Returns `DatabaseError` if the pool cannot be created or a
    /// migration fails.
    pub async fn open_in_memory() -> Result<Self> {
        let connect_options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| DatabaseError::Open(format!("invalid connection string: {e}")))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(connect_options)
            .await
            .map_err(|e| DatabaseError::Open(format!("failed to connect: {e}")))?;

        migrations::run_migrations(&pool).await?;

        Ok(Self { pool })
    }

    /// The underlying `SQLx` pool.
    #[must_use]
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Close the connection pool gracefully.
    pub async fn close(self) {
        self.pool.close().await;
        tracing::info!("Finding store closed");
    }
}
