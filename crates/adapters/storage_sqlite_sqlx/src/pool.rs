//! `SQLite` connection pool setup and migration runner.

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

use crate::error::StorageError;

/// Configuration for the `SQLite` storage adapter.
#[derive(Debug, Clone)]
pub struct Config {
    /// `SQLite` connection URL (e.g. `sqlite:tripdesk.db` or `sqlite::memory:`).
    pub database_url: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
    /// How long a connection waits on a locked database before failing.
    pub busy_timeout: Duration,
}

impl Config {
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
    pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

    /// Configuration for `database_url` with default pool settings.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: Self::DEFAULT_MAX_CONNECTIONS,
            busy_timeout: Self::DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Build a [`Database`] from this configuration.
    ///
    /// Creates the database file if missing, switches file databases to
    /// write-ahead logging so readers do not block the writer, and runs all
    /// pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the connection or migrations fail.
    pub async fn build(self) -> Result<Database, StorageError> {
        let mut options = SqliteConnectOptions::from_str(&self.database_url)?
            .create_if_missing(true)
            .busy_timeout(self.busy_timeout);
        if !is_in_memory(&self.database_url) {
            options = options
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal);
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        tracing::debug!(
            max_connections = self.max_connections,
            busy_timeout = ?self.busy_timeout,
            "sqlite pool ready"
        );
        Ok(Database { pool })
    }
}

// In-memory databases keep their own journal and ignore WAL.
fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Holds the `SQLite` connection pool and provides access to it.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Borrow the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
