//! SQLite database connection and migration management.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use tracing::{debug, info};

use super::{SqliteCategoryRepository, SqliteTodoRepository};
use crate::db::{Database, DbError, DbResult};

// Embed migrations from data/sql/sqlite/ at compile time
static MIGRATOR: Migrator = sqlx::migrate!("data/sql/sqlite");

/// Columns added to `todos` after its first release, with the DDL that adds
/// each one to an older table.
const LEGACY_TODO_COLUMNS: &[(&str, &str)] = &[
    ("description", "ALTER TABLE todos ADD COLUMN description TEXT DEFAULT ''"),
    (
        "category_id",
        "ALTER TABLE todos ADD COLUMN category_id INTEGER REFERENCES categories(id)",
    ),
    ("priority", "ALTER TABLE todos ADD COLUMN priority INTEGER DEFAULT 1"),
    ("due_date", "ALTER TABLE todos ADD COLUMN due_date DATETIME"),
    ("updated_at", "ALTER TABLE todos ADD COLUMN updated_at DATETIME"),
];

/// Timestamp columns that older releases filled with other text layouts
/// (`2024-06-01 12:00:00`, or with a `+09:00` offset).
const TIMESTAMP_COLUMNS: &[(&str, &str)] = &[
    ("todos", "due_date"),
    ("todos", "created_at"),
    ("todos", "updated_at"),
    ("categories", "created_at"),
    ("categories", "updated_at"),
];

/// SQLite database implementation.
///
/// Owns the connection pool. Repositories handed out by the [`Database`]
/// impl hold clones of the pool handle.
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    /// Open (creating if missing) a database file at the given path.
    pub async fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;

        debug!(path = %path.as_ref().display(), "Opened SQLite database");
        Ok(Self { pool })
    }

    /// Create an in-memory database (useful for testing).
    ///
    /// Every connection to `:memory:` is a separate database, so the pool is
    /// pinned to a single connection that is never recycled.
    pub async fn in_memory() -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    /// Get the underlying connection pool.
    ///
    /// This is useful for testing and advanced operations that need
    /// direct database access.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Add any columns missing from a `todos` table created by an older
    /// release. Does nothing on a fresh database.
    async fn upgrade_legacy_todos(&self) -> DbResult<()> {
        let exists: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'todos'",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::Migration {
            message: e.to_string(),
        })?;

        if exists == 0 {
            return Ok(());
        }

        for &(column, ddl) in LEGACY_TODO_COLUMNS {
            let present: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM pragma_table_info('todos') WHERE name = ?")
                    .bind(column)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| DbError::Migration {
                        message: e.to_string(),
                    })?;

            if present == 0 {
                info!(column, "Adding missing column to todos");
                sqlx::query(ddl)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| DbError::Migration {
                        message: format!("failed to add {} column: {}", column, e),
                    })?;
            }
        }

        // Rows written before updated_at existed take their creation time.
        sqlx::query("UPDATE todos SET updated_at = created_at WHERE updated_at IS NULL")
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::Migration {
                message: e.to_string(),
            })?;

        Ok(())
    }

    /// Rewrite every timestamp not already in storage format, converting
    /// offsets to UTC. Text SQLite cannot parse is left alone.
    async fn normalize_timestamps(&self) -> DbResult<()> {
        for &(table, column) in TIMESTAMP_COLUMNS {
            let sql = format!(
                "UPDATE {table} \
                 SET {column} = strftime('%Y-%m-%dT%H:%M:%f', {column}) || '000Z' \
                 WHERE {column} NOT LIKE '____-__-__T__:__:__.______Z' \
                 AND strftime('%Y-%m-%dT%H:%M:%f', {column}) IS NOT NULL"
            );

            let result = sqlx::query(&sql)
                .execute(&self.pool)
                .await
                .map_err(|e| DbError::Migration {
                    message: format!("failed to normalize {}.{}: {}", table, column, e),
                })?;

            if result.rows_affected() > 0 {
                info!(
                    table,
                    column,
                    rows = result.rows_affected(),
                    "Rewrote timestamps to storage format"
                );
            }
        }

        Ok(())
    }
}

impl Database for SqliteDatabase {
    type Categories = SqliteCategoryRepository;
    type Todos = SqliteTodoRepository;

    async fn migrate(&self) -> DbResult<()> {
        self.upgrade_legacy_todos().await?;

        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| DbError::Migration {
                message: e.to_string(),
            })?;

        self.normalize_timestamps().await
    }

    fn categories(&self) -> Self::Categories {
        SqliteCategoryRepository {
            pool: self.pool.clone(),
        }
    }

    fn todos(&self) -> Self::Todos {
        SqliteTodoRepository {
            pool: self.pool.clone(),
        }
    }
}
