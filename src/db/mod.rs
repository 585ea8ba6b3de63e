//! Database layer for openlms.

pub mod account;
pub mod course;
pub mod course_repository;
pub mod repository;
pub mod schema;

pub use account::{Account, NewAccount, Role};
pub use course::{Course, CourseUpdate, Lecture, NewCourse, NewLecture};
pub use course_repository::CourseRepository;
pub use repository::AccountRepository;

use std::path::Path;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::{LmsError, Result};

/// Database connection wrapper.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) the database at the given path and run migrations.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", path.display()))
            .map_err(|e| LmsError::Database(e.to_string()))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| LmsError::Database(e.to_string()))?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Open an in-memory database. Used by tests.
    ///
    /// The pool is capped at a single connection so every query sees the
    /// same in-memory database.
    pub async fn open_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| LmsError::Database(e.to_string()))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            // The database lives and dies with this one connection
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| LmsError::Database(e.to_string()))?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Access the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Apply pending schema migrations.
    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| LmsError::Database(e.to_string()))?;

        let current: Option<(i64,)> = sqlx::query_as("SELECT version FROM schema_version")
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| LmsError::Database(e.to_string()))?;

        let current = match current {
            Some((v,)) => v,
            None => {
                sqlx::query("INSERT INTO schema_version (version) VALUES (0)")
                    .execute(&self.pool)
                    .await
                    .map_err(|e| LmsError::Database(e.to_string()))?;
                0
            }
        };

        for (i, migration) in schema::MIGRATIONS.iter().enumerate() {
            let version = (i + 1) as i64;
            if version <= current {
                continue;
            }

            info!("applying schema migration v{}", version);
            sqlx::raw_sql(migration)
                .execute(&self.pool)
                .await
                .map_err(|e| LmsError::Database(format!("migration v{version} failed: {e}")))?;

            sqlx::query("UPDATE schema_version SET version = ?")
                .bind(version)
                .execute(&self.pool)
                .await
                .map_err(|e| LmsError::Database(e.to_string()))?;
        }

        Ok(())
    }

    /// Current schema version.
    pub async fn schema_version(&self) -> Result<i64> {
        let (version,): (i64,) = sqlx::query_as("SELECT version FROM schema_version")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| LmsError::Database(e.to_string()))?;
        Ok(version)
    }
}
