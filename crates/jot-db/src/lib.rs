//! # jot-db
//!
//! PostgreSQL note and folder store for jot.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for notes and folders
//! - Idempotent schema bootstrap
//! - An in-memory store for tests (feature `memory`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use jot_db::Database;
//! use jot_core::NoteRepository;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/jot").await?;
//!     db.migrate().await?;
//!
//!     let note = db.notes.insert("Hello, world!").await?;
//!     println!("Created note: {}", note.id);
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tracing::info;

use jot_core::{defaults, Error, Result};

pub mod folders;
pub mod notes;

#[cfg(any(test, feature = "memory"))]
pub mod memory;

// Re-export core types
pub use jot_core::*;

pub use folders::PgFolderRepository;
pub use notes::PgNoteRepository;

#[cfg(any(test, feature = "memory"))]
pub use memory::MemoryStore;

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Note repository for CRUD operations.
    pub notes: PgNoteRepository,
    /// Folder repository.
    pub folders: PgFolderRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            notes: PgNoteRepository::new(pool.clone()),
            folders: PgFolderRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect to PostgreSQL and build the repository set.
    pub async fn connect(database_url: &str) -> Result<Self> {
        info!(
            subsystem = "database",
            component = "pool",
            op = "create",
            max_connections = defaults::POOL_MAX_CONNECTIONS,
            "Creating database connection pool"
        );

        let pool = PgPoolOptions::new()
            .max_connections(defaults::POOL_MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(defaults::POOL_CONNECT_TIMEOUT_SECS))
            .connect(database_url)
            .await
            .map_err(Error::Database)?;

        Ok(Self::new(pool))
    }

    /// Apply the schema if it is not already present.
    ///
    /// Safe to run on every startup; both tables use `IF NOT EXISTS`.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS folder (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                created_at_utc TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS note (
                id UUID PRIMARY KEY,
                content TEXT NOT NULL DEFAULT '',
                folder_id UUID REFERENCES folder(id) ON DELETE SET NULL,
                created_at_utc TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at_utc TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        info!(
            subsystem = "database",
            component = "migrate",
            "Schema bootstrap complete"
        );
        Ok(())
    }
}
