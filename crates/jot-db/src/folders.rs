//! Folder repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use tracing::instrument;
use uuid::Uuid;

use jot_core::{new_v7, Error, Folder, FolderRepository, Result};

/// PostgreSQL implementation of FolderRepository.
#[derive(Clone)]
pub struct PgFolderRepository {
    pool: Pool<Postgres>,
}

impl PgFolderRepository {
    /// Create a new PgFolderRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn folder_from_row(row: &sqlx::postgres::PgRow) -> Folder {
    Folder {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        created_at_utc: row.get("created_at_utc"),
        note_count: row.get("note_count"),
    }
}

#[async_trait]
impl FolderRepository for PgFolderRepository {
    #[instrument(skip(self, description), fields(subsystem = "db", component = "folders", op = "create"))]
    async fn create(&self, name: &str, description: Option<&str>) -> Result<Folder> {
        if name.trim().is_empty() {
            return Err(Error::InvalidInput("Folder name cannot be empty".to_string()));
        }

        let id = new_v7();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO folder (id, name, description, created_at_utc)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(Folder {
            id,
            name: name.to_string(),
            description: description.map(|s| s.to_string()),
            created_at_utc: now,
            note_count: 0,
        })
    }

    async fn get(&self, id: Uuid) -> Result<Option<Folder>> {
        let row = sqlx::query(
            r#"
            SELECT f.id, f.name, f.description, f.created_at_utc,
                   COALESCE((SELECT COUNT(*) FROM note WHERE folder_id = f.id), 0) as note_count
            FROM folder f
            WHERE f.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(|r| folder_from_row(&r)))
    }

    #[instrument(skip(self), fields(subsystem = "db", component = "folders", op = "list"))]
    async fn list(&self) -> Result<Vec<Folder>> {
        let rows = sqlx::query(
            r#"
            SELECT f.id, f.name, f.description, f.created_at_utc,
                   COALESCE((SELECT COUNT(*) FROM note WHERE folder_id = f.id), 0) as note_count
            FROM folder f
            ORDER BY f.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(folder_from_row).collect())
    }

    async fn update(&self, id: Uuid, name: &str, description: Option<&str>) -> Result<Folder> {
        if name.trim().is_empty() {
            return Err(Error::InvalidInput("Folder name cannot be empty".to_string()));
        }

        let result = sqlx::query("UPDATE folder SET name = $1, description = $2 WHERE id = $3")
            .bind(name)
            .bind(description)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::FolderNotFound(id));
        }

        self.get(id).await?.ok_or(Error::FolderNotFound(id))
    }
}
