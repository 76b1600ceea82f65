//! Note repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use tracing::instrument;
use uuid::Uuid;

use jot_core::{new_v7, Error, FolderFilter, Note, NoteRepository, Result};

/// PostgreSQL implementation of NoteRepository.
#[derive(Clone)]
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
}

impl PgNoteRepository {
    /// Create a new PgNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn note_from_row(row: &sqlx::postgres::PgRow) -> Note {
    Note {
        id: row.get("id"),
        content: row.get("content"),
        folder_id: row.get("folder_id"),
        created_at_utc: row.get("created_at_utc"),
        updated_at_utc: row.get("updated_at_utc"),
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    #[instrument(skip(self, content), fields(subsystem = "db", component = "notes", op = "insert"))]
    async fn insert(&self, content: &str) -> Result<Note> {
        let id = new_v7();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO note (id, content, folder_id, created_at_utc, updated_at_utc)
             VALUES ($1, $2, NULL, $3, $3)",
        )
        .bind(id)
        .bind(content)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(Note {
            id,
            content: content.to_string(),
            folder_id: None,
            created_at_utc: now,
            updated_at_utc: now,
        })
    }

    async fn fetch(&self, id: Uuid) -> Result<Note> {
        let row = sqlx::query(
            "SELECT id, content, folder_id, created_at_utc, updated_at_utc
             FROM note WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.map(|r| note_from_row(&r)).ok_or(Error::NoteNotFound(id))
    }

    #[instrument(skip(self), fields(subsystem = "db", component = "notes", op = "list"))]
    async fn list(&self, filter: FolderFilter) -> Result<Vec<Note>> {
        let rows = match filter {
            FolderFilter::All => {
                sqlx::query(
                    "SELECT id, content, folder_id, created_at_utc, updated_at_utc
                     FROM note ORDER BY updated_at_utc DESC",
                )
                .fetch_all(&self.pool)
                .await
            }
            FolderFilter::Unfiled => {
                sqlx::query(
                    "SELECT id, content, folder_id, created_at_utc, updated_at_utc
                     FROM note WHERE folder_id IS NULL ORDER BY updated_at_utc DESC",
                )
                .fetch_all(&self.pool)
                .await
            }
            FolderFilter::Folder(folder_id) => {
                sqlx::query(
                    "SELECT id, content, folder_id, created_at_utc, updated_at_utc
                     FROM note WHERE folder_id = $1 ORDER BY updated_at_utc DESC",
                )
                .bind(folder_id)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(Error::Database)?;

        Ok(rows.iter().map(note_from_row).collect())
    }

    async fn update_content(&self, id: Uuid, content: &str) -> Result<Note> {
        let result = sqlx::query(
            "UPDATE note SET content = $1, updated_at_utc = $2 WHERE id = $3",
        )
        .bind(content)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NoteNotFound(id));
        }
        self.fetch(id).await
    }

    #[instrument(skip(self), fields(subsystem = "db", component = "notes", op = "set_folder"))]
    async fn set_folder(&self, note_id: Uuid, folder_id: Option<Uuid>) -> Result<()> {
        // Fire-and-forget: zero affected rows is not an error.
        sqlx::query("UPDATE note SET folder_id = $1, updated_at_utc = $2 WHERE id = $3")
            .bind(folder_id)
            .bind(Utc::now())
            .bind(note_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM note WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(())
    }

    async fn restore(&self, note: &Note) -> Result<()> {
        sqlx::query(
            "INSERT INTO note (id, content, folder_id, created_at_utc, updated_at_utc)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(note.id)
        .bind(&note.content)
        .bind(note.folder_id)
        .bind(note.created_at_utc)
        .bind(note.updated_at_utc)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(())
    }
}
