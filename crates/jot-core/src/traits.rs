//! Core traits for jot abstractions.
//!
//! These traits define the interfaces that concrete implementations must
//! satisfy, enabling pluggable backends and testability. The action executor
//! takes the repositories as explicit parameters; there is no ambient store
//! handle anywhere in the workspace.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Folder, FolderFilter, Note};

// =============================================================================
// NOTE REPOSITORY
// =============================================================================

/// Repository for note CRUD operations.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert a new note with the given content, unfiled.
    async fn insert(&self, content: &str) -> Result<Note>;

    /// Fetch a note by id.
    async fn fetch(&self, id: Uuid) -> Result<Note>;

    /// List notes in a folder scope, most recently updated first.
    async fn list(&self, filter: FolderFilter) -> Result<Vec<Note>>;

    /// Replace a note's content, bumping its updated timestamp.
    async fn update_content(&self, id: Uuid, content: &str) -> Result<Note>;

    /// Reassign a note's folder (`None` = unfiled).
    ///
    /// No existence check is made on either id; moving a nonexistent note is
    /// a no-op, and the database alone enforces folder references.
    async fn set_folder(&self, note_id: Uuid, folder_id: Option<Uuid>) -> Result<()>;

    /// Permanently delete a note.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Reinsert a previously deleted note with its original id, folder, and
    /// timestamps. Undo support for the shell.
    async fn restore(&self, note: &Note) -> Result<()>;
}

// =============================================================================
// FOLDER REPOSITORY
// =============================================================================

/// Repository for folder operations.
#[async_trait]
pub trait FolderRepository: Send + Sync {
    /// Create a new folder. Empty or whitespace-only names are rejected.
    async fn create(&self, name: &str, description: Option<&str>) -> Result<Folder>;

    /// Get a folder by id.
    async fn get(&self, id: Uuid) -> Result<Option<Folder>>;

    /// List all folders, by name ascending, with note counts.
    async fn list(&self) -> Result<Vec<Folder>>;

    /// Update a folder's name and description.
    async fn update(&self, id: Uuid, name: &str, description: Option<&str>) -> Result<Folder>;
}

// =============================================================================
// INFERENCE
// =============================================================================

/// Backend for text generation (LLM).
///
/// One request, one block of text back; no structure is guaranteed. The
/// response extractor owns recovery.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text given a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate text with system context.
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}
