//! Core data models for jot.
//!
//! These types are shared across all jot crates and represent the domain
//! entities of the note store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::defaults::IMAGE_DATA_PREFIX;

// =============================================================================
// NOTE TYPES
// =============================================================================

/// A note in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    /// Raw text content. May hold an embedded image as a self-describing
    /// `data:image/...` blob; such notes stay addressable by id but are
    /// excluded from text search and backend context bodies.
    pub content: String,
    /// Folder assignment; `None` = unfiled.
    pub folder_id: Option<Uuid>,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
}

impl Note {
    /// Returns true if the content is an embedded image blob.
    pub fn is_image_blob(&self) -> bool {
        is_image_content(&self.content)
    }
}

/// Returns true if raw content encodes an embedded image blob.
pub fn is_image_content(content: &str) -> bool {
    content.starts_with(IMAGE_DATA_PREFIX)
}

/// Folder scope for note listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FolderFilter {
    /// All notes regardless of folder.
    #[default]
    All,
    /// Notes with no folder assignment.
    Unfiled,
    /// Notes in a specific folder.
    Folder(Uuid),
}

// =============================================================================
// FOLDER TYPES
// =============================================================================

/// A folder grouping notes.
///
/// Names are not required to be unique at storage level; case-insensitive
/// reconciliation happens only during batch organize operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at_utc: DateTime<Utc>,
    /// Number of notes in this folder (computed)
    #[serde(default)]
    pub note_count: i64,
}
