//! In-memory store for deterministic testing.
//!
//! Implements both repository traits over mutex-guarded vectors and records
//! every trait call in a log, so tests can assert not only on state but on
//! whether the store was touched at all.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use jot_db::MemoryStore;
//!
//! let store = MemoryStore::new();
//! let note = store.add_note("Buy milk");
//! // run code under test against &store, then:
//! assert_eq!(store.call_count("notes.list"), 1);
//! ```

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use jot_core::{
    new_v7, Error, Folder, FolderFilter, FolderRepository, Note, NoteRepository, Result,
};

#[derive(Default)]
struct Inner {
    notes: Vec<Note>,
    folders: Vec<Folder>,
}

/// In-memory implementation of the note and folder repositories.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    call_log: Mutex<Vec<String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a note directly, bypassing the call log.
    pub fn add_note(&self, content: &str) -> Note {
        let now = Utc::now();
        let note = Note {
            id: new_v7(),
            content: content.to_string(),
            folder_id: None,
            created_at_utc: now,
            updated_at_utc: now,
        };
        self.inner.lock().unwrap().notes.push(note.clone());
        note
    }

    /// Seed a note assigned to a folder, bypassing the call log.
    pub fn add_note_in_folder(&self, content: &str, folder_id: Uuid) -> Note {
        let mut note = self.add_note(content);
        note.folder_id = Some(folder_id);
        let mut inner = self.inner.lock().unwrap();
        if let Some(stored) = inner.notes.iter_mut().find(|n| n.id == note.id) {
            stored.folder_id = Some(folder_id);
        }
        note
    }

    /// Seed a folder directly, bypassing the call log.
    pub fn add_folder(&self, name: &str) -> Folder {
        let folder = Folder {
            id: new_v7(),
            name: name.to_string(),
            description: None,
            created_at_utc: Utc::now(),
            note_count: 0,
        };
        self.inner.lock().unwrap().folders.push(folder.clone());
        folder
    }

    /// All logged trait calls, in order.
    pub fn calls(&self) -> Vec<String> {
        self.call_log.lock().unwrap().clone()
    }

    /// Number of logged calls for one operation (e.g. `"notes.list"`).
    pub fn call_count(&self, op: &str) -> usize {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.as_str() == op)
            .count()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.call_log.lock().unwrap().clear()
    }

    /// Current number of stored folders.
    pub fn folder_count(&self) -> usize {
        self.inner.lock().unwrap().folders.len()
    }

    fn log_call(&self, op: &str) {
        self.call_log.lock().unwrap().push(op.to_string());
    }

    fn with_note_count(&self, folder: &Folder, inner: &Inner) -> Folder {
        let mut f = folder.clone();
        f.note_count = inner
            .notes
            .iter()
            .filter(|n| n.folder_id == Some(folder.id))
            .count() as i64;
        f
    }
}

#[async_trait]
impl NoteRepository for MemoryStore {
    async fn insert(&self, content: &str) -> Result<Note> {
        self.log_call("notes.insert");
        Ok(self.add_note(content))
    }

    async fn fetch(&self, id: Uuid) -> Result<Note> {
        self.log_call("notes.fetch");
        self.inner
            .lock()
            .unwrap()
            .notes
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or(Error::NoteNotFound(id))
    }

    async fn list(&self, filter: FolderFilter) -> Result<Vec<Note>> {
        self.log_call("notes.list");
        let inner = self.inner.lock().unwrap();
        let mut notes: Vec<Note> = inner
            .notes
            .iter()
            .filter(|n| match filter {
                FolderFilter::All => true,
                FolderFilter::Unfiled => n.folder_id.is_none(),
                FolderFilter::Folder(id) => n.folder_id == Some(id),
            })
            .cloned()
            .collect();
        // Most recently updated first; v7 ids break timestamp ties.
        notes.sort_by(|a, b| {
            (b.updated_at_utc, b.id).cmp(&(a.updated_at_utc, a.id))
        });
        Ok(notes)
    }

    async fn update_content(&self, id: Uuid, content: &str) -> Result<Note> {
        self.log_call("notes.update_content");
        let mut inner = self.inner.lock().unwrap();
        let note = inner
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(Error::NoteNotFound(id))?;
        note.content = content.to_string();
        note.updated_at_utc = Utc::now();
        Ok(note.clone())
    }

    async fn set_folder(&self, note_id: Uuid, folder_id: Option<Uuid>) -> Result<()> {
        self.log_call("notes.set_folder");
        let mut inner = self.inner.lock().unwrap();
        // Fire-and-forget: a missing note is a no-op.
        if let Some(note) = inner.notes.iter_mut().find(|n| n.id == note_id) {
            note.folder_id = folder_id;
            note.updated_at_utc = Utc::now();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.log_call("notes.delete");
        self.inner.lock().unwrap().notes.retain(|n| n.id != id);
        Ok(())
    }

    async fn restore(&self, note: &Note) -> Result<()> {
        self.log_call("notes.restore");
        self.inner.lock().unwrap().notes.push(note.clone());
        Ok(())
    }
}

#[async_trait]
impl FolderRepository for MemoryStore {
    async fn create(&self, name: &str, description: Option<&str>) -> Result<Folder> {
        self.log_call("folders.create");
        if name.trim().is_empty() {
            return Err(Error::InvalidInput("Folder name cannot be empty".to_string()));
        }
        let folder = Folder {
            id: new_v7(),
            name: name.to_string(),
            description: description.map(|s| s.to_string()),
            created_at_utc: Utc::now(),
            note_count: 0,
        };
        self.inner.lock().unwrap().folders.push(folder.clone());
        Ok(folder)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Folder>> {
        self.log_call("folders.get");
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .folders
            .iter()
            .find(|f| f.id == id)
            .map(|f| self.with_note_count(f, &inner)))
    }

    async fn list(&self) -> Result<Vec<Folder>> {
        self.log_call("folders.list");
        let inner = self.inner.lock().unwrap();
        let mut folders: Vec<Folder> = inner
            .folders
            .iter()
            .map(|f| self.with_note_count(f, &inner))
            .collect();
        folders.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(folders)
    }

    async fn update(&self, id: Uuid, name: &str, description: Option<&str>) -> Result<Folder> {
        self.log_call("folders.update");
        if name.trim().is_empty() {
            return Err(Error::InvalidInput("Folder name cannot be empty".to_string()));
        }
        let mut inner = self.inner.lock().unwrap();
        let folder = inner
            .folders
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(Error::FolderNotFound(id))?;
        folder.name = name.to_string();
        folder.description = description.map(|s| s.to_string());
        let updated = folder.clone();
        Ok(self.with_note_count(&updated, &inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_fetch() {
        let store = MemoryStore::new();
        let note = store.insert("Buy milk").await.unwrap();

        let fetched = store.fetch(note.id).await.unwrap();
        assert_eq!(fetched.content, "Buy milk");
        assert!(fetched.folder_id.is_none());
    }

    #[tokio::test]
    async fn test_fetch_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store.fetch(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::NoteNotFound(_)));
    }

    #[tokio::test]
    async fn test_list_folder_filters() {
        let store = MemoryStore::new();
        let folder = store.add_folder("Groceries");
        store.add_note("unfiled");
        store.add_note_in_folder("filed", folder.id);

        let all = NoteRepository::list(&store, FolderFilter::All).await.unwrap();
        assert_eq!(all.len(), 2);

        let unfiled = NoteRepository::list(&store, FolderFilter::Unfiled)
            .await
            .unwrap();
        assert_eq!(unfiled.len(), 1);
        assert_eq!(unfiled[0].content, "unfiled");

        let filed = NoteRepository::list(&store, FolderFilter::Folder(folder.id))
            .await
            .unwrap();
        assert_eq!(filed.len(), 1);
        assert_eq!(filed[0].content, "filed");
    }

    #[tokio::test]
    async fn test_list_orders_most_recently_updated_first() {
        let store = MemoryStore::new();
        let first = store.add_note("first");
        store.add_note("second");

        store.update_content(first.id, "first, edited").await.unwrap();

        let notes = NoteRepository::list(&store, FolderFilter::All).await.unwrap();
        assert_eq!(notes[0].content, "first, edited");
    }

    #[tokio::test]
    async fn test_set_folder_missing_note_is_noop() {
        let store = MemoryStore::new();
        store.set_folder(Uuid::new_v4(), None).await.unwrap();
        assert_eq!(store.call_count("notes.set_folder"), 1);
    }

    #[tokio::test]
    async fn test_delete_and_restore() {
        let store = MemoryStore::new();
        let note = store.insert("keep me").await.unwrap();

        store.delete(note.id).await.unwrap();
        assert!(store.fetch(note.id).await.is_err());

        store.restore(&note).await.unwrap();
        let restored = store.fetch(note.id).await.unwrap();
        assert_eq!(restored.id, note.id);
        assert_eq!(restored.created_at_utc, note.created_at_utc);
    }

    #[tokio::test]
    async fn test_folder_create_rejects_empty_name() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.create("", None).await.unwrap_err(),
            Error::InvalidInput(_)
        ));
        assert!(matches!(
            store.create("   ", None).await.unwrap_err(),
            Error::InvalidInput(_)
        ));
    }

    #[tokio::test]
    async fn test_folder_list_sorted_with_counts() {
        let store = MemoryStore::new();
        let work = store.add_folder("Work");
        store.add_folder("Archive");
        store.add_note_in_folder("meeting notes", work.id);

        let folders = FolderRepository::list(&store).await.unwrap();
        assert_eq!(folders[0].name, "Archive");
        assert_eq!(folders[1].name, "Work");
        assert_eq!(folders[1].note_count, 1);
    }

    #[tokio::test]
    async fn test_folder_update_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store.update(Uuid::new_v4(), "Renamed", None).await.unwrap_err();
        assert!(matches!(err, Error::FolderNotFound(_)));
    }

    #[tokio::test]
    async fn test_call_log_records_operations() {
        let store = MemoryStore::new();
        store.insert("a").await.unwrap();
        NoteRepository::list(&store, FolderFilter::All).await.unwrap();
        NoteRepository::list(&store, FolderFilter::All).await.unwrap();

        assert_eq!(store.call_count("notes.insert"), 1);
        assert_eq!(store.call_count("notes.list"), 2);
        assert_eq!(store.calls().len(), 3);

        store.clear_calls();
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_seeding_does_not_log() {
        let store = MemoryStore::new();
        store.add_note("seeded");
        store.add_folder("Seeded");
        assert!(store.calls().is_empty());
    }
}
