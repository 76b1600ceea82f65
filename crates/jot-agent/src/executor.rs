//! Action execution: validate, dispatch, and apply actions to the store.
//!
//! One call = one batch. Processing is strictly sequential in input order,
//! because later actions may depend on the side effects of earlier ones.
//! Failures are isolated per action: nothing aborts the batch, nothing rolls
//! back, and the caller always gets a full report.

use serde_json::{json, Value as JsonValue};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use jot_core::{
    Action, ActionFailure, ActionKind, ActionSuccess, CreateFolderPayload, CreateNotePayload,
    ExecutionReport, Folder, FolderFilter, FolderRepository, MoveNotePayload, NoteRepository,
    OrganizeGroup, Result, SearchPayload,
};

/// Execute a batch of actions against the given repositories.
///
/// Never fails: per-action errors (unknown kinds, payload decode failures,
/// store errors) are captured in the report and execution continues. An
/// empty batch returns a successful empty report without touching the store.
#[instrument(skip_all, fields(subsystem = "agent", component = "executor", op = "execute", action_count = actions.len()))]
pub async fn execute_actions(
    actions: &[Action],
    notes: &dyn NoteRepository,
    folders: &dyn FolderRepository,
) -> ExecutionReport {
    if actions.is_empty() {
        return ExecutionReport::empty();
    }

    let mut results = Vec::new();
    let mut errors = Vec::new();

    for action in actions {
        let outcome: Result<JsonValue> = match &action.kind {
            ActionKind::Search => search(&action.payload, notes).await,
            ActionKind::CreateNote => create_note(&action.payload, notes).await,
            ActionKind::CreateFolder => create_folder(&action.payload, folders).await,
            ActionKind::MoveNoteToFolder => move_note(&action.payload, notes).await,
            ActionKind::OrganizeIntoFolders => organize(&action.payload, notes, folders).await,
            ActionKind::Unrecognized(raw) => {
                debug!(action_type = %raw, "Skipping unknown action type");
                errors.push(ActionFailure {
                    kind: action.kind.clone(),
                    error: format!("Unknown action type: {}", raw),
                });
                continue;
            }
        };

        match outcome {
            Ok(result) => results.push(ActionSuccess {
                kind: action.kind.clone(),
                result,
            }),
            Err(e) => errors.push(ActionFailure {
                kind: action.kind.clone(),
                error: e.to_string(),
            }),
        }
    }

    info!(
        result_count = results.len(),
        error_count = errors.len(),
        "Batch execution complete"
    );
    ExecutionReport::new(results, errors)
}

/// Case-insensitive substring search over note contents.
///
/// Image-blob notes are skipped; no tokenization, no ranking.
async fn search(payload: &JsonValue, notes: &dyn NoteRepository) -> Result<JsonValue> {
    let payload: SearchPayload = serde_json::from_value(payload.clone())?;
    let needle = payload.query.to_lowercase();

    let all = notes.list(FolderFilter::All).await?;
    let note_ids: Vec<Uuid> = all
        .iter()
        .filter(|n| !n.is_image_blob() && n.content.to_lowercase().contains(&needle))
        .map(|n| n.id)
        .collect();

    Ok(json!({"noteIds": note_ids, "count": note_ids.len()}))
}

async fn create_note(payload: &JsonValue, notes: &dyn NoteRepository) -> Result<JsonValue> {
    let payload: CreateNotePayload = serde_json::from_value(payload.clone())?;
    let note = notes.insert(&payload.content).await?;
    Ok(serde_json::to_value(note)?)
}

async fn create_folder(payload: &JsonValue, folders: &dyn FolderRepository) -> Result<JsonValue> {
    let payload: CreateFolderPayload = serde_json::from_value(payload.clone())?;
    let folder = folders.create(&payload.name, None).await?;
    Ok(serde_json::to_value(folder)?)
}

/// Reassign a note's folder. Fire-and-forget: neither id is checked for
/// existence beyond what the database itself enforces.
async fn move_note(payload: &JsonValue, notes: &dyn NoteRepository) -> Result<JsonValue> {
    let payload: MoveNotePayload = serde_json::from_value(payload.clone())?;
    notes.set_folder(payload.note_id, payload.folder_id).await?;
    Ok(json!({"noteId": payload.note_id, "folderId": payload.folder_id}))
}

/// Batch-file notes into named folders, reusing existing folders by
/// case-insensitive (trimmed) name.
///
/// The folder list is fetched once per action; folders created for earlier
/// groups are appended to that local snapshot so later groups in the same
/// action reuse them. Groups in *different* actions (or batches) get a fresh
/// snapshot.
async fn organize(
    payload: &JsonValue,
    notes: &dyn NoteRepository,
    folders: &dyn FolderRepository,
) -> Result<JsonValue> {
    // A non-array payload means zero groups, not an error.
    let groups: Vec<OrganizeGroup> = match payload {
        JsonValue::Array(_) => serde_json::from_value(payload.clone())?,
        _ => Vec::new(),
    };
    if groups.is_empty() {
        return Ok(json!([]));
    }

    let mut snapshot: Vec<Folder> = folders.list().await?;
    let mut organized = Vec::with_capacity(groups.len());

    for group in groups {
        let key = group.folder_name.trim().to_lowercase();
        let folder = match snapshot
            .iter()
            .find(|f| f.name.trim().to_lowercase() == key)
        {
            Some(existing) => existing.clone(),
            None => {
                let created = folders.create(&group.folder_name, None).await?;
                snapshot.push(created.clone());
                created
            }
        };

        for note_id in &group.note_ids {
            notes.set_folder(*note_id, Some(folder.id)).await?;
        }

        organized.push(json!({"folder": folder, "movedNoteIds": group.note_ids}));
    }

    Ok(JsonValue::Array(organized))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jot_db::MemoryStore;
    use serde_json::json;

    fn action(kind: ActionKind, payload: JsonValue) -> Action {
        Action::new(kind, payload)
    }

    #[tokio::test]
    async fn test_empty_batch_touches_nothing() {
        let store = MemoryStore::new();
        let report = execute_actions(&[], &store, &store).await;

        assert!(report.success);
        assert!(report.results.is_empty());
        assert!(report.errors.is_empty());
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_type_is_isolated() {
        let store = MemoryStore::new();
        let actions = vec![
            action(ActionKind::Unrecognized("teleport".to_string()), json!({})),
            action(ActionKind::CreateNote, json!({"content": "still created"})),
        ];

        let report = execute_actions(&actions, &store, &store).await;

        assert!(!report.success);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].error, "Unknown action type: teleport");
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].kind, ActionKind::CreateNote);
        assert_eq!(store.call_count("notes.insert"), 1);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let store = MemoryStore::new();
        let milk = store.add_note("Buy milk");
        store.add_note("Call mom");

        let actions = vec![action(ActionKind::Search, json!({"query": "MILK"}))];
        let report = execute_actions(&actions, &store, &store).await;

        assert!(report.success);
        let result = &report.results[0].result;
        assert_eq!(result["count"], 1);
        assert_eq!(result["noteIds"][0], json!(milk.id));
    }

    #[tokio::test]
    async fn test_search_skips_image_notes() {
        let store = MemoryStore::new();
        store.add_note("data:image/png;base64,bWlsaw==");
        let text = store.add_note("milk run on Saturday");

        let actions = vec![action(ActionKind::Search, json!({"query": "milk"}))];
        let report = execute_actions(&actions, &store, &store).await;

        let result = &report.results[0].result;
        assert_eq!(result["count"], 1);
        assert_eq!(result["noteIds"][0], json!(text.id));
    }

    #[tokio::test]
    async fn test_search_never_mutates() {
        let store = MemoryStore::new();
        store.add_note("anything");

        let actions = vec![action(ActionKind::Search, json!({"query": ""}))];
        execute_actions(&actions, &store, &store).await;

        let mutating: Vec<String> = store
            .calls()
            .into_iter()
            .filter(|c| c != "notes.list")
            .collect();
        assert!(mutating.is_empty(), "unexpected calls: {:?}", mutating);
    }

    #[tokio::test]
    async fn test_create_note_defaults_to_empty_content() {
        let store = MemoryStore::new();
        let actions = vec![action(ActionKind::CreateNote, json!({}))];

        let report = execute_actions(&actions, &store, &store).await;

        assert!(report.success);
        assert_eq!(report.results[0].result["content"], "");
    }

    #[tokio::test]
    async fn test_create_folder_missing_name_is_action_error() {
        let store = MemoryStore::new();
        let actions = vec![action(ActionKind::CreateFolder, json!({}))];

        let report = execute_actions(&actions, &store, &store).await;

        assert!(!report.success);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(store.folder_count(), 0);
    }

    #[tokio::test]
    async fn test_move_note_without_folder_unfiles() {
        let store = MemoryStore::new();
        let folder = store.add_folder("Inbox");
        let note = store.add_note_in_folder("filed", folder.id);

        let actions = vec![action(
            ActionKind::MoveNoteToFolder,
            json!({"noteId": note.id}),
        )];
        let report = execute_actions(&actions, &store, &store).await;

        assert!(report.success);
        assert_eq!(report.results[0].result["folderId"], JsonValue::Null);
        let fetched = store.fetch(note.id).await.unwrap();
        assert!(fetched.folder_id.is_none());
    }

    #[tokio::test]
    async fn test_move_nonexistent_note_still_succeeds() {
        // The store does not validate foreign keys on reassignment, so the
        // echo result comes back regardless of the note existing.
        let store = MemoryStore::new();
        let ghost = uuid::Uuid::new_v4();

        let actions = vec![action(
            ActionKind::MoveNoteToFolder,
            json!({"noteId": ghost, "folderId": null}),
        )];
        let report = execute_actions(&actions, &store, &store).await;

        assert!(report.success);
        assert_eq!(report.results[0].result["noteId"], json!(ghost));
    }

    #[tokio::test]
    async fn test_organize_two_groups_same_name_different_case() {
        let store = MemoryStore::new();
        let a = store.add_note("standup notes");
        let b = store.add_note("quarterly review");

        let actions = vec![action(
            ActionKind::OrganizeIntoFolders,
            json!([
                {"folderName": "Work", "noteIds": [a.id]},
                {"folderName": "work", "noteIds": [b.id]}
            ]),
        )];
        let report = execute_actions(&actions, &store, &store).await;

        assert!(report.success);
        // One folder created, both notes inside it.
        assert_eq!(store.folder_count(), 1);
        assert_eq!(store.call_count("folders.create"), 1);

        let folder_id = store.fetch(a.id).await.unwrap().folder_id.unwrap();
        assert_eq!(store.fetch(b.id).await.unwrap().folder_id, Some(folder_id));

        let groups = report.results[0].result.as_array().unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0]["folder"]["id"], groups[1]["folder"]["id"]);
    }

    #[tokio::test]
    async fn test_organize_reuses_existing_folder() {
        let store = MemoryStore::new();
        let existing = store.add_folder("Groceries");
        let note = store.add_note("buy milk");

        let actions = vec![action(
            ActionKind::OrganizeIntoFolders,
            json!([{"folderName": "groceries", "noteIds": [note.id]}]),
        )];
        let report = execute_actions(&actions, &store, &store).await;

        assert!(report.success);
        assert_eq!(store.call_count("folders.create"), 0);
        assert_eq!(
            store.fetch(note.id).await.unwrap().folder_id,
            Some(existing.id)
        );
    }

    #[tokio::test]
    async fn test_organize_matches_trimmed_names() {
        let store = MemoryStore::new();
        let existing = store.add_folder("Groceries");
        let note = store.add_note("buy eggs");

        let actions = vec![action(
            ActionKind::OrganizeIntoFolders,
            json!([{"folderName": "  Groceries  ", "noteIds": [note.id]}]),
        )];
        execute_actions(&actions, &store, &store).await;

        assert_eq!(store.call_count("folders.create"), 0);
        assert_eq!(
            store.fetch(note.id).await.unwrap().folder_id,
            Some(existing.id)
        );
    }

    #[tokio::test]
    async fn test_organize_moves_notes_out_of_their_current_folder() {
        let store = MemoryStore::new();
        let old = store.add_folder("Old");
        let note = store.add_note_in_folder("migrating", old.id);

        let actions = vec![action(
            ActionKind::OrganizeIntoFolders,
            json!([{"folderName": "New", "noteIds": [note.id]}]),
        )];
        execute_actions(&actions, &store, &store).await;

        let moved = store.fetch(note.id).await.unwrap();
        assert_ne!(moved.folder_id, Some(old.id));
    }

    #[tokio::test]
    async fn test_organize_non_array_payload_yields_empty_result() {
        let store = MemoryStore::new();
        let actions = vec![action(
            ActionKind::OrganizeIntoFolders,
            json!({"folderName": "Oops"}),
        )];
        let report = execute_actions(&actions, &store, &store).await;

        assert!(report.success);
        assert_eq!(report.results[0].result, json!([]));
        // Zero groups means the folder snapshot is never fetched.
        assert_eq!(store.call_count("folders.list"), 0);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_later_actions() {
        let store = MemoryStore::new();
        let actions = vec![
            action(ActionKind::CreateFolder, json!({"name": "   "})),
            action(ActionKind::CreateNote, json!({"content": "after the error"})),
        ];

        let report = execute_actions(&actions, &store, &store).await;

        assert!(!report.success);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].error.contains("Folder name cannot be empty"));
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].result["content"], "after the error");
    }

    #[tokio::test]
    async fn test_report_order_follows_input_order() {
        let store = MemoryStore::new();
        let actions = vec![
            action(ActionKind::CreateNote, json!({"content": "first"})),
            action(ActionKind::Unrecognized("bogus".to_string()), json!(null)),
            action(ActionKind::CreateNote, json!({"content": "second"})),
            action(ActionKind::Unrecognized("worse".to_string()), json!(null)),
        ];

        let report = execute_actions(&actions, &store, &store).await;

        assert_eq!(report.results[0].result["content"], "first");
        assert_eq!(report.results[1].result["content"], "second");
        assert_eq!(report.errors[0].error, "Unknown action type: bogus");
        assert_eq!(report.errors[1].error, "Unknown action type: worse");
    }

    #[tokio::test]
    async fn test_move_then_reference_folder_created_earlier_in_batch() {
        // Later actions can depend on earlier side effects within one batch.
        let store = MemoryStore::new();
        let note = store.add_note("to be filed");

        let create = vec![action(ActionKind::CreateFolder, json!({"name": "Receipts"}))];
        let report = execute_actions(&create, &store, &store).await;
        let folder_id: uuid::Uuid =
            serde_json::from_value(report.results[0].result["id"].clone()).unwrap();

        let mv = vec![action(
            ActionKind::MoveNoteToFolder,
            json!({"noteId": note.id, "folderId": folder_id}),
        )];
        let report = execute_actions(&mv, &store, &store).await;

        assert!(report.success);
        assert_eq!(store.fetch(note.id).await.unwrap().folder_id, Some(folder_id));
    }
}
