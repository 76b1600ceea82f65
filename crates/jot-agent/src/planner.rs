//! Instruction planning: prompt assembly, backend call, degraded fallback.
//!
//! Planning is the only stage allowed to fail a request, and only for
//! backend connectivity or configuration errors. A response that comes back
//! but cannot be parsed is absorbed: the instruction degrades to a single
//! search so the pipeline always yields something executable.

use serde_json::json;
use tracing::{debug, instrument, warn};

use jot_core::{defaults, Action, ActionKind, Error, GenerationBackend, Note, Result};

use crate::extractor::extract_actions;

/// System prompt sent with every planning request.
pub const SYSTEM_PROMPT: &str = r#"You are an action-planning assistant for a personal note app.
Given the user's instruction and their notes, respond with ONLY a valid JSON array of action objects.

Available action types:
  {"type":"search",               "payload":{"query":"<search term>"}}
  {"type":"create_note",          "payload":{"content":"<note text>"}}
  {"type":"create_folder",        "payload":{"name":"<folder name>"}}
  {"type":"move_note_to_folder",  "payload":{"noteId":"<id>","folderId":"<id>"}}
  {"type":"organize_into_folders","payload":[{"folderName":"<name>","noteIds":["<id>",...]}]}

Rules:
- Return ONLY the JSON array - no prose, no markdown fences, no explanation.
- Use only the note IDs provided in the context.
- For organize_into_folders you may invent new folder names when appropriate.
- If the request is purely informational with no actions to take, return [{"type":"search","payload":{"query":"<rephrased query>"}}]."#;

/// Build the user message: the instruction plus a context block of note
/// excerpts. Image-blob notes appear as placeholders so the model knows they
/// exist without receiving the blob.
pub fn build_user_message(instruction: &str, notes: &[Note]) -> String {
    if notes.is_empty() {
        return instruction.to_string();
    }

    let blocks: Vec<String> = notes
        .iter()
        .map(|n| {
            if n.is_image_blob() {
                format!("[Note {}]\n(image note)", n.id)
            } else {
                let excerpt: String = n
                    .content
                    .chars()
                    .take(defaults::CONTEXT_EXCERPT_LENGTH)
                    .collect();
                format!("[Note {}]\n{}", n.id, excerpt)
            }
        })
        .collect();

    format!(
        "{}\n\n===\nNotes:\n\n{}",
        instruction,
        blocks.join("\n\n---\n\n")
    )
}

/// The degraded plan when nothing recoverable comes back from the backend:
/// one search built from a truncated, quote-stripped prefix of the
/// instruction.
pub fn fallback_search_action(instruction: &str) -> Action {
    let truncated: String = instruction
        .chars()
        .take(defaults::FALLBACK_QUERY_LENGTH)
        .collect();
    let query = truncated.replace('"', "");
    let query = query.trim();
    let query = if query.is_empty() {
        defaults::FALLBACK_QUERY_DEFAULT
    } else {
        query
    };

    Action::new(ActionKind::Search, json!({"query": query}))
}

/// Plan actions for a user instruction.
///
/// Backend errors (unreachable, authentication) propagate; no partial plan
/// is produced for them. Extraction failure never propagates; it degrades to
/// the fallback search.
#[instrument(skip_all, fields(subsystem = "agent", component = "planner", op = "plan", model = backend.model_name(), context_notes = notes.len()))]
pub async fn plan_actions(
    backend: &dyn GenerationBackend,
    instruction: &str,
    notes: &[Note],
) -> Result<Vec<Action>> {
    let user_message = build_user_message(instruction, notes);
    let raw = backend
        .generate_with_system(SYSTEM_PROMPT, &user_message)
        .await?;

    match extract_actions(&raw) {
        Ok(actions) => {
            debug!(action_count = actions.len(), "Planned action batch");
            Ok(actions)
        }
        Err(Error::MalformedResponse(reason)) => {
            warn!(
                error = %reason,
                response_len = raw.len(),
                "Backend response unrecoverable, degrading to search"
            );
            Ok(vec![fallback_search_action(instruction)])
        }
        Err(other) => Err(other),
    }
}
