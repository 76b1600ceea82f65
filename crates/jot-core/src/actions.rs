//! Agent action schema and execution report types.
//!
//! An [`Action`] is one typed unit of work derived from a backend response:
//! a `{"type": ..., "payload": ...}` object. The kind set is closed, but an
//! unknown type is a representable value ([`ActionKind::Unrecognized`]), not
//! a deserialization failure; the executor turns it into a per-action error
//! entry. Payloads stay opaque JSON here; only the executor interprets them
//! per kind.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use uuid::Uuid;

// =============================================================================
// ACTION KINDS
// =============================================================================

/// The closed set of action kinds, plus a fallthrough for anything else the
/// backend invents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Search,
    CreateNote,
    CreateFolder,
    MoveNoteToFolder,
    OrganizeIntoFolders,
    /// Any type string outside the closed set, carried verbatim.
    #[serde(untagged)]
    Unrecognized(String),
}

impl ActionKind {
    /// Map a raw type string onto the kind set.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "search" => Self::Search,
            "create_note" => Self::CreateNote,
            "create_folder" => Self::CreateFolder,
            "move_note_to_folder" => Self::MoveNoteToFolder,
            "organize_into_folders" => Self::OrganizeIntoFolders,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// The wire name of this kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Search => "search",
            Self::CreateNote => "create_note",
            Self::CreateFolder => "create_folder",
            Self::MoveNoteToFolder => "move_note_to_folder",
            Self::OrganizeIntoFolders => "organize_into_folders",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Returns true for kinds in the closed set.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ACTIONS
// =============================================================================

/// One typed, to-be-validated unit of work from a backend response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub payload: JsonValue,
}

impl Action {
    /// Build an action with a typed kind and raw payload.
    pub fn new(kind: ActionKind, payload: JsonValue) -> Self {
        Self { kind, payload }
    }

    /// Convert an arbitrary JSON value into an action.
    ///
    /// Total: a missing or non-string `type` (or a non-object element)
    /// becomes [`ActionKind::Unrecognized`] carrying the JSON rendering of
    /// whatever was there, so it surfaces through the executor's
    /// unknown-type error path instead of failing the whole batch.
    pub fn from_value(value: JsonValue) -> Self {
        match value {
            JsonValue::Object(mut map) => {
                let kind = match map.remove("type") {
                    Some(JsonValue::String(s)) => ActionKind::from_raw(&s),
                    Some(other) => ActionKind::Unrecognized(other.to_string()),
                    None => ActionKind::Unrecognized("null".to_string()),
                };
                let payload = map.remove("payload").unwrap_or(JsonValue::Null);
                Self { kind, payload }
            }
            other => Self {
                kind: ActionKind::Unrecognized(other.to_string()),
                payload: JsonValue::Null,
            },
        }
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = JsonValue::deserialize(deserializer)?;
        Ok(Self::from_value(value))
    }
}

// =============================================================================
// PAYLOAD SHAPES
// =============================================================================
//
// Typed views onto the opaque payload, decoded by the executor at dispatch
// time. Wire keys are camelCase, the contract the backend is prompted with.

/// Payload for `search`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPayload {
    #[serde(default)]
    pub query: String,
}

/// Payload for `create_note`. Content defaults to empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotePayload {
    #[serde(default)]
    pub content: String,
}

/// Payload for `create_folder`. A missing name is a decode error; an empty
/// name is the store's concern.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderPayload {
    pub name: String,
}

/// Payload for `move_note_to_folder`. A missing `folderId` means unfiled.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveNotePayload {
    pub note_id: Uuid,
    #[serde(default)]
    pub folder_id: Option<Uuid>,
}

/// One group of an `organize_into_folders` payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizeGroup {
    pub folder_name: String,
    #[serde(default)]
    pub note_ids: Vec<Uuid>,
}

// =============================================================================
// EXECUTION REPORT
// =============================================================================

/// Successful outcome of one action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionSuccess {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub result: JsonValue,
}

/// Failed outcome of one action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionFailure {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub error: String,
}

/// Consolidated result of executing one action batch.
///
/// Each input action contributes to exactly one of `results`/`errors`, in
/// input order. `success` holds iff `errors` is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub success: bool,
    pub results: Vec<ActionSuccess>,
    pub errors: Vec<ActionFailure>,
}

impl ExecutionReport {
    /// Build a report, deriving `success` from the error list.
    pub fn new(results: Vec<ActionSuccess>, errors: Vec<ActionFailure>) -> Self {
        Self {
            success: errors.is_empty(),
            results,
            errors,
        }
    }

    /// Report for an empty batch.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}
