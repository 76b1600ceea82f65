//! # jot-core
//!
//! Core types, traits, and abstractions for jot.
//!
//! This crate provides:
//! - Domain models (notes, folders)
//! - The action schema: the closed set of agent action kinds, their payload
//!   shapes, and the execution report
//! - Repository and generation-backend traits for pluggable implementations
//! - The shared error type
//! - UUIDv7 id helpers and default constants

pub mod actions;
pub mod defaults;
pub mod error;
pub mod models;
pub mod traits;
pub mod uuid_utils;

pub use actions::{
    Action, ActionFailure, ActionKind, ActionSuccess, CreateFolderPayload, CreateNotePayload,
    ExecutionReport, MoveNotePayload, OrganizeGroup, SearchPayload,
};
pub use error::{Error, Result};
pub use models::{Folder, FolderFilter, Note};
pub use traits::{FolderRepository, GenerationBackend, NoteRepository};
pub use uuid_utils::{is_v7, new_v7};
