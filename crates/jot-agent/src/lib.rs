//! # jot-agent
//!
//! Instruction planning and action execution pipeline for jot.
//!
//! This crate bridges an unreliable natural-language backend and the
//! deterministic note store:
//!
//! - [`extractor`] recovers a JSON action array from arbitrary backend text
//!   (conversational prefixes, code fences, trailing commas)
//! - [`executor`] validates, dispatches, and applies each action against the
//!   store, isolating per-action failures into a consolidated report
//! - [`planner`] assembles the prompt, calls the backend, and degrades to a
//!   synthetic search when nothing recoverable comes back
//! - [`Agent`] wires the three together over a database and a backend

pub mod agent;
pub mod executor;
pub mod extractor;
pub mod planner;

// Re-export core types
pub use jot_core::*;

pub use agent::Agent;
pub use executor::execute_actions;
pub use extractor::extract_actions;
pub use planner::{build_user_message, fallback_search_action, plan_actions, SYSTEM_PROMPT};
