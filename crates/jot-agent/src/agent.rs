//! The agent facade: one instruction in, one execution report out.

use std::sync::Arc;

use tracing::instrument;

use jot_core::{
    Action, ExecutionReport, FolderFilter, FolderRepository, GenerationBackend, NoteRepository,
    Result,
};
use jot_db::Database;

use crate::executor::execute_actions;
use crate::planner::plan_actions;

/// Wires the planner and executor over a store and a generation backend.
///
/// The repositories are held as trait objects, so tests can drive the full
/// pipeline against an in-memory store.
pub struct Agent {
    notes: Arc<dyn NoteRepository>,
    folders: Arc<dyn FolderRepository>,
    backend: Box<dyn GenerationBackend>,
}

impl Agent {
    /// Build an agent over a connected database.
    pub fn new(db: &Database, backend: Box<dyn GenerationBackend>) -> Self {
        Self {
            notes: Arc::new(db.notes.clone()),
            folders: Arc::new(db.folders.clone()),
            backend,
        }
    }

    /// Build an agent over explicit repository implementations.
    pub fn with_repositories(
        notes: Arc<dyn NoteRepository>,
        folders: Arc<dyn FolderRepository>,
        backend: Box<dyn GenerationBackend>,
    ) -> Self {
        Self {
            notes,
            folders,
            backend,
        }
    }

    /// Plan actions for an instruction, using every stored note as context.
    pub async fn plan(&self, instruction: &str) -> Result<Vec<Action>> {
        let notes = self.notes.list(FolderFilter::All).await?;
        plan_actions(self.backend.as_ref(), instruction, &notes).await
    }

    /// Execute a previously planned batch.
    pub async fn run(&self, actions: &[Action]) -> ExecutionReport {
        execute_actions(actions, self.notes.as_ref(), self.folders.as_ref()).await
    }

    /// Plan and execute in one step.
    ///
    /// Fails only when the backend itself is unreachable or misconfigured;
    /// every other failure mode lands inside the report.
    #[instrument(skip_all, fields(subsystem = "agent", component = "agent", op = "handle"))]
    pub async fn handle(&self, instruction: &str) -> Result<ExecutionReport> {
        let actions = self.plan(instruction).await?;
        Ok(self.run(&actions).await)
    }
}
