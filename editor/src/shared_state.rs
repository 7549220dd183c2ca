//! Shared state for multi-window editor synchronization
//!
//! Panels move between windows, so anything two panels need to agree on
//! (the stage, the selection, the playhead) lives here behind one handle
//! that every panel's draw callback captures.

use crate::panels::timeline::TimelineState;
use crate::stage::Stage;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Shared editor state that needs to be synchronized between windows
#[derive(Debug, Default)]
pub struct SharedEditorState {
    pub stage: Stage,
    /// Path of the selected prim
    pub selected_prim: Option<String>,
    pub timeline: TimelineState,
    /// Whether the stage has been modified since it was opened
    pub stage_modified: bool,
}

impl SharedEditorState {
    /// Create a new shared editor state
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stage(stage: Stage) -> Self {
        Self {
            stage,
            ..Default::default()
        }
    }

    /// Set the selected prim, ignoring paths that are not on the stage
    pub fn select(&mut self, path: Option<String>) {
        let path = path.filter(|p| self.stage.get(p).is_some());
        if self.selected_prim != path {
            debug!("Selected prim changed: {:?} -> {:?}", self.selected_prim, path);
            self.selected_prim = path;
        }
    }

    /// Mark the stage as modified
    pub fn mark_stage_modified(&mut self) {
        if !self.stage_modified {
            debug!("Stage marked as modified");
            self.stage_modified = true;
        }
    }
}

/// Thread-safe wrapper for shared editor state
pub type SharedEditorStateHandle = Arc<Mutex<SharedEditorState>>;

/// Create a new shared editor state handle
pub fn create_shared_state(stage: Stage) -> SharedEditorStateHandle {
    Arc::new(Mutex::new(SharedEditorState::with_stage(stage)))
}

/// Run `f` with the shared state locked, logging lock failures
pub fn with_state<R>(shared_state: &SharedEditorStateHandle, f: impl FnOnce(&mut SharedEditorState) -> R) -> Option<R> {
    match shared_state.lock() {
        Ok(mut state) => Some(f(&mut state)),
        Err(e) => {
            warn!("Failed to lock shared editor state: {}", e);
            None
        }
    }
}

/// Safely get the selected prim path
pub fn get_selected_prim(shared_state: &SharedEditorStateHandle) -> Option<String> {
    with_state(shared_state, |state| state.selected_prim.clone()).flatten()
}

/// Safely update the selection across all windows
pub fn update_selected_prim(shared_state: &SharedEditorStateHandle, path: Option<String>) {
    with_state(shared_state, |state| state.select(path));
}
