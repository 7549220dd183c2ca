//! Error types for the fallible parts of the docking engine
//!
//! Tree mutations report failure through their `bool` return value; the
//! errors here cover persistence, scheduling and window bookkeeping.

use std::fmt::Debug;

/// Errors raised outside of the tree mutation API
#[derive(Debug, thiserror::Error)]
pub enum DockError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Layout serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Dock tree invariant violated: {0}")]
    InvalidTree(String),

    #[error("Window {0} already ran its pass this frame")]
    PassAlreadyRun(String),

    #[error("Window {0} cannot start a pass while {1} is still drawing")]
    PassInProgress(String, String),

    #[error("Maximum window limit reached: {0}")]
    WindowLimit(usize),

    #[error("Unknown window: {0}")]
    UnknownWindow(String),

    #[error("Window {0} already exists")]
    DuplicateWindow(String),

    #[error("The main window cannot be closed")]
    CloseMainWindow,

    #[error("Panel {0} is not registered in window {1}")]
    UnknownPanel(String, String),
}

impl DockError {
    /// Build an `UnknownWindow` error from any debuggable window key
    pub fn unknown_window<K: Debug>(key: &K) -> Self {
        Self::UnknownWindow(format!("{key:?}"))
    }
}
