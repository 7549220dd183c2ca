//! Frame scheduling: every window runs exactly one dock pass per frame

use crate::error::DockError;
use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::{trace, warn};

/// Tracks which windows already drew during the current frame
#[derive(Debug)]
pub struct FrameSchedule<K> {
    frame: u64,
    completed: HashSet<K>,
    current: Option<K>,
}

impl<K> Default for FrameSchedule<K> {
    fn default() -> Self {
        Self {
            frame: 0,
            completed: HashSet::new(),
            current: None,
        }
    }
}

impl<K: Clone + Eq + Hash + Debug> FrameSchedule<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame, forgetting which windows ran
    pub fn begin_frame(&mut self) -> u64 {
        if let Some(current) = self.current.take() {
            warn!(window = ?current, frame = self.frame, "Frame ended with a pass still open");
        }
        self.completed.clear();
        self.frame += 1;
        trace!(frame = self.frame, "Began frame");
        self.frame
    }

    /// Open the pass for `key`
    pub fn enter(&mut self, key: &K) -> Result<(), DockError> {
        if let Some(current) = &self.current {
            return Err(DockError::PassInProgress(format!("{key:?}"), format!("{current:?}")));
        }
        if self.completed.contains(key) {
            return Err(DockError::PassAlreadyRun(format!("{key:?}")));
        }
        self.current = Some(key.clone());
        Ok(())
    }

    /// Close the pass opened by `enter`
    pub fn leave(&mut self, key: &K) {
        if self.current.as_ref() == Some(key) {
            self.current = None;
        }
        self.completed.insert(key.clone());
    }

    pub fn has_run(&self, key: &K) -> bool {
        self.completed.contains(key)
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_pass_per_window() {
        let mut schedule = FrameSchedule::new();
        schedule.begin_frame();

        schedule.enter(&"main").unwrap();
        schedule.leave(&"main");
        assert!(schedule.has_run(&"main"));
        assert!(matches!(schedule.enter(&"main"), Err(DockError::PassAlreadyRun(_))));

        schedule.enter(&"detached").unwrap();
        schedule.leave(&"detached");

        assert_eq!(schedule.begin_frame(), 2);
        assert!(!schedule.has_run(&"main"));
        schedule.enter(&"main").unwrap();
    }

    #[test]
    fn test_no_nested_passes() {
        let mut schedule = FrameSchedule::new();
        schedule.begin_frame();
        schedule.enter(&1u32).unwrap();
        assert!(matches!(schedule.enter(&2u32), Err(DockError::PassInProgress(_, _))));
        schedule.leave(&1u32);
        schedule.enter(&2u32).unwrap();
    }
}
