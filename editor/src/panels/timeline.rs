//! Timeline panel
//!
//! Playback controls and a scrubber over the stage's frame range.

use crate::shared_state::{with_state, SharedEditorStateHandle};
use dockspace::Rect;
use imgui::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Playhead and frame range shared by every window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineState {
    pub start: f32,
    pub end: f32,
    pub current: f32,
    pub fps: f32,
    pub playing: bool,
    pub looping: bool,
}

impl Default for TimelineState {
    fn default() -> Self {
        Self {
            start: 1.0,
            end: 120.0,
            current: 1.0,
            fps: 24.0,
            playing: false,
            looping: true,
        }
    }
}

impl TimelineState {
    /// Advance the playhead by `dt` seconds of wall time
    pub fn advance(&mut self, dt: f32) {
        if !self.playing || dt <= 0.0 {
            return;
        }
        let next = self.current + dt * self.fps;
        if next <= self.end {
            self.current = next;
            return;
        }
        let length = self.end - self.start;
        if self.looping && length > 0.0 {
            self.current = self.start + (next - self.start) % length;
        } else {
            self.current = self.end;
            self.playing = false;
            debug!("Timeline reached end frame {}", self.end);
        }
    }

    /// Move the playhead, clamped to the frame range
    pub fn set_frame(&mut self, frame: f32) {
        self.current = frame.clamp(self.start, self.end.max(self.start));
    }

    /// Step by whole frames
    pub fn step(&mut self, frames: i32) {
        self.set_frame(self.current.floor() + frames as f32);
    }

    pub fn frame_index(&self) -> i32 {
        self.current.floor() as i32
    }

    pub fn toggle_playback(&mut self) {
        self.playing = !self.playing;
        debug!("Timeline playing: {}", self.playing);
    }
}

/// Draw the timeline panel.
///
/// Playback itself advances once per frame in the window registry, so it
/// keeps running while the panel is hidden behind another tab.
pub fn draw_timeline(ui: &Ui, _area: Rect, shared_state: &SharedEditorStateHandle) {
    with_state(shared_state, |state| {
        let timeline = &mut state.timeline;

        if ui.button("|<") {
            timeline.set_frame(timeline.start);
        }
        ui.same_line();
        if ui.button("<") {
            timeline.step(-1);
        }
        ui.same_line();
        if ui.button(if timeline.playing { "Pause" } else { "Play" }) {
            timeline.toggle_playback();
        }
        ui.same_line();
        if ui.button(">") {
            timeline.step(1);
        }
        ui.same_line();
        if ui.button(">|") {
            timeline.set_frame(timeline.end);
        }
        ui.same_line();
        ui.checkbox("Loop", &mut timeline.looping);
        ui.same_line();
        ui.text(format!("Frame {} / {}", timeline.frame_index(), timeline.end as i32));

        ui.set_next_item_width(ui.content_region_avail()[0]);
        let mut frame = timeline.current;
        if ui.slider("##playhead", timeline.start, timeline.end, &mut frame) {
            timeline.set_frame(frame);
        }

        ui.set_next_item_width(80.0);
        Drag::new("Start").speed(1.0).range(0.0, timeline.end).build(ui, &mut timeline.start);
        ui.same_line();
        ui.set_next_item_width(80.0);
        Drag::new("End").speed(1.0).range(timeline.start, 100_000.0).build(ui, &mut timeline.end);
        ui.same_line();
        ui.set_next_item_width(80.0);
        Drag::new("FPS").speed(0.5).range(1.0, 240.0).build(ui, &mut timeline.fps);
        let current = timeline.current;
        timeline.set_frame(current);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_only_while_playing() {
        let mut timeline = TimelineState::default();
        timeline.advance(1.0);
        assert_eq!(timeline.current, 1.0);

        timeline.toggle_playback();
        timeline.advance(0.5);
        assert_eq!(timeline.current, 13.0);
    }

    #[test]
    fn test_advance_wraps_when_looping() {
        let mut timeline = TimelineState {
            start: 0.0,
            end: 10.0,
            current: 9.0,
            fps: 10.0,
            playing: true,
            looping: true,
        };
        timeline.advance(0.5);
        assert!((timeline.current - 4.0).abs() < 1e-4);
        assert!(timeline.playing);
    }

    #[test]
    fn test_advance_stops_at_end() {
        let mut timeline = TimelineState {
            looping: false,
            playing: true,
            current: 119.0,
            ..Default::default()
        };
        timeline.advance(1.0);
        assert_eq!(timeline.current, 120.0);
        assert!(!timeline.playing);
    }

    #[test]
    fn test_step_clamps() {
        let mut timeline = TimelineState::default();
        timeline.step(-5);
        assert_eq!(timeline.frame_index(), 1);
        timeline.set_frame(500.0);
        assert_eq!(timeline.frame_index(), 120);
        timeline.step(-1);
        assert_eq!(timeline.frame_index(), 119);
    }
}
