//! Headless [`DockUi`] for driving dockspaces without a GUI toolkit
//!
//! `RecordingUi` takes scripted pointer input and records every draw
//! primitive, so tests can assert on what a frame painted.

use crate::geometry::Rect;
use crate::ui::{Color, DockUi, Layer, PointerState};
use glam::Vec2;
use std::cell::{Cell, RefCell};

/// Width of one character in the fake font
pub const CHAR_WIDTH: f32 = 7.0;
/// Line height of the fake font
pub const LINE_HEIGHT: f32 = 13.0;

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Fill { layer: Layer, rect: Rect, color: Color },
    Stroke { layer: Layer, rect: Rect, color: Color },
    Text { layer: Layer, position: Vec2, text: String },
    Region { id: String, rect: Rect },
}

/// Scripted pointer plus a log of draw calls
#[derive(Debug, Default)]
pub struct RecordingUi {
    pointer: Cell<PointerState>,
    /// Something above the dockspace (a popup, a panel widget) has the pointer
    captured: Cell<bool>,
    ops: RefCell<Vec<DrawOp>>,
}

impl RecordingUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the pointer without touching the button
    pub fn move_to(&self, x: f32, y: f32) {
        let mut state = self.pointer.get();
        state.position = Vec2::new(x, y);
        state.pressed = false;
        state.released = false;
        self.pointer.set(state);
    }

    /// Press the button at a position (the "pressed" edge of a click)
    pub fn press(&self, x: f32, y: f32) {
        self.pointer.set(PointerState {
            position: Vec2::new(x, y),
            down: true,
            pressed: true,
            released: false,
        });
    }

    /// Keep the button held while moving
    pub fn hold(&self, x: f32, y: f32) {
        self.pointer.set(PointerState {
            position: Vec2::new(x, y),
            down: true,
            pressed: false,
            released: false,
        });
    }

    /// Release the button at a position
    pub fn release(&self, x: f32, y: f32) {
        self.pointer.set(PointerState {
            position: Vec2::new(x, y),
            down: false,
            pressed: false,
            released: true,
        });
    }

    /// Let a popup or widget take presses away from the dockspace, the way
    /// a toolkit backend reports it
    pub fn set_captured(&self, captured: bool) {
        self.captured.set(captured);
    }

    pub fn ops(&self) -> Vec<DrawOp> {
        self.ops.borrow().clone()
    }

    /// Content regions opened during recorded frames, in order
    pub fn regions(&self) -> Vec<(String, Rect)> {
        self.ops
            .borrow()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Region { id, rect } => Some((id.clone(), *rect)),
                _ => None,
            })
            .collect()
    }

    /// Text drawn on a layer
    pub fn texts(&self, layer: Layer) -> Vec<String> {
        self.ops
            .borrow()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { layer: l, text, .. } if *l == layer => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Forget recorded draw calls, typically between frames
    pub fn clear(&self) {
        self.ops.borrow_mut().clear();
    }
}

impl DockUi for RecordingUi {
    fn pointer(&self) -> PointerState {
        self.pointer.get().gate_press(!self.captured.get())
    }

    fn text_size(&self, text: &str) -> Vec2 {
        Vec2::new(text.chars().count() as f32 * CHAR_WIDTH, LINE_HEIGHT)
    }

    fn fill_rect(&self, layer: Layer, rect: Rect, color: Color) {
        self.ops.borrow_mut().push(DrawOp::Fill { layer, rect, color });
    }

    fn stroke_rect(&self, layer: Layer, rect: Rect, color: Color) {
        self.ops.borrow_mut().push(DrawOp::Stroke { layer, rect, color });
    }

    fn text(&self, layer: Layer, position: Vec2, _color: Color, text: &str) {
        self.ops.borrow_mut().push(DrawOp::Text {
            layer,
            position,
            text: text.to_string(),
        });
    }

    fn panel_region(&self, id: &str, rect: Rect, content: &mut dyn FnMut(&Self)) {
        self.ops.borrow_mut().push(DrawOp::Region {
            id: id.to_string(),
            rect,
        });
        content(self);
    }
}
