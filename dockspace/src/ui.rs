//! The seam between the docking engine and the host GUI toolkit
//!
//! The dockspace never talks to a toolkit directly. Each frame it receives a
//! reference to the toolkit's UI handle and only uses the primitives below:
//! pointer state, text metrics, flat rectangles, text and a clipped region
//! for panel content.

use crate::geometry::Rect;
use glam::Vec2;

/// RGBA colour with components in `0.0..=1.0`
pub type Color = [f32; 4];

/// Which draw layer a primitive goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// The dockspace host window, below panel content
    Window,
    /// Above everything, used for drag feedback
    Overlay,
}

/// Primary pointer button state sampled once per frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    /// Cursor position in the window's logical coordinates
    pub position: Vec2,
    /// Button is held this frame
    pub down: bool,
    /// Button went down this frame
    pub pressed: bool,
    /// Button went up this frame
    pub released: bool,
}

impl PointerState {
    /// Drop this frame's press unless the dockspace owns it.
    ///
    /// A press that lands on a popup, another window or a widget inside a
    /// panel must not start a dock gesture. Holds and releases pass through
    /// so gestures already in flight still finish.
    pub fn gate_press(mut self, dock_owns_press: bool) -> Self {
        if !dock_owns_press {
            self.pressed = false;
        }
        self
    }
}

/// Immediate-mode primitives the dockspace needs from the host toolkit
pub trait DockUi {
    fn pointer(&self) -> PointerState;

    fn text_size(&self, text: &str) -> Vec2;

    fn fill_rect(&self, layer: Layer, rect: Rect, color: Color);

    fn stroke_rect(&self, layer: Layer, rect: Rect, color: Color);

    fn text(&self, layer: Layer, position: Vec2, color: Color, text: &str);

    /// Run `content` inside a region clipped to `rect`.
    ///
    /// `id` is unique per panel and stable across frames.
    fn panel_region(&self, id: &str, rect: Rect, content: &mut dyn FnMut(&Self));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_press_keeps_hold_and_release() {
        let press = PointerState {
            position: Vec2::new(10.0, 10.0),
            down: true,
            pressed: true,
            released: false,
        };
        assert_eq!(press.gate_press(true), press);

        let gated = press.gate_press(false);
        assert!(!gated.pressed);
        assert!(gated.down);
        assert_eq!(gated.position, press.position);

        let release = PointerState {
            down: false,
            released: true,
            ..press
        };
        assert!(release.gate_press(false).released);
    }
}
