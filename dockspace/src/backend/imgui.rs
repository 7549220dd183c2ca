//! Dear ImGui backend

use crate::geometry::Rect;
use crate::ui::{Color, DockUi, Layer, PointerState};
use glam::Vec2;
use imgui::{MouseButton, Ui, WindowHoveredFlags};

fn to_array(v: Vec2) -> [f32; 2] {
    [v.x, v.y]
}

impl DockUi for Ui {
    fn pointer(&self) -> PointerState {
        let [x, y] = self.io().mouse_pos;
        let position = if x.is_finite() && y.is_finite() {
            Vec2::new(x, y)
        } else {
            // ImGui reports -FLT_MAX when the cursor is outside the window
            Vec2::splat(-1.0e6)
        };
        // Called from inside the dock host window. Popups and menus are
        // separate windows, so they take hover away from it.
        let host_hovered = self.is_window_hovered_with_flags(WindowHoveredFlags::CHILD_WINDOWS);
        let widget_busy = self.is_any_item_hovered() || self.is_any_item_active();
        PointerState {
            position,
            down: self.is_mouse_down(MouseButton::Left),
            pressed: self.is_mouse_clicked(MouseButton::Left),
            released: self.is_mouse_released(MouseButton::Left),
        }
        .gate_press(host_hovered && !widget_busy)
    }

    fn text_size(&self, text: &str) -> Vec2 {
        Vec2::from(self.calc_text_size(text))
    }

    fn fill_rect(&self, layer: Layer, rect: Rect, color: Color) {
        let draw_list = match layer {
            Layer::Window => self.get_window_draw_list(),
            Layer::Overlay => self.get_foreground_draw_list(),
        };
        draw_list
            .add_rect(to_array(rect.min), to_array(rect.max), color)
            .filled(true)
            .build();
    }

    fn stroke_rect(&self, layer: Layer, rect: Rect, color: Color) {
        let draw_list = match layer {
            Layer::Window => self.get_window_draw_list(),
            Layer::Overlay => self.get_foreground_draw_list(),
        };
        draw_list
            .add_rect(to_array(rect.min), to_array(rect.max), color)
            .thickness(2.0)
            .build();
    }

    fn text(&self, layer: Layer, position: Vec2, color: Color, text: &str) {
        let draw_list = match layer {
            Layer::Window => self.get_window_draw_list(),
            Layer::Overlay => self.get_foreground_draw_list(),
        };
        draw_list.add_text(to_array(position), color, text);
    }

    fn panel_region(&self, id: &str, rect: Rect, content: &mut dyn FnMut(&Self)) {
        self.set_cursor_screen_pos(to_array(rect.min));
        self.child_window(format!("##dock_{id}"))
            .size(to_array(rect.size()))
            .border(false)
            .build(|| content(self));
    }
}
