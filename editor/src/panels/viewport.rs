//! Scene viewport panel
//!
//! A top-down orthographic preview of the stage. Prims are drawn on the
//! XZ plane; clicking selects the nearest prim, the wheel zooms and the
//! right button pans.

use crate::shared_state::{with_state, SharedEditorStateHandle};
use crate::stage::{PrimKind, Stage};
use dockspace::Rect;
use glam::{Vec2, Vec3};
use imgui::*;
use tracing::debug;

/// Pixels within which a click picks a prim
const PICK_RADIUS: f32 = 10.0;

/// Per-panel view state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportView {
    /// World-space XZ point at the centre of the panel
    pub center: Vec2,
    /// Pixels per world unit
    pub zoom: f32,
}

impl Default for ViewportView {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            zoom: 60.0,
        }
    }
}

impl ViewportView {
    pub fn world_to_screen(&self, area: Rect, point: Vec3) -> Vec2 {
        area.center() + (Vec2::new(point.x, point.z) - self.center) * self.zoom
    }

    pub fn screen_to_world(&self, area: Rect, position: Vec2) -> Vec2 {
        self.center + (position - area.center()) / self.zoom
    }

    /// Zoom by wheel `steps`, keeping the world point under `anchor` fixed
    pub fn zoom_at(&mut self, area: Rect, anchor: Vec2, steps: f32) {
        let before = self.screen_to_world(area, anchor);
        self.zoom = (self.zoom * 1.1f32.powf(steps)).clamp(5.0, 1000.0);
        let after = self.screen_to_world(area, anchor);
        self.center += before - after;
    }

    /// Prim whose marker lies nearest to `position`, within the pick radius
    pub fn pick(&self, stage: &Stage, area: Rect, position: Vec2) -> Option<String> {
        let mut best: Option<(f32, &str)> = None;
        let mut pending = stage.children(None);
        while let Some(prim) = pending.pop() {
            pending.extend(stage.children(Some(&prim.path)));
            if !prim.visible || prim.kind == PrimKind::Scope {
                continue;
            }
            let distance = self.world_to_screen(area, prim.translate).distance(position);
            if distance <= PICK_RADIUS && best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, &prim.path));
            }
        }
        best.map(|(_, path)| path.to_string())
    }
}

fn kind_color(kind: PrimKind) -> [f32; 4] {
    match kind {
        PrimKind::Mesh => [0.75, 0.75, 0.8, 1.0],
        PrimKind::Camera => [0.4, 0.7, 1.0, 1.0],
        PrimKind::Light => [1.0, 0.85, 0.3, 1.0],
        PrimKind::Xform | PrimKind::Scope => [0.6, 0.6, 0.6, 1.0],
    }
}

/// Draw the viewport panel
pub fn draw_viewport(ui: &Ui, area: Rect, view: &mut ViewportView, shared_state: &SharedEditorStateHandle) {
    let draw_list = ui.get_window_draw_list();
    draw_list
        .add_rect(area.min.to_array(), area.max.to_array(), [0.11, 0.11, 0.12, 1.0])
        .filled(true)
        .build();

    let mouse = Vec2::from(ui.io().mouse_pos);
    let hovered = area.contains(mouse) && ui.is_window_hovered();
    if hovered {
        let wheel = ui.io().mouse_wheel;
        if wheel != 0.0 {
            view.zoom_at(area, mouse, wheel);
        }
        if ui.is_mouse_dragging(MouseButton::Right) {
            view.center -= Vec2::from(ui.io().mouse_delta) / view.zoom;
        }
    }

    // Grid lines every world unit
    let top_left = view.screen_to_world(area, area.min);
    let bottom_right = view.screen_to_world(area, area.max);
    let grid = [0.2, 0.2, 0.22, 1.0];
    for x in (top_left.x.floor() as i32)..=(bottom_right.x.ceil() as i32) {
        let sx = view.world_to_screen(area, Vec3::new(x as f32, 0.0, 0.0)).x;
        let color = if x == 0 { [0.6, 0.25, 0.25, 1.0] } else { grid };
        draw_list.add_line([sx, area.min.y], [sx, area.max.y], color).build();
    }
    for z in (top_left.y.floor() as i32)..=(bottom_right.y.ceil() as i32) {
        let sy = view.world_to_screen(area, Vec3::new(0.0, 0.0, z as f32)).y;
        let color = if z == 0 { [0.25, 0.25, 0.6, 1.0] } else { grid };
        draw_list.add_line([area.min.x, sy], [area.max.x, sy], color).build();
    }

    with_state(shared_state, |state| {
        let mut pending = state.stage.children(None);
        while let Some(prim) = pending.pop() {
            pending.extend(state.stage.children(Some(&prim.path)));
            if !prim.visible || prim.kind == PrimKind::Scope {
                continue;
            }
            let center = view.world_to_screen(area, prim.translate).to_array();
            let selected = state.selected_prim.as_deref() == Some(prim.path.as_str());
            let radius = 3.0 + 3.0 * prim.scale.max_element().clamp(0.1, 4.0);
            draw_list.add_circle(center, radius, kind_color(prim.kind)).filled(true).build();
            if selected {
                draw_list
                    .add_circle(center, radius + 3.0, [1.0, 0.6, 0.1, 1.0])
                    .thickness(2.0)
                    .build();
                draw_list.add_text([center[0] + radius + 5.0, center[1] - 6.0], [1.0, 1.0, 1.0, 1.0], prim.name());
            }
        }

        if hovered && ui.is_mouse_clicked(MouseButton::Left) {
            let picked = view.pick(&state.stage, area, mouse);
            debug!("Viewport pick: {:?}", picked);
            state.select(picked);
        }
    });

    let fps = ui.io().framerate;
    draw_list.add_text(
        [area.min.x + 8.0, area.min.y + 6.0],
        [0.8, 0.8, 0.8, 1.0],
        format!("Top  |  {fps:.0} FPS  |  zoom {:.0}", view.zoom),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> Rect {
        Rect::from_min_size(Vec2::ZERO, Vec2::new(400.0, 300.0))
    }

    #[test]
    fn test_projection_round_trip() {
        let view = ViewportView::default();
        let screen = view.world_to_screen(area(), Vec3::new(1.0, 5.0, -2.0));
        assert_eq!(screen, Vec2::new(260.0, 30.0));
        assert_eq!(view.screen_to_world(area(), screen), Vec2::new(1.0, -2.0));
    }

    #[test]
    fn test_zoom_keeps_anchor() {
        let mut view = ViewportView::default();
        let anchor = Vec2::new(320.0, 90.0);
        let before = view.screen_to_world(area(), anchor);
        view.zoom_at(area(), anchor, 3.0);
        let after = view.screen_to_world(area(), anchor);
        assert!(view.zoom > 60.0);
        assert!(before.distance(after) < 1e-4);
    }

    #[test]
    fn test_pick_nearest_visible() {
        let stage = Stage::demo();
        let view = ViewportView::default();
        let cube = view.world_to_screen(area(), Vec3::new(-1.5, 0.5, 0.0));
        assert_eq!(
            view.pick(&stage, area(), cube + Vec2::new(3.0, 0.0)),
            Some("/World/Geo/Cube".to_string())
        );
        assert_eq!(view.pick(&stage, area(), Vec2::new(5.0, 5.0)), None);

        let mut hidden = stage.clone();
        if let Some(cube) = hidden.get_mut("/World/Geo/Cube") {
            cube.visible = false;
        }
        assert_eq!(view.pick(&hidden, area(), cube), None);
    }
}
