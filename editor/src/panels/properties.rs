//! Prim properties panel
//!
//! Displays and allows editing of the selected prim's transform.

use crate::shared_state::{with_state, SharedEditorStateHandle};
use dockspace::Rect;
use glam::Vec3;
use imgui::*;
use tracing::debug;

/// Draw the properties panel
pub fn draw_properties(ui: &Ui, _area: Rect, shared_state: &SharedEditorStateHandle) {
    with_state(shared_state, |state| {
        let Some(path) = state.selected_prim.clone() else {
            ui.text_disabled("Nothing selected");
            return;
        };
        let Some(prim) = state.stage.get_mut(&path) else {
            ui.text_disabled("Selection is no longer on the stage");
            return;
        };

        ui.text(prim.name());
        ui.same_line();
        ui.text_disabled(prim.kind.label());
        ui.text_disabled(&prim.path);
        ui.separator();

        let mut modified = ui.checkbox("Visible", &mut prim.visible);
        if ui.collapsing_header("Transform", TreeNodeFlags::DEFAULT_OPEN) {
            modified |= vec3_field(ui, "Translate", &mut prim.translate, 0.01);
            modified |= vec3_field(ui, "Rotate", &mut prim.rotate, 0.5);
            modified |= vec3_field(ui, "Scale", &mut prim.scale, 0.01);
            if ui.button("Reset Transform") {
                prim.translate = Vec3::ZERO;
                prim.rotate = Vec3::ZERO;
                prim.scale = Vec3::ONE;
                modified = true;
            }
        }

        if modified {
            debug!(path = %path, "Edited prim in properties panel");
            state.mark_stage_modified();
        }
    });
}

fn vec3_field(ui: &Ui, label: &str, value: &mut Vec3, speed: f32) -> bool {
    let mut components = value.to_array();
    let changed = Drag::new(label)
        .display_format("%.3f")
        .speed(speed)
        .build_array(ui, &mut components);
    if changed {
        *value = Vec3::from_array(components);
    }
    changed
}
