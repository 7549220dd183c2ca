//! Stage outliner panel
//!
//! Displays the prim hierarchy as a tree and drives the shared selection.

use crate::shared_state::{with_state, SharedEditorState, SharedEditorStateHandle};
use crate::stage::{PrimKind, Stage};
use dockspace::Rect;
use imgui::*;
use tracing::debug;

/// Draw the outliner panel
pub fn draw_outliner(ui: &Ui, _area: Rect, shared_state: &SharedEditorStateHandle) {
    with_state(shared_state, |state| {
        if ui.button("Add Xform") {
            add_child(state, PrimKind::Xform);
        }
        ui.same_line();
        if ui.button("Add Mesh") {
            add_child(state, PrimKind::Mesh);
        }
        ui.same_line();
        let has_selection = state.selected_prim.is_some();
        ui.disabled(!has_selection, || {
            if ui.button("Delete") {
                if let Some(path) = state.selected_prim.take() {
                    let removed = state.stage.remove(&path);
                    debug!(path = %path, removed, "Deleted prim from outliner");
                    state.mark_stage_modified();
                }
            }
        });
        ui.separator();

        let mut clicked = None;
        let roots: Vec<String> = state.stage.children(None).iter().map(|p| p.path.clone()).collect();
        for root in roots {
            draw_prim_tree(ui, &state.stage, &root, state.selected_prim.as_deref(), &mut clicked);
        }
        if let Some(path) = clicked {
            state.select(Some(path));
        }
    });
}

/// Recursively render a prim and its children
fn draw_prim_tree(ui: &Ui, stage: &Stage, path: &str, selected: Option<&str>, clicked: &mut Option<String>) {
    let Some(prim) = stage.get(path) else {
        return;
    };
    let children = stage.children(Some(path));
    let label = format!("{} ({})##{}", prim.name(), prim.kind.label(), prim.path);

    let mut flags = TreeNodeFlags::OPEN_ON_ARROW | TreeNodeFlags::DEFAULT_OPEN | TreeNodeFlags::SPAN_AVAIL_WIDTH;
    if children.is_empty() {
        flags |= TreeNodeFlags::LEAF;
    }
    if selected == Some(path) {
        flags |= TreeNodeFlags::SELECTED;
    }

    let node = ui.tree_node_config(&label).flags(flags).push();
    if ui.is_item_clicked() {
        *clicked = Some(prim.path.clone());
    }
    if let Some(_token) = node {
        for child in children {
            draw_prim_tree(ui, stage, &child.path, selected, clicked);
        }
    }
}

/// Define a new prim under the selection (or at the top level)
fn add_child(state: &mut SharedEditorState, kind: PrimKind) {
    let parent = state.selected_prim.clone().unwrap_or_default();
    let path = (1..)
        .map(|n| format!("{parent}/{}{n}", kind.label()))
        .find(|p| state.stage.get(p).is_none())
        .unwrap_or_default();
    if state.stage.define(&path, kind) {
        state.select(Some(path));
        state.mark_stage_modified();
    }
}
