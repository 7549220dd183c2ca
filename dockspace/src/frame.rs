//! The per-frame pass: input, layout, gesture state machine, painting

use crate::dockspace::Dockspace;
use crate::geometry::Rect;
use crate::interaction::{DockAction, DockFrame, DropTarget, FrameOutcome, ReleasedPanel};
use crate::layout::{drop_preview, drop_slot, primary_extent, Layout};
use crate::node::{Axis, NodeId, Side, Slot};
use crate::panel::PanelId;
use crate::ui::{DockUi, Layer, PointerState};
use glam::Vec2;
use tracing::{debug, info};

/// Offset of the floating drag label from the cursor
const DRAG_LABEL_OFFSET: Vec2 = Vec2::new(12.0, 12.0);

impl<U: DockUi + ?Sized> Dockspace<U> {
    /// Run one frame of the dockspace inside `area`.
    ///
    /// Reads the pointer, lays out the tree, advances the gesture in
    /// `frame` (which may dock, undock, activate, close or resize), lays out
    /// again if anything changed and paints headers, panel content and drag
    /// feedback.
    pub fn update_and_draw(&mut self, ui: &U, frame: &mut DockFrame, area: Rect) -> FrameOutcome {
        let pointer = ui.pointer();
        let mut outcome = FrameOutcome::default();

        let layout = self.compute_layout(area);
        self.step(pointer, &layout, frame, &mut outcome);
        let layout = if outcome.changed {
            self.compute_layout(area)
        } else {
            layout
        };
        self.record_layout(layout);
        self.paint(ui, frame, pointer);

        outcome
    }

    fn step(&mut self, pointer: PointerState, layout: &Layout, frame: &mut DockFrame, outcome: &mut FrameOutcome) {
        let action = self.discard_stale(std::mem::take(&mut frame.action));
        let pos = pointer.position;

        frame.action = match action {
            DockAction::Null => {
                frame.hover = None;
                if pointer.pressed {
                    self.begin_action(pos, layout, outcome)
                } else {
                    DockAction::Null
                }
            }
            DockAction::Undock { panel, origin } => {
                if !pointer.down {
                    DockAction::Null
                } else if pos.distance(origin) >= self.style().drag_threshold {
                    if let Some(p) = self.panel_mut(&panel) {
                        p.dragging = true;
                    }
                    info!(panel = %panel, "Started dragging panel");
                    outcome.drag_started = Some(panel.clone());
                    DockAction::Drag { panel }
                } else {
                    DockAction::Undock { panel, origin }
                }
            }
            DockAction::Drag { panel } => {
                frame.hover = self.drop_target(layout, pos, &panel);
                if pointer.down {
                    DockAction::Drag { panel }
                } else {
                    if let Some(p) = self.panel_mut(&panel) {
                        p.dragging = false;
                    }
                    match frame.hover.take() {
                        Some(target) => {
                            if self.redock(&panel, target.node, target.slot) {
                                info!(panel = %panel, slot = ?target.slot, "Dropped panel");
                                outcome.changed = true;
                                outcome.redocked = Some(panel);
                            }
                        }
                        None if layout.leaf_at(pos).is_none() => {
                            debug!(panel = %panel, ?pos, "Panel released outside dockspace");
                            outcome.released_outside = Some(ReleasedPanel { panel, position: pos });
                        }
                        None => {}
                    }
                    DockAction::Null
                }
            }
            DockAction::Close { panel } => {
                if pointer.down {
                    DockAction::Close { panel }
                } else {
                    if layout.close_at(pos) == Some(&panel) && self.close(&panel) {
                        outcome.changed = true;
                        outcome.closed.push(panel);
                    }
                    DockAction::Null
                }
            }
            DockAction::Resize { node } => {
                if pointer.down {
                    if self.drag_splitter(node, layout, pos) {
                        outcome.changed = true;
                    }
                    DockAction::Resize { node }
                } else {
                    DockAction::Null
                }
            }
        };
    }

    /// Drop actions whose panel or split vanished since the last frame
    fn discard_stale(&mut self, action: DockAction) -> DockAction {
        let stale = match &action {
            DockAction::Null => false,
            DockAction::Resize { node } => self.node(*node).and_then(|n| n.as_split()).is_none(),
            other => other
                .panel()
                .map(|id| self.leaf_of(id).is_none())
                .unwrap_or(true),
        };
        if stale {
            debug!(action = ?action, "Discarding stale dock action");
            if let Some(panel) = action.panel().and_then(|id| self.panel_mut(id)) {
                panel.dragging = false;
            }
            DockAction::Null
        } else {
            action
        }
    }

    fn begin_action(&mut self, pos: Vec2, layout: &Layout, outcome: &mut FrameOutcome) -> DockAction {
        if let Some(panel) = layout.close_at(pos) {
            return DockAction::Close { panel: panel.clone() };
        }
        if let Some(splitter) = layout.splitter_at(pos) {
            return DockAction::Resize { node: splitter.node };
        }
        let Some(tab) = layout.tab_at(pos) else {
            return DockAction::Null;
        };

        let panel = tab.panel.clone();
        if !tab.active && self.set_active(&panel) {
            outcome.changed = true;
            outcome.activated = Some(panel.clone());
        }
        match self.panel(&panel) {
            Some(p) if p.draggable => DockAction::Undock { panel, origin: pos },
            _ => DockAction::Null,
        }
    }

    fn drop_target(&self, layout: &Layout, pos: Vec2, dragged: &PanelId) -> Option<DropTarget> {
        let leaf = layout.leaf_at(pos)?;
        let slot = drop_slot(leaf.rect, pos, self.style().drop_center_fraction);

        let others = leaf.tabs.iter().any(|t| &t.panel != dragged)
            || leaf.active.as_ref().map(|a| a != dragged).unwrap_or(false);
        if !others {
            return None;
        }
        if slot == Slot::Tab && self.leaf_of(dragged) == Some(leaf.node) {
            return None;
        }
        Some(DropTarget {
            node: leaf.node,
            slot,
            preview: drop_preview(leaf.rect, slot),
        })
    }

    /// Move a split boundary to the pointer, respecting both children's
    /// minimum sizes
    fn drag_splitter(&mut self, node: NodeId, layout: &Layout, pos: Vec2) -> bool {
        let (Some(rect), Some(split)) = (layout.rect_of(node), self.node(node).and_then(|n| n.as_split()).cloned())
        else {
            return false;
        };
        let avail = split.axis.main(rect.size());
        let offset = match split.axis {
            Axis::Horizontal => pos.x - rect.min.x,
            Axis::Vertical => pos.y - rect.min.y,
        };
        let desired = match split.primary {
            Side::First => offset,
            Side::Second => avail - offset,
        };

        let primary_min = split.axis.main(self.min_size(split.child(split.primary)));
        let secondary_min = split.axis.main(self.min_size(split.child(split.primary.other())));
        let mut fixed = split.clone();
        fixed.size = desired.max(0.0);
        fixed.auto_resize = false;
        let size = primary_extent(&fixed, avail, primary_min, secondary_min);

        if split.auto_resize || (split.size - size).abs() > f32::EPSILON {
            self.resize_split(node, size)
        } else {
            false
        }
    }

    fn paint(&mut self, ui: &U, frame: &DockFrame, pointer: PointerState) {
        let layout = std::mem::take(&mut self.layout);
        let style = self.style().clone();
        let colors = style.colors;

        for leaf in &layout.leaves {
            ui.fill_rect(Layer::Window, leaf.rect, colors.background);

            if let Some(header) = leaf.header {
                ui.fill_rect(Layer::Window, header, colors.header);
                for tab in &leaf.tabs {
                    let color = if tab.active {
                        colors.tab_active
                    } else if tab.rect.contains(pointer.position) {
                        colors.tab_hovered
                    } else {
                        colors.tab
                    };
                    ui.fill_rect(Layer::Window, tab.rect, color);

                    let text_size = ui.text_size(tab.panel.as_str());
                    let y = tab.rect.min.y + (tab.rect.height() - text_size.y).max(0.0) * 0.5;
                    ui.text(
                        Layer::Window,
                        Vec2::new(tab.rect.min.x + style.tab_padding, y),
                        colors.text,
                        tab.panel.as_str(),
                    );

                    if let Some(close) = tab.close {
                        let glyph = ui.text_size("x");
                        ui.text(Layer::Window, close.center() - glyph * 0.5, colors.close, "x");
                    }
                }
            }

            let Some(active) = &leaf.active else {
                continue;
            };
            if leaf.content.is_empty() {
                continue;
            }
            let content = leaf.content;
            if let Some(panel) = self.panel_mut(active) {
                ui.panel_region(active.as_str(), content, &mut |ui: &U| panel.draw(ui, content));
            }
        }

        for splitter in &layout.splitters {
            let line = match splitter.axis {
                Axis::Horizontal => Rect::from_min_max(
                    Vec2::new(splitter.boundary - 0.5, splitter.band.min.y),
                    Vec2::new(splitter.boundary + 0.5, splitter.band.max.y),
                ),
                Axis::Vertical => Rect::from_min_max(
                    Vec2::new(splitter.band.min.x, splitter.boundary - 0.5),
                    Vec2::new(splitter.band.max.x, splitter.boundary + 0.5),
                ),
            };
            ui.fill_rect(Layer::Window, line, colors.splitter);
        }

        if let DockAction::Drag { panel } = &frame.action {
            if let Some(target) = &frame.hover {
                ui.fill_rect(Layer::Overlay, target.preview, colors.drop_preview);
                ui.stroke_rect(Layer::Overlay, target.preview, colors.tab_active);
            }
            let text_size = ui.text_size(panel.as_str());
            let label = Rect::from_min_size(
                pointer.position + DRAG_LABEL_OFFSET,
                Vec2::new(text_size.x + style.tab_padding * 2.0, style.tab_height.max(text_size.y)),
            );
            ui.fill_rect(Layer::Overlay, label, colors.drag_overlay);
            ui.text(
                Layer::Overlay,
                label.min + Vec2::new(style.tab_padding, (label.height() - text_size.y) * 0.5),
                colors.text,
                panel.as_str(),
            );
        }

        self.layout = layout;
    }
}
