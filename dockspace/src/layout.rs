//! Layout pass: turns the split tree into screen rectangles
//!
//! Leaves tile the dockspace area exactly. Splitter bands are hit regions
//! laid over the boundaries and never take space from the leaves.

use crate::config::TitleBarMode;
use crate::dockspace::Dockspace;
use crate::geometry::Rect;
use crate::node::{Axis, NodeId, NodeKind, Side, Slot, Split};
use crate::panel::PanelId;
use glam::Vec2;
use std::collections::HashMap;

/// Screen geometry of one tab in a leaf header
#[derive(Debug, Clone, PartialEq)]
pub struct TabLayout {
    pub panel: PanelId,
    pub rect: Rect,
    /// Close button, present for closable panels
    pub close: Option<Rect>,
    pub active: bool,
}

/// Screen geometry of one leaf
#[derive(Debug, Clone, PartialEq)]
pub struct LeafLayout {
    pub node: NodeId,
    pub rect: Rect,
    pub header: Option<Rect>,
    pub content: Rect,
    pub tabs: Vec<TabLayout>,
    pub active: Option<PanelId>,
}

/// Grab band over a split boundary
#[derive(Debug, Clone, PartialEq)]
pub struct SplitterLayout {
    pub node: NodeId,
    pub axis: Axis,
    pub band: Rect,
    /// Coordinate of the boundary along the split axis
    pub boundary: f32,
}

/// Result of one layout pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub area: Rect,
    /// Extent of every node in the tree, splits included
    pub rects: HashMap<NodeId, Rect>,
    /// Leaves in traversal order
    pub leaves: Vec<LeafLayout>,
    pub splitters: Vec<SplitterLayout>,
}

impl Layout {
    pub fn rect_of(&self, node: NodeId) -> Option<Rect> {
        self.rects.get(&node).copied()
    }

    pub fn leaf(&self, node: NodeId) -> Option<&LeafLayout> {
        self.leaves.iter().find(|l| l.node == node)
    }

    /// Leaf under the pointer
    pub fn leaf_at(&self, pos: Vec2) -> Option<&LeafLayout> {
        self.leaves.iter().find(|l| l.rect.contains(pos))
    }

    /// Tab under the pointer
    pub fn tab_at(&self, pos: Vec2) -> Option<&TabLayout> {
        self.leaves
            .iter()
            .flat_map(|l| l.tabs.iter())
            .find(|t| t.rect.contains(pos))
    }

    /// Close button under the pointer, returning the panel it closes
    pub fn close_at(&self, pos: Vec2) -> Option<&PanelId> {
        self.leaves
            .iter()
            .flat_map(|l| l.tabs.iter())
            .find(|t| t.close.map(|c| c.contains(pos)).unwrap_or(false))
            .map(|t| &t.panel)
    }

    /// Splitter band under the pointer. Inner splits win over outer ones.
    pub fn splitter_at(&self, pos: Vec2) -> Option<&SplitterLayout> {
        self.splitters.iter().rev().find(|s| s.band.contains(pos))
    }
}

/// Drop slot for a pointer inside `rect`.
///
/// The centre zone, `center_fraction` of the rect on each axis, yields
/// `Tab`. Anywhere else yields the edge the pointer is closest to,
/// relative to the rect's size.
pub fn drop_slot(rect: Rect, pos: Vec2, center_fraction: f32) -> Slot {
    if rect.is_empty() {
        return Slot::Tab;
    }
    let size = rect.size();
    let rel = (pos - rect.min) / size;
    let half = center_fraction.clamp(0.0, 1.0) * 0.5;
    if (rel.x - 0.5).abs() <= half && (rel.y - 0.5).abs() <= half {
        return Slot::Tab;
    }

    let candidates = [
        (rel.x, Slot::Left),
        (1.0 - rel.x, Slot::Right),
        (rel.y, Slot::Top),
        (1.0 - rel.y, Slot::Bottom),
    ];
    candidates
        .into_iter()
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, slot)| slot)
        .unwrap_or(Slot::Tab)
}

/// Area a dropped panel would occupy for `slot`
pub fn drop_preview(rect: Rect, slot: Slot) -> Rect {
    let half = rect.size() * 0.5;
    match slot {
        Slot::Left => Rect::from_min_size(rect.min, Vec2::new(half.x, rect.height())),
        Slot::Right => Rect::from_min_max(Vec2::new(rect.min.x + half.x, rect.min.y), rect.max),
        Slot::Top => Rect::from_min_size(rect.min, Vec2::new(rect.width(), half.y)),
        Slot::Bottom => Rect::from_min_max(Vec2::new(rect.min.x, rect.min.y + half.y), rect.max),
        Slot::Tab => rect,
    }
}

/// Pixel extent of a split's primary child for `avail` pixels along its axis
pub(crate) fn primary_extent(split: &Split, avail: f32, primary_min: f32, secondary_min: f32) -> f32 {
    let avail = avail.max(0.0);
    let desired = if split.auto_resize || split.size <= 0.0 || !split.size.is_finite() {
        avail * 0.5
    } else {
        split.size
    };

    let hi = avail - secondary_min;
    let extent = if primary_min <= hi {
        desired.clamp(primary_min, hi)
    } else {
        // Minimums overflow: the primary gets no more than its minimum
        primary_min.min(avail)
    };
    extent.clamp(0.0, avail)
}

impl<U: ?Sized> Dockspace<U> {
    /// Partition `area` among the leaves of the tree
    pub fn compute_layout(&self, area: Rect) -> Layout {
        let mut layout = Layout {
            area,
            ..Default::default()
        };
        self.place(self.root(), area, &mut layout);
        layout
    }

    fn place(&self, id: NodeId, rect: Rect, layout: &mut Layout) {
        let Some(node) = self.node(id) else {
            return;
        };
        layout.rects.insert(id, rect);

        match &node.kind {
            NodeKind::Split(split) => {
                let axis = split.axis;
                let avail = axis.main(rect.size());
                let (primary_min, secondary_min) = {
                    let p = self.min_size(split.child(split.primary));
                    let s = self.min_size(split.child(split.primary.other()));
                    (axis.main(p), axis.main(s))
                };
                let primary = primary_extent(split, avail, primary_min, secondary_min);
                let first_extent = match split.primary {
                    Side::First => primary,
                    Side::Second => avail - primary,
                };

                let (first_rect, second_rect, boundary) = match axis {
                    Axis::Horizontal => {
                        let cut = rect.min.x + first_extent;
                        (
                            Rect::from_min_max(rect.min, Vec2::new(cut, rect.max.y)),
                            Rect::from_min_max(Vec2::new(cut, rect.min.y), rect.max),
                            cut,
                        )
                    }
                    Axis::Vertical => {
                        let cut = rect.min.y + first_extent;
                        (
                            Rect::from_min_max(rect.min, Vec2::new(rect.max.x, cut)),
                            Rect::from_min_max(Vec2::new(rect.min.x, cut), rect.max),
                            cut,
                        )
                    }
                };

                let half = self.style().splitter_thickness * 0.5;
                let band = match axis {
                    Axis::Horizontal => Rect::from_min_max(
                        Vec2::new(boundary - half, rect.min.y),
                        Vec2::new(boundary + half, rect.max.y),
                    ),
                    Axis::Vertical => Rect::from_min_max(
                        Vec2::new(rect.min.x, boundary - half),
                        Vec2::new(rect.max.x, boundary + half),
                    ),
                };
                layout.splitters.push(SplitterLayout {
                    node: id,
                    axis,
                    band,
                    boundary,
                });

                let (first, second) = (split.first, split.second);
                self.place(first, first_rect, layout);
                self.place(second, second_rect, layout);
            }
            NodeKind::Leaf(leaf) => {
                let style = self.style();
                let show_header = leaf.panels.len() > 1
                    || (leaf.panels.len() == 1 && style.title_bar == TitleBarMode::Title);

                let (header, content) = if show_header {
                    let (header, content) = rect.split_top(style.tab_height);
                    (Some(header), content)
                } else {
                    (None, rect)
                };

                let mut tabs = Vec::with_capacity(leaf.panels.len());
                if let Some(header) = header {
                    let count = leaf.panels.len().max(1) as f32;
                    let tab_width = header.width() / count;
                    for (i, panel_id) in leaf.panels.iter().enumerate() {
                        let x0 = header.min.x + tab_width * i as f32;
                        let x1 = if i + 1 == leaf.panels.len() {
                            header.max.x
                        } else {
                            x0 + tab_width
                        };
                        let tab_rect = Rect::from_min_max(Vec2::new(x0, header.min.y), Vec2::new(x1, header.max.y));
                        let closable = self.panel(panel_id).map(|p| p.closable).unwrap_or(false);
                        let close = closable.then(|| {
                            let side = tab_rect.height().min(tab_rect.width());
                            Rect::from_min_max(Vec2::new(tab_rect.max.x - side, tab_rect.min.y), tab_rect.max)
                        });
                        tabs.push(TabLayout {
                            panel: panel_id.clone(),
                            rect: tab_rect,
                            close,
                            active: leaf.active.as_ref() == Some(panel_id),
                        });
                    }
                }

                layout.leaves.push(LeafLayout {
                    node: id,
                    rect,
                    header,
                    content,
                    tabs,
                    active: leaf.active.clone(),
                });
            }
        }
    }

    /// Store a layout for the next frame's size checks and record each
    /// visible panel's content size
    pub(crate) fn record_layout(&mut self, layout: Layout) {
        for leaf in &layout.leaves {
            if let Some(active) = &leaf.active {
                if let Some(panel) = self.panel_mut(active) {
                    panel.last_size = leaf.content.size();
                }
            }
        }
        self.layout = layout;
    }
}
