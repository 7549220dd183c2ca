//! The dockspace: panel registry plus the split tree that arranges panels
//!
//! Nodes live in a slot map keyed by [`NodeId`]. The root is never removed
//! while the tree exists; every other node is owned by the tree and removed
//! when a leaf collapses. A removed key stays dead, so gestures holding a
//! key from an earlier frame cannot land on an unrelated node.
//!
//! All tree mutations are total: invalid requests (unknown panel, panel
//! already docked, target not docked) are logged at debug level and
//! reported by returning `false`.

use crate::config::DockStyle;
use crate::error::DockError;
use crate::layout::Layout;
use crate::node::{Axis, Leaf, Node, NodeId, NodeKind, Slot, Split};
use crate::panel::{Panel, PanelId};
use glam::Vec2;
use slotmap::SlotMap;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, trace};

/// Panel registry and split tree for one window
pub struct Dockspace<U: ?Sized> {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
    panels: HashMap<PanelId, Panel<U>>,
    style: DockStyle,
    /// Layout from the most recent frame, used for size checks and hit tests
    pub(crate) layout: Layout,
}

impl<U: ?Sized> Default for Dockspace<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: ?Sized> Dockspace<U> {
    /// Create an empty dockspace with the default style
    pub fn new() -> Self {
        Self::with_style(DockStyle::default())
    }

    /// Create an empty dockspace with a custom style
    pub fn with_style(style: DockStyle) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::default());
        Self {
            nodes,
            root,
            panels: HashMap::new(),
            style: style.sanitized(),
            layout: Layout::default(),
        }
    }

    pub fn style(&self) -> &DockStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: DockStyle) {
        self.style = style.sanitized();
    }

    /// Layout computed during the last frame
    pub fn last_layout(&self) -> &Layout {
        &self.layout
    }

    // ------------------------------------------------------------------ nodes

    /// The root node; it is replaced only by `clear` and `undock_all`
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub(crate) fn live(&self, id: NodeId) -> &Node {
        self.node(id).expect("node id refers to a live node")
    }

    pub(crate) fn live_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes.get_mut(id).expect("node id refers to a live node")
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        self.nodes.insert(node)
    }

    pub(crate) fn alloc_empty(&mut self, parent: NodeId) -> NodeId {
        self.alloc(Node::leaf(Some(parent), Leaf::default()))
    }

    fn release(&mut self, id: NodeId) {
        if id == self.root {
            return;
        }
        if self.nodes.remove(id).is_some() {
            self.layout.rects.remove(&id);
            trace!(node = ?id, "Released node");
        }
    }

    /// Number of live nodes, the root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// True when the tree holds no panel at all
    pub fn is_empty(&self) -> bool {
        self.live(self.root)
            .as_leaf()
            .map(Leaf::is_empty)
            .unwrap_or(false)
    }

    /// Leaves in traversal order (first child before second child)
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            match &self.live(id).kind {
                NodeKind::Leaf(_) => out.push(id),
                NodeKind::Split(split) => {
                    stack.push(split.second);
                    stack.push(split.first);
                }
            }
        }
        out
    }

    fn first_leaf(&self) -> NodeId {
        let mut id = self.root;
        while let Some(split) = self.live(id).as_split() {
            id = split.first;
        }
        id
    }

    /// Point the children of `id` (or, for a leaf, its panels) back at `id`
    fn adopt_children(&mut self, id: NodeId) {
        match self.live(id).kind.clone() {
            NodeKind::Split(split) => {
                self.live_mut(split.first).parent = Some(id);
                self.live_mut(split.second).parent = Some(id);
            }
            NodeKind::Leaf(leaf) => {
                for panel in &leaf.panels {
                    if let Some(panel) = self.panels.get_mut(panel) {
                        panel.node = Some(id);
                    }
                }
            }
        }
    }

    // ----------------------------------------------------------------- panels

    /// Register a panel without docking it; fails on a duplicate title
    pub fn add_panel(&mut self, mut panel: Panel<U>) -> bool {
        if self.panels.contains_key(panel.id()) {
            debug!(panel = %panel.id(), "Panel already registered");
            return false;
        }
        panel.node = None;
        panel.dragging = false;
        debug!(panel = %panel.id(), "Registered panel");
        self.panels.insert(panel.id().clone(), panel);
        true
    }

    pub fn panel(&self, id: &PanelId) -> Option<&Panel<U>> {
        self.panels.get(id)
    }

    pub fn panel_mut(&mut self, id: &PanelId) -> Option<&mut Panel<U>> {
        self.panels.get_mut(id)
    }

    pub fn panels(&self) -> impl Iterator<Item = &Panel<U>> {
        self.panels.values()
    }

    /// Registered panel ids in title order
    pub fn panel_ids(&self) -> Vec<PanelId> {
        let mut ids: Vec<PanelId> = self.panels.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Leaf holding the panel, if it is docked
    pub fn leaf_of(&self, id: &PanelId) -> Option<NodeId> {
        self.panels.get(id).and_then(|p| p.node)
    }

    /// Whether a panel with this title is currently in the tree
    pub fn has_dock(&self, title: &str) -> bool {
        self.panels
            .get(&PanelId::from(title))
            .map(Panel::is_docked)
            .unwrap_or(false)
    }

    // --------------------------------------------------------------- mutation

    /// Register and dock a panel in one step
    pub fn dock_new(
        &mut self,
        panel: Panel<U>,
        slot: impl Into<Option<Slot>>,
        size: f32,
        make_active: bool,
    ) -> bool {
        let id = panel.id().clone();
        if !self.add_panel(panel) {
            return false;
        }
        if self.dock(&id, slot, size, make_active) {
            true
        } else {
            self.panels.remove(&id);
            false
        }
    }

    /// Dock a registered panel relative to the whole tree.
    ///
    /// An empty tree makes the panel the root leaf's sole occupant. Edge
    /// slots split the root; `Tab` (or `None`) joins the root leaf, or the
    /// first leaf when the root is split.
    pub fn dock(
        &mut self,
        id: &PanelId,
        slot: impl Into<Option<Slot>>,
        size: f32,
        make_active: bool,
    ) -> bool {
        let slot = slot.into().unwrap_or(Slot::Tab);
        if !self.dockable(id) {
            return false;
        }

        if self.is_empty() {
            info!(panel = %id, "Docked panel as root content");
            return self.attach_tab(self.root, id, true);
        }

        let docked = match slot {
            Slot::Tab => {
                let leaf = self.first_leaf();
                self.attach_tab(leaf, id, make_active)
            }
            edge => self.split_node(self.root, id, edge, size),
        };
        if docked {
            info!(panel = %id, slot = ?slot, size, "Docked panel");
        }
        docked
    }

    /// Dock a registered panel next to (or as a tab of) `target`
    pub fn dock_with(
        &mut self,
        id: &PanelId,
        target: &PanelId,
        slot: impl Into<Option<Slot>>,
        size: f32,
        make_active: bool,
    ) -> bool {
        let slot = slot.into().unwrap_or(Slot::Tab);
        if id == target {
            debug!(panel = %id, "Cannot dock a panel relative to itself");
            return false;
        }
        if !self.dockable(id) {
            return false;
        }
        let Some(leaf) = self.leaf_of(target) else {
            debug!(panel = %id, target = %target, "Dock target is not docked");
            return false;
        };

        let docked = match slot {
            Slot::Tab => self.attach_tab(leaf, id, make_active),
            edge => self.split_node(leaf, id, edge, size),
        };
        if docked {
            info!(panel = %id, target = %target, slot = ?slot, size, "Docked panel");
        }
        docked
    }

    /// Dock a registered panel into a specific leaf, anchoring on the
    /// leaf's active panel. Falls back to a root tab when the leaf is gone
    /// or the edge split does not fit.
    pub fn dock_into(&mut self, id: &PanelId, leaf: NodeId, slot: Slot) -> bool {
        if !self.dockable(id) {
            return false;
        }
        let anchor = self.node(leaf).and_then(Node::as_leaf).and_then(|l| {
            l.active
                .clone()
                .filter(|a| a != id)
                .or_else(|| l.panels.iter().find(|p| *p != id).cloned())
        });

        match anchor {
            Some(anchor) => {
                self.dock_with(id, &anchor, slot, 0.0, true)
                    || self.dock_with(id, &anchor, Slot::Tab, 0.0, true)
            }
            None => self.dock(id, Slot::Tab, 0.0, true),
        }
    }

    /// Remove a panel from its leaf, collapsing the leaf if it empties
    pub fn undock(&mut self, id: &PanelId) -> bool {
        let Some(leaf_id) = self.leaf_of(id) else {
            debug!(panel = %id, "Panel is not docked");
            return false;
        };

        let emptied = match self.live_mut(leaf_id).as_leaf_mut() {
            Some(leaf) => {
                leaf.remove(id);
                leaf.is_empty()
            }
            None => false,
        };
        if let Some(panel) = self.panels.get_mut(id) {
            panel.node = None;
            panel.dragging = false;
        }
        if emptied && leaf_id != self.root {
            self.collapse(leaf_id);
        }

        info!(panel = %id, "Undocked panel");
        true
    }

    /// Make a docked panel the active tab of its leaf
    pub fn set_active(&mut self, id: &PanelId) -> bool {
        let Some(leaf_id) = self.leaf_of(id) else {
            return false;
        };
        match self.live_mut(leaf_id).as_leaf_mut() {
            Some(leaf) => {
                if leaf.active.as_ref() != Some(id) {
                    debug!(panel = %id, "Activated tab");
                    leaf.active = Some(id.clone());
                }
                true
            }
            None => false,
        }
    }

    /// Close a panel: ask its confirmation callback, then undock and
    /// unregister it
    pub fn close(&mut self, id: &PanelId) -> bool {
        let Some(panel) = self.panels.get_mut(id) else {
            return false;
        };
        if !panel.confirm_close() {
            info!(panel = %id, "Close vetoed by panel");
            return false;
        }
        self.undock(id);
        self.panels.remove(id);
        info!(panel = %id, "Closed panel");
        true
    }

    /// Undock and unregister a panel, handing ownership to the caller
    pub fn take_panel(&mut self, id: &PanelId) -> Option<Panel<U>> {
        self.undock(id);
        let mut panel = self.panels.remove(id)?;
        panel.node = None;
        panel.dragging = false;
        Some(panel)
    }

    /// Drop every panel and node
    pub fn clear(&mut self) {
        self.reset_nodes();
        self.panels.clear();
        self.layout = Layout::default();
        info!("Cleared dockspace");
    }

    /// Detach every panel from the tree, keeping them registered
    pub fn undock_all(&mut self) {
        self.reset_nodes();
        self.layout = Layout::default();
        for panel in self.panels.values_mut() {
            panel.node = None;
            panel.dragging = false;
        }
    }

    fn reset_nodes(&mut self) {
        self.nodes.clear();
        self.root = self.nodes.insert(Node::default());
    }

    /// Move a docked panel into `target` leaf at `slot` (drag and drop)
    pub(crate) fn redock(&mut self, id: &PanelId, target: NodeId, slot: Slot) -> bool {
        let Some(source) = self.leaf_of(id) else {
            return false;
        };
        let Some(target_leaf) = self.node(target).and_then(Node::as_leaf) else {
            return false;
        };
        if !target_leaf.panels.iter().any(|p| p != id) {
            debug!(panel = %id, "Dropped panel onto its own leaf");
            return false;
        }
        if slot == Slot::Tab && source == target {
            return false;
        }
        if let (Some(axis), Some(panel)) = (slot.axis(), self.panels.get(id)) {
            if !self.fits(target, axis, panel.min_size) {
                debug!(panel = %id, slot = ?slot, "Drop target too small");
                return false;
            }
        }

        // Anchor by panel id: undocking may splice nodes and move the target
        // leaf's content to another slot.
        let anchor = target_leaf
            .active
            .clone()
            .filter(|a| a != id)
            .or_else(|| target_leaf.panels.iter().find(|p| *p != id).cloned());
        let Some(anchor) = anchor else {
            return false;
        };

        // The panel has left its leaf, so report a move even when the edge
        // split no longer fits and it lands as a tab instead.
        self.undock(id);
        if self.dock_with(id, &anchor, slot, 0.0, true) {
            return true;
        }
        debug!(panel = %id, slot = ?slot, "Edge drop no longer fits, docking as tab");
        self.dock_with(id, &anchor, Slot::Tab, 0.0, true) || self.dock(id, Slot::Tab, 0.0, true)
    }

    /// Set a split's primary size, turning off auto-resize
    pub fn resize_split(&mut self, node: NodeId, size: f32) -> bool {
        match self.nodes.get_mut(node) {
            Some(node) => match node.as_split_mut() {
                Some(split) => {
                    split.size = if size.is_finite() { size.max(0.0) } else { 0.0 };
                    split.auto_resize = false;
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    fn dockable(&self, id: &PanelId) -> bool {
        match self.panels.get(id) {
            None => {
                debug!(panel = %id, "Cannot dock unknown panel");
                false
            }
            Some(panel) if panel.node.is_some() => {
                debug!(panel = %id, "Panel is already docked");
                false
            }
            Some(_) => true,
        }
    }

    fn attach_tab(&mut self, leaf_id: NodeId, id: &PanelId, make_active: bool) -> bool {
        let Some(leaf) = self.live_mut(leaf_id).as_leaf_mut() else {
            return false;
        };
        leaf.push(id.clone(), make_active);
        if let Some(panel) = self.panels.get_mut(id) {
            panel.node = Some(leaf_id);
        }
        true
    }

    /// Turn `target` into a split: its current content moves into one child,
    /// the panel into a fresh leaf on the slot's side.
    fn split_node(&mut self, target: NodeId, id: &PanelId, slot: Slot, size: f32) -> bool {
        let Some(axis) = slot.axis() else {
            return false;
        };
        let panel_min = self
            .panels
            .get(id)
            .map(|p| p.min_size)
            .unwrap_or(Vec2::ZERO);
        if !self.fits(target, axis, panel_min) {
            debug!(panel = %id, slot = ?slot, "Refusing dock: not enough space");
            return false;
        }

        let existing = std::mem::take(&mut self.live_mut(target).kind);
        let moved = self.alloc(Node {
            parent: Some(target),
            kind: existing,
        });
        self.adopt_children(moved);

        let mut leaf = Leaf::default();
        leaf.push(id.clone(), true);
        let fresh = self.alloc(Node::leaf(Some(target), leaf));

        let primary = slot.side();
        let (first, second) = match primary {
            crate::node::Side::First => (fresh, moved),
            crate::node::Side::Second => (moved, fresh),
        };
        let size = if size.is_finite() && size > 0.0 { size } else { 0.0 };
        self.live_mut(target).kind = NodeKind::Split(Split {
            axis,
            first,
            second,
            size,
            primary,
            auto_resize: size == 0.0,
        });
        if let Some(panel) = self.panels.get_mut(id) {
            panel.node = Some(fresh);
        }
        true
    }

    /// Replace an emptied leaf's parent with the leaf's sibling subtree.
    /// The sibling keeps its shape; both the leaf and the sibling slot are
    /// freed.
    pub(crate) fn collapse(&mut self, leaf_id: NodeId) {
        let Some(parent) = self.live(leaf_id).parent else {
            return;
        };
        let Some(sibling) = self
            .live(parent)
            .as_split()
            .map(|s| if s.first == leaf_id { s.second } else { s.first })
        else {
            return;
        };

        let sibling_kind = std::mem::take(&mut self.live_mut(sibling).kind);
        self.live_mut(parent).kind = sibling_kind;
        self.adopt_children(parent);
        self.release(leaf_id);
        self.release(sibling);
        debug!(
            leaf = ?leaf_id,
            parent = ?parent,
            sibling = ?sibling,
            "Collapsed empty leaf"
        );
    }

    // ------------------------------------------------------------ constraints

    /// Minimum size of a subtree.
    ///
    /// Leaves take the per-axis maximum of their panels. Splits add their
    /// children along the split axis and take the maximum across it.
    pub fn min_size(&self, id: NodeId) -> Vec2 {
        let Some(node) = self.node(id) else {
            return Vec2::ZERO;
        };
        match &node.kind {
            NodeKind::Leaf(leaf) => leaf
                .panels
                .iter()
                .filter_map(|p| self.panels.get(p))
                .fold(Vec2::ZERO, |acc, p| acc.max(p.min_size)),
            NodeKind::Split(split) => {
                let a = self.min_size(split.first);
                let b = self.min_size(split.second);
                match split.axis {
                    Axis::Horizontal => Vec2::new(a.x + b.x, a.y.max(b.y)),
                    Axis::Vertical => Vec2::new(a.x.max(b.x), a.y + b.y),
                }
            }
        }
    }

    /// Whether splitting `target` along `axis` for a panel of `panel_min`
    /// fits the space `target` had in the last layout.
    ///
    /// The new split's minimum must fit on both axes: the two minimums side
    /// by side along `axis`, the larger of them across it. Targets that were
    /// never laid out accept any split.
    fn fits(&self, target: NodeId, axis: Axis, panel_min: Vec2) -> bool {
        let Some(extent) = self.layout.rects.get(&target) else {
            return true;
        };
        if extent.is_empty() {
            return true;
        }
        let target_min = self.min_size(target);
        let size = extent.size();
        let main = axis.main(target_min) + axis.main(panel_min);
        let cross = axis.cross(target_min).max(axis.cross(panel_min));
        main <= axis.main(size) && cross <= axis.cross(size)
    }

    // ------------------------------------------------------------- validation

    /// Check every structural invariant of the tree and registry
    pub fn validate(&self) -> Result<(), DockError> {
        let fail = |msg: String| Err(DockError::InvalidTree(msg));

        if self.live(self.root).parent.is_some() {
            return fail("root has a parent".into());
        }

        let mut seen = HashSet::new();
        let mut placed = HashSet::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                return fail(format!("node {id:?} reachable twice"));
            }
            let Some(node) = self.node(id) else {
                return fail(format!("dangling node {id:?}"));
            };
            match &node.kind {
                NodeKind::Leaf(leaf) => {
                    match (&leaf.active, leaf.panels.is_empty()) {
                        (None, false) => return fail(format!("leaf {id:?} has no active tab")),
                        (Some(_), true) => return fail(format!("empty leaf {id:?} has an active tab")),
                        (Some(active), false) if !leaf.panels.contains(active) => {
                            return fail(format!("leaf {id:?} active tab {active} not listed"))
                        }
                        _ => {}
                    }
                    if leaf.panels.is_empty() && id != self.root {
                        return fail(format!("non-root leaf {id:?} is empty"));
                    }
                    for panel_id in &leaf.panels {
                        if !placed.insert(panel_id.clone()) {
                            return fail(format!("panel {panel_id} listed twice"));
                        }
                        match self.panels.get(panel_id) {
                            Some(panel) if panel.node == Some(id) => {}
                            Some(_) => return fail(format!("panel {panel_id} back-reference mismatch")),
                            None => return fail(format!("panel {panel_id} not registered")),
                        }
                    }
                }
                NodeKind::Split(split) => {
                    if split.first == split.second {
                        return fail(format!("split {id:?} has identical children"));
                    }
                    for child in [split.first, split.second] {
                        match self.node(child) {
                            Some(c) if c.parent == Some(id) => stack.push(child),
                            Some(_) => return fail(format!("child {child:?} parent mismatch")),
                            None => return fail(format!("split {id:?} has dead child {child:?}")),
                        }
                    }
                }
            }
        }

        if seen.len() != self.node_count() {
            return fail(format!(
                "{} live nodes but only {} reachable",
                self.node_count(),
                seen.len()
            ));
        }
        for panel in self.panels.values() {
            if panel.node.is_some() && !placed.contains(panel.id()) {
                return fail(format!("panel {} points at a leaf that does not list it", panel.id()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn panel(title: &str) -> Panel<()> {
        Panel::new(title, |_, _| {})
    }

    fn dockspace_with(titles: &[&str]) -> Dockspace<()> {
        let mut dockspace = Dockspace::new();
        for title in titles {
            assert!(dockspace.add_panel(panel(title)));
        }
        dockspace
    }

    fn id(title: &str) -> PanelId {
        PanelId::from(title)
    }

    #[test]
    fn test_first_dock_fills_root() {
        let mut dockspace = dockspace_with(&["A"]);
        assert!(dockspace.is_empty());
        assert!(dockspace.dock(&id("A"), None, 0.0, false));

        let root = dockspace.node(dockspace.root()).unwrap().as_leaf().unwrap();
        assert_eq!(root.panels(), &[id("A")]);
        assert_eq!(root.active(), Some(&id("A")));
        assert_eq!(dockspace.node_count(), 1);
        dockspace.validate().unwrap();
    }

    #[test]
    fn test_dock_rejects_unknown_and_docked() {
        let mut dockspace = dockspace_with(&["A"]);
        assert!(!dockspace.dock(&id("missing"), Slot::Left, 0.0, true));
        assert!(dockspace.dock(&id("A"), None, 0.0, true));
        assert!(!dockspace.dock(&id("A"), Slot::Right, 0.0, true));
        dockspace.validate().unwrap();
    }

    #[test]
    fn test_duplicate_title_rejected() {
        let mut dockspace = dockspace_with(&["A"]);
        assert!(!dockspace.add_panel(panel("A")));
        assert!(!dockspace.dock_new(panel("A"), None, 0.0, true));
        assert_eq!(dockspace.panels().count(), 1);
    }

    #[test]
    fn test_edge_dock_splits_root() {
        let mut dockspace = dockspace_with(&["A", "B"]);
        dockspace.dock(&id("A"), None, 0.0, true);
        assert!(dockspace.dock(&id("B"), Slot::Left, 200.0, true));

        let split = dockspace.node(dockspace.root()).unwrap().as_split().unwrap().clone();
        assert_eq!(split.axis, Axis::Horizontal);
        assert_eq!(split.size, 200.0);
        assert!(!split.auto_resize);
        assert_eq!(dockspace.leaf_of(&id("B")), Some(split.first));
        assert_eq!(dockspace.leaf_of(&id("A")), Some(split.second));
        dockspace.validate().unwrap();
    }

    #[test]
    fn test_zero_size_means_auto() {
        let mut dockspace = dockspace_with(&["A", "B"]);
        dockspace.dock(&id("A"), None, 0.0, true);
        dockspace.dock(&id("B"), Slot::Bottom, 0.0, true);

        let split = dockspace.node(dockspace.root()).unwrap().as_split().unwrap();
        assert_eq!(split.axis, Axis::Vertical);
        assert!(split.auto_resize);
    }

    #[test]
    fn test_tab_dock_on_split_root_uses_first_leaf() {
        let mut dockspace = dockspace_with(&["A", "B", "C"]);
        dockspace.dock(&id("A"), None, 0.0, true);
        dockspace.dock(&id("B"), Slot::Left, 0.0, true);
        assert!(dockspace.dock(&id("C"), Slot::Tab, 0.0, false));

        assert_eq!(dockspace.leaf_of(&id("C")), dockspace.leaf_of(&id("B")));
        let leaf = dockspace.leaf_of(&id("B")).unwrap();
        let leaf = dockspace.node(leaf).unwrap().as_leaf().unwrap();
        assert_eq!(leaf.active(), Some(&id("B")));
    }

    #[test]
    fn test_dock_with_requires_docked_target() {
        let mut dockspace = dockspace_with(&["A", "B"]);
        assert!(!dockspace.dock_with(&id("B"), &id("A"), Slot::Right, 0.0, true));
        dockspace.dock(&id("A"), None, 0.0, true);
        assert!(!dockspace.dock_with(&id("A"), &id("A"), Slot::Right, 0.0, true));
        assert!(dockspace.dock_with(&id("B"), &id("A"), Slot::Right, 0.0, true));
    }

    #[test]
    fn test_undock_collapses_and_frees_two_nodes() {
        let mut dockspace = dockspace_with(&["A", "B"]);
        dockspace.dock(&id("A"), None, 0.0, true);
        dockspace.dock_with(&id("B"), &id("A"), Slot::Right, 300.0, true);
        assert_eq!(dockspace.node_count(), 3);

        assert!(dockspace.undock(&id("B")));
        assert_eq!(dockspace.node_count(), 1);
        assert_eq!(dockspace.leaf_of(&id("A")), Some(dockspace.root()));
        assert!(!dockspace.undock(&id("B")));
        dockspace.validate().unwrap();
    }

    #[test]
    fn test_collapse_splices_sibling_subtree() {
        // A | (B / C) then remove A: root should become the B/C split
        let mut dockspace = dockspace_with(&["A", "B", "C"]);
        dockspace.dock(&id("A"), None, 0.0, true);
        dockspace.dock_with(&id("B"), &id("A"), Slot::Right, 250.0, true);
        dockspace.dock_with(&id("C"), &id("B"), Slot::Bottom, 120.0, true);
        assert_eq!(dockspace.node_count(), 5);

        dockspace.undock(&id("A"));
        assert_eq!(dockspace.node_count(), 3);

        let root = dockspace.node(dockspace.root()).unwrap().as_split().unwrap();
        assert_eq!(root.axis, Axis::Vertical);
        assert_eq!(root.size, 120.0);
        assert_eq!(dockspace.leaf_of(&id("B")), Some(root.first));
        assert_eq!(dockspace.leaf_of(&id("C")), Some(root.second));
        dockspace.validate().unwrap();
    }

    #[test]
    fn test_node_slots_are_recycled() {
        let mut dockspace = dockspace_with(&["A", "B"]);
        dockspace.dock(&id("A"), None, 0.0, true);
        for _ in 0..10 {
            dockspace.dock_with(&id("B"), &id("A"), Slot::Top, 0.0, true);
            dockspace.undock(&id("B"));
        }
        assert!(dockspace.nodes.len() <= 3);
    }

    #[test]
    fn test_close_respects_confirmation() {
        let mut dockspace: Dockspace<()> = Dockspace::new();
        dockspace.dock_new(panel("A"), None, 0.0, true);
        dockspace.dock_new(panel("Locked").on_close(|| false), Slot::Right, 0.0, true);

        assert!(!dockspace.close(&id("Locked")));
        assert!(dockspace.has_dock("Locked"));

        assert!(dockspace.close(&id("A")));
        assert!(!dockspace.has_dock("A"));
        assert!(dockspace.panel(&id("A")).is_none());
        dockspace.validate().unwrap();
    }

    #[test]
    fn test_take_panel_returns_undocked_panel() {
        let mut dockspace: Dockspace<()> = Dockspace::new();
        dockspace.dock_new(panel("A"), None, 0.0, true);
        let taken = dockspace.take_panel(&id("A")).unwrap();
        assert!(!taken.is_docked());
        assert!(dockspace.is_empty());
        assert!(dockspace.take_panel(&id("A")).is_none());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut dockspace = dockspace_with(&["A", "B"]);
        dockspace.dock(&id("A"), None, 0.0, true);
        dockspace.dock(&id("B"), Slot::Top, 0.0, true);
        dockspace.clear();

        assert!(dockspace.is_empty());
        assert_eq!(dockspace.node_count(), 1);
        assert_eq!(dockspace.panels().count(), 0);
        dockspace.validate().unwrap();
    }

    #[test]
    fn test_min_size_propagation() {
        let mut dockspace: Dockspace<()> = Dockspace::new();
        dockspace.dock_new(panel("A").with_min_size(100.0, 50.0), None, 0.0, true);
        dockspace.dock_new(panel("B").with_min_size(80.0, 90.0), Slot::Right, 0.0, true);
        dockspace.dock_new(panel("C").with_min_size(10.0, 10.0), Slot::Tab, 0.0, true);

        assert_eq!(dockspace.min_size(dockspace.root()), Vec2::new(180.0, 90.0));
    }

    #[test]
    fn test_set_active_keeps_shape() {
        let mut dockspace = dockspace_with(&["A", "B", "C"]);
        dockspace.dock(&id("A"), Slot::Tab, 0.0, true);
        dockspace.dock(&id("B"), Slot::Tab, 0.0, true);
        dockspace.dock(&id("C"), Slot::Tab, 0.0, true);

        let before = dockspace.node_count();
        assert!(dockspace.set_active(&id("A")));
        let root = dockspace.node(dockspace.root()).unwrap().as_leaf().unwrap();
        assert_eq!(root.active(), Some(&id("A")));
        assert_eq!(root.panels().len(), 3);
        assert_eq!(dockspace.node_count(), before);
    }

    fn laid_out(dockspace: &mut Dockspace<()>, width: f32, height: f32) {
        dockspace.layout = dockspace.compute_layout(Rect::from_min_size(Vec2::ZERO, Vec2::new(width, height)));
    }

    #[test]
    fn test_edge_dock_checks_cross_axis_minimum() {
        let mut dockspace: Dockspace<()> = Dockspace::new();
        dockspace.dock_new(panel("A"), None, 0.0, true);
        dockspace.add_panel(panel("Tall").with_min_size(100.0, 300.0));
        dockspace.add_panel(panel("Short").with_min_size(100.0, 150.0));
        laid_out(&mut dockspace, 600.0, 200.0);

        // Plenty of width, but the split would need 300 pixels of height
        assert!(!dockspace.dock_with(&id("Tall"), &id("A"), Slot::Right, 0.0, true));
        assert!(!dockspace.dock_with(&id("Tall"), &id("A"), Slot::Bottom, 0.0, true));
        assert_eq!(dockspace.node_count(), 1);
        assert!(!dockspace.has_dock("Tall"));

        assert!(dockspace.dock_with(&id("Short"), &id("A"), Slot::Right, 0.0, true));
        dockspace.validate().unwrap();
    }

    #[test]
    fn test_redock_falls_back_to_tab_when_edge_stops_fitting() {
        let mut dockspace: Dockspace<()> = Dockspace::new();
        dockspace.dock_new(panel("A"), None, 0.0, true);
        dockspace.dock_new(panel("B").with_min_size(100.0, 0.0), Slot::Right, 0.0, true);
        laid_out(&mut dockspace, 800.0, 600.0);
        let a_leaf = dockspace.leaf_of(&id("A")).unwrap();

        // A's leaf has room, but once B leaves, A moves into a root that does not
        let root = dockspace.root();
        dockspace
            .layout
            .rects
            .insert(root, Rect::from_min_size(Vec2::ZERO, Vec2::new(50.0, 600.0)));

        assert!(dockspace.redock(&id("B"), a_leaf, Slot::Right));
        let leaf = dockspace.node(dockspace.root()).unwrap().as_leaf().unwrap();
        assert_eq!(leaf.panels(), &[id("A"), id("B")]);
        assert_eq!(leaf.active(), Some(&id("B")));
        dockspace.validate().unwrap();
    }
}
