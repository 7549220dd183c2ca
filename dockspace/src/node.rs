//! Split tree nodes
//!
//! A node is either a leaf holding a tab group of panels or a binary split
//! of screen space. The two shapes are separate variants, so a node can
//! never hold panels and children at the same time.

use crate::panel::PanelId;
use serde::{Deserialize, Serialize};

slotmap::new_key_type! {
    /// Key of a node in a dockspace's node map. Keys of removed nodes never
    /// resolve again, even after their slot is reused.
    pub struct NodeId;
}

/// Split orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Children side by side (first = left, second = right)
    Horizontal,
    /// Children stacked (first = top, second = bottom)
    Vertical,
}

impl Axis {
    pub fn perpendicular(&self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    /// Component of `v` along this axis
    pub fn main(&self, v: glam::Vec2) -> f32 {
        match self {
            Axis::Horizontal => v.x,
            Axis::Vertical => v.y,
        }
    }

    /// Component of `v` across this axis
    pub fn cross(&self, v: glam::Vec2) -> f32 {
        self.perpendicular().main(v)
    }
}

/// Which child of a split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub fn other(&self) -> Self {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }
}

/// Where a panel attaches relative to existing content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    Left,
    Right,
    Top,
    Bottom,
    /// Join the target leaf as another tab
    Tab,
}

impl Slot {
    /// Split axis for edge slots, `None` for tabs
    pub fn axis(&self) -> Option<Axis> {
        match self {
            Slot::Left | Slot::Right => Some(Axis::Horizontal),
            Slot::Top | Slot::Bottom => Some(Axis::Vertical),
            Slot::Tab => None,
        }
    }

    /// Side of the new split that receives the docked panel
    pub fn side(&self) -> Side {
        match self {
            Slot::Left | Slot::Top => Side::First,
            Slot::Right | Slot::Bottom | Slot::Tab => Side::Second,
        }
    }

    pub fn is_edge(&self) -> bool {
        self.axis().is_some()
    }
}

/// A tab group: zero or more panels, one of them active
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Leaf {
    pub(crate) panels: Vec<PanelId>,
    pub(crate) active: Option<PanelId>,
}

impl Leaf {
    pub fn panels(&self) -> &[PanelId] {
        &self.panels
    }

    pub fn active(&self) -> Option<&PanelId> {
        self.active.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn contains(&self, id: &PanelId) -> bool {
        self.panels.contains(id)
    }

    /// Append a panel. The first panel of a leaf is always active.
    pub(crate) fn push(&mut self, id: PanelId, make_active: bool) {
        if make_active || self.active.is_none() {
            self.active = Some(id.clone());
        }
        self.panels.push(id);
    }

    /// Remove a panel, handing activity to its neighbour when needed
    pub(crate) fn remove(&mut self, id: &PanelId) -> bool {
        let Some(index) = self.panels.iter().position(|p| p == id) else {
            return false;
        };
        self.panels.remove(index);

        if self.active.as_ref() == Some(id) {
            self.active = if self.panels.is_empty() {
                None
            } else {
                Some(self.panels[index.min(self.panels.len() - 1)].clone())
            };
        }
        true
    }
}

/// A binary partition of screen space
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub axis: Axis,
    pub first: NodeId,
    pub second: NodeId,
    /// Pixel size of the primary child along `axis`
    pub size: f32,
    /// The child `size` applies to
    pub primary: Side,
    /// Primary child tracks half the space instead of a fixed size
    pub auto_resize: bool,
}

impl Split {
    pub fn child(&self, side: Side) -> NodeId {
        match side {
            Side::First => self.first,
            Side::Second => self.second,
        }
    }

    pub fn side_of(&self, child: NodeId) -> Option<Side> {
        if child == self.first {
            Some(Side::First)
        } else if child == self.second {
            Some(Side::Second)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Leaf(Leaf),
    Split(Split),
}

impl Default for NodeKind {
    fn default() -> Self {
        NodeKind::Leaf(Leaf::default())
    }
}

/// A node in the split tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: NodeKind,
}

impl Node {
    pub(crate) fn leaf(parent: Option<NodeId>, leaf: Leaf) -> Self {
        Self {
            parent,
            kind: NodeKind::Leaf(leaf),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match &self.kind {
            NodeKind::Leaf(leaf) => Some(leaf),
            NodeKind::Split(_) => None,
        }
    }

    pub(crate) fn as_leaf_mut(&mut self) -> Option<&mut Leaf> {
        match &mut self.kind {
            NodeKind::Leaf(leaf) => Some(leaf),
            NodeKind::Split(_) => None,
        }
    }

    pub fn as_split(&self) -> Option<&Split> {
        match &self.kind {
            NodeKind::Split(split) => Some(split),
            NodeKind::Leaf(_) => None,
        }
    }

    pub(crate) fn as_split_mut(&mut self) -> Option<&mut Split> {
        match &mut self.kind {
            NodeKind::Split(split) => Some(split),
            NodeKind::Leaf(_) => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    /// Child ids of a split, empty for leaves
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        self.as_split().map(|s| (s.first, s.second))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_geometry() {
        assert_eq!(Slot::Left.axis(), Some(Axis::Horizontal));
        assert_eq!(Slot::Bottom.axis(), Some(Axis::Vertical));
        assert_eq!(Slot::Tab.axis(), None);
        assert_eq!(Slot::Left.side(), Side::First);
        assert_eq!(Slot::Right.side(), Side::Second);
        assert!(!Slot::Tab.is_edge());
    }

    #[test]
    fn test_leaf_first_panel_is_active() {
        let mut leaf = Leaf::default();
        leaf.push(PanelId::from("A"), false);
        leaf.push(PanelId::from("B"), false);
        assert_eq!(leaf.active(), Some(&PanelId::from("A")));

        leaf.push(PanelId::from("C"), true);
        assert_eq!(leaf.active(), Some(&PanelId::from("C")));
    }

    #[test]
    fn test_leaf_remove_moves_activity_to_neighbour() {
        let mut leaf = Leaf::default();
        for title in ["A", "B", "C"] {
            leaf.push(PanelId::from(title), true);
        }

        // Removing the active last tab activates the new last tab
        assert!(leaf.remove(&PanelId::from("C")));
        assert_eq!(leaf.active(), Some(&PanelId::from("B")));

        // Removing an inactive tab leaves activity alone
        assert!(leaf.remove(&PanelId::from("A")));
        assert_eq!(leaf.active(), Some(&PanelId::from("B")));

        assert!(leaf.remove(&PanelId::from("B")));
        assert_eq!(leaf.active(), None);
        assert!(!leaf.remove(&PanelId::from("B")));
    }
}
