//! Saving and restoring dock layouts
//!
//! A snapshot records the tree shape and which panel titles sit in which
//! leaf. Panels themselves (and their draw callbacks) are owned by the
//! application, so restoring only rearranges panels that are registered.

use crate::dockspace::Dockspace;
use crate::error::DockError;
use crate::node::{Axis, Leaf, Node, NodeId, NodeKind, Side, Split};
use crate::panel::PanelId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

/// Current snapshot format version
pub const LAYOUT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SnapshotNode {
    Leaf {
        panels: Vec<PanelId>,
        #[serde(default)]
        active: Option<PanelId>,
    },
    Split {
        axis: Axis,
        size: f32,
        primary: Side,
        #[serde(default)]
        auto_resize: bool,
        first: Box<SnapshotNode>,
        second: Box<SnapshotNode>,
    },
}

/// Serializable copy of a dockspace's arrangement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub version: u32,
    pub root: SnapshotNode,
}

impl LayoutSnapshot {
    /// Write the snapshot as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), DockError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        info!("Saved dock layout to {:?}", path.as_ref());
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DockError> {
        let content = std::fs::read_to_string(&path)?;
        let snapshot: Self = serde_json::from_str(&content)?;
        if snapshot.version != LAYOUT_VERSION {
            warn!(version = snapshot.version, "Loading dock layout with a different version");
        }
        info!("Loaded dock layout from {:?}", path.as_ref());
        Ok(snapshot)
    }

    /// Every panel title mentioned by the snapshot
    pub fn panel_ids(&self) -> Vec<PanelId> {
        let mut out = Vec::new();
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            match node {
                SnapshotNode::Leaf { panels, .. } => out.extend(panels.iter().cloned()),
                SnapshotNode::Split { first, second, .. } => {
                    stack.push(second);
                    stack.push(first);
                }
            }
        }
        out
    }
}

impl<U: ?Sized> Dockspace<U> {
    /// Capture the current arrangement
    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            version: LAYOUT_VERSION,
            root: self.snapshot_node(self.root()),
        }
    }

    fn snapshot_node(&self, id: NodeId) -> SnapshotNode {
        match self.node(id).map(Node::kind) {
            Some(NodeKind::Split(split)) => SnapshotNode::Split {
                axis: split.axis,
                size: split.size,
                primary: split.primary,
                auto_resize: split.auto_resize,
                first: Box::new(self.snapshot_node(split.first)),
                second: Box::new(self.snapshot_node(split.second)),
            },
            Some(NodeKind::Leaf(leaf)) => SnapshotNode::Leaf {
                panels: leaf.panels.clone(),
                active: leaf.active.clone(),
            },
            None => SnapshotNode::Leaf {
                panels: Vec::new(),
                active: None,
            },
        }
    }

    /// Rearrange registered panels to match `snapshot`.
    ///
    /// Titles that are not registered (or appear twice) are skipped and
    /// leaves left empty collapse. Registered panels the snapshot does not
    /// mention stay undocked. Returns the number of panels placed.
    pub fn restore(&mut self, snapshot: &LayoutSnapshot) -> usize {
        self.undock_all();
        let mut placed = HashSet::new();
        let root = self.root();
        self.build(root, None, &snapshot.root, &mut placed);
        self.prune(root);

        debug_assert!(self.validate().is_ok(), "restored layout is inconsistent");
        info!(panels = placed.len(), "Restored dock layout");
        placed.len()
    }

    fn build(&mut self, id: NodeId, parent: Option<NodeId>, source: &SnapshotNode, placed: &mut HashSet<PanelId>) {
        match source {
            SnapshotNode::Leaf { panels, active } => {
                let mut leaf = Leaf::default();
                for panel in panels {
                    if self.panel(panel).is_none() || !placed.insert(panel.clone()) {
                        warn!(panel = %panel, "Skipping unavailable panel in layout");
                        continue;
                    }
                    leaf.push(panel.clone(), false);
                    if let Some(p) = self.panel_mut(panel) {
                        p.node = Some(id);
                    }
                }
                if let Some(active) = active.as_ref().filter(|a| leaf.contains(a)) {
                    leaf.active = Some(active.clone());
                }
                *self.live_mut(id) = Node::leaf(parent, leaf);
            }
            SnapshotNode::Split {
                axis,
                size,
                primary,
                auto_resize,
                first,
                second,
            } => {
                let first_id = self.alloc_empty(id);
                let second_id = self.alloc_empty(id);
                let size = if size.is_finite() { size.max(0.0) } else { 0.0 };
                *self.live_mut(id) = Node {
                    parent,
                    kind: NodeKind::Split(Split {
                        axis: *axis,
                        first: first_id,
                        second: second_id,
                        size,
                        primary: *primary,
                        auto_resize: *auto_resize || size == 0.0,
                    }),
                };
                self.build(first_id, Some(id), first, placed);
                self.build(second_id, Some(id), second, placed);
            }
        }
    }

    /// Collapse empty leaves bottom-up
    fn prune(&mut self, id: NodeId) {
        let Some((first, second)) = self.node(id).and_then(Node::children) else {
            return;
        };
        self.prune(first);
        self.prune(second);

        // Pruning children may have spliced them into other shapes; re-read.
        let Some((first, second)) = self.node(id).and_then(Node::children) else {
            return;
        };
        for child in [first, second] {
            let empty = self
                .node(child)
                .and_then(Node::as_leaf)
                .map(Leaf::is_empty)
                .unwrap_or(false);
            if empty {
                self.collapse(child);
                // Parent now holds the sibling's content; prune it again.
                self.prune(id);
                return;
            }
        }
    }
}
