//! Per-dockspace interaction state carried between frames

use crate::dockspace::Dockspace;
use crate::geometry::Rect;
use crate::node::{NodeId, Slot};
use crate::panel::PanelId;
use glam::Vec2;
use tracing::debug;

/// The single gesture in flight for a dockspace
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DockAction {
    #[default]
    Null,
    /// Pointer pressed on a tab, not yet past the drag threshold
    Undock { panel: PanelId, origin: Vec2 },
    /// A panel is being dragged
    Drag { panel: PanelId },
    /// Pointer pressed on a close button
    Close { panel: PanelId },
    /// Splitter band being dragged
    Resize { node: NodeId },
}

impl DockAction {
    /// Panel carried by the action, if any
    pub fn panel(&self) -> Option<&PanelId> {
        match self {
            DockAction::Undock { panel, .. } | DockAction::Drag { panel } | DockAction::Close { panel } => {
                Some(panel)
            }
            DockAction::Null | DockAction::Resize { .. } => None,
        }
    }
}

/// Leaf and slot a dragged panel would land in
#[derive(Debug, Clone, PartialEq)]
pub struct DropTarget {
    pub node: NodeId,
    pub slot: Slot,
    pub preview: Rect,
}

/// Interaction context passed into every frame of one dockspace
#[derive(Debug, Clone, Default)]
pub struct DockFrame {
    pub(crate) action: DockAction,
    pub(crate) hover: Option<DropTarget>,
}

impl DockFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn action(&self) -> &DockAction {
        &self.action
    }

    pub fn hover(&self) -> Option<&DropTarget> {
        self.hover.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.action == DockAction::Null
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.action, DockAction::Drag { .. })
    }

    /// Abort the gesture in flight and clear every drag flag
    pub fn cancel<U: ?Sized>(&mut self, dockspace: &mut Dockspace<U>) {
        if !self.is_idle() {
            debug!(action = ?self.action, "Cancelled dock action");
        }
        self.action = DockAction::Null;
        self.hover = None;
        for id in dockspace.panel_ids() {
            if let Some(panel) = dockspace.panel_mut(&id) {
                panel.dragging = false;
            }
        }
    }
}

/// A panel released outside every leaf of its dockspace
#[derive(Debug, Clone, PartialEq)]
pub struct ReleasedPanel {
    pub panel: PanelId,
    /// Pointer position in the window's coordinates
    pub position: Vec2,
}

/// What happened during one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutcome {
    /// The tree changed shape or activity
    pub changed: bool,
    pub activated: Option<PanelId>,
    pub drag_started: Option<PanelId>,
    pub redocked: Option<PanelId>,
    pub released_outside: Option<ReleasedPanel>,
    pub closed: Vec<PanelId>,
}
