//! Panels: the logical content areas hosted by a dockspace

use crate::geometry::Rect;
use crate::node::NodeId;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a panel; it is the panel's title
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PanelId(pub String);

impl PanelId {
    pub fn new(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PanelId {
    fn from(title: &str) -> Self {
        Self(title.to_string())
    }
}

/// Draw callback invoked once per visible frame with the content area
pub type DrawFn<U> = Box<dyn FnMut(&U, Rect)>;

/// Close confirmation; returning `false` vetoes the close
pub type CloseFn = Box<dyn FnMut() -> bool>;

/// A single docked content area.
///
/// `U` is the host toolkit's per-frame UI handle passed to the draw
/// callback.
pub struct Panel<U: ?Sized> {
    id: PanelId,
    /// Smallest content size the panel accepts
    pub min_size: Vec2,
    /// Show a close button on the panel's tab
    pub closable: bool,
    /// Allow dragging the panel out of its leaf
    pub draggable: bool,
    /// Set while a drag gesture carries this panel
    pub dragging: bool,
    /// Content size from the last frame the panel was laid out
    pub last_size: Vec2,
    draw: DrawFn<U>,
    on_close: Option<CloseFn>,
    pub(crate) node: Option<NodeId>,
}

impl<U: ?Sized> Panel<U> {
    /// Create a panel with the given title and draw callback
    pub fn new(title: impl Into<String>, draw: impl FnMut(&U, Rect) + 'static) -> Self {
        Self {
            id: PanelId(title.into()),
            min_size: Vec2::ZERO,
            closable: true,
            draggable: true,
            dragging: false,
            last_size: Vec2::ZERO,
            draw: Box::new(draw),
            on_close: None,
            node: None,
        }
    }

    pub fn with_min_size(mut self, width: f32, height: f32) -> Self {
        self.min_size = Vec2::new(width.max(0.0), height.max(0.0));
        self
    }

    pub fn closable(mut self, closable: bool) -> Self {
        self.closable = closable;
        self
    }

    pub fn draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    /// Install a close confirmation callback
    pub fn on_close(mut self, confirm: impl FnMut() -> bool + 'static) -> Self {
        self.on_close = Some(Box::new(confirm));
        self
    }

    pub fn id(&self) -> &PanelId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.id.0
    }

    /// Leaf currently holding this panel, if docked
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn is_docked(&self) -> bool {
        self.node.is_some()
    }

    pub(crate) fn draw(&mut self, ui: &U, area: Rect) {
        (self.draw)(ui, area);
    }

    /// Ask the confirmation callback; panels without one always close
    pub(crate) fn confirm_close(&mut self) -> bool {
        match self.on_close.as_mut() {
            Some(confirm) => confirm(),
            None => true,
        }
    }
}

impl<U: ?Sized> fmt::Debug for Panel<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Panel")
            .field("id", &self.id)
            .field("min_size", &self.min_size)
            .field("closable", &self.closable)
            .field("draggable", &self.draggable)
            .field("dragging", &self.dragging)
            .field("node", &self.node)
            .finish_non_exhaustive()
    }
}
