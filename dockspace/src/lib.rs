//! Docking panel engine
//!
//! This crate arranges named panels inside a window as a binary split tree
//! with tab groups in the leaves. Each frame it lays the tree out, runs the
//! drag/drop and tab gestures, and paints headers and drop feedback through
//! the [`DockUi`] trait, so any immediate-mode toolkit can host it. It also
//! coordinates several windows so panels can be dragged between them.

pub mod backend;
pub mod config;
pub mod dockspace;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod host;
pub mod interaction;
pub mod layout;
pub mod node;
pub mod panel;
pub mod persistence;
pub mod schedule;
pub mod testing;
pub mod ui;

pub use config::{DockColors, DockStyle, TitleBarMode};
pub use dockspace::Dockspace;
pub use error::DockError;
pub use geometry::Rect;
pub use host::{DockHost, DragClaim, HostEvent, HostedWindow, DEFAULT_MAX_WINDOWS};
pub use interaction::{DockAction, DockFrame, DropTarget, FrameOutcome, ReleasedPanel};
pub use layout::{drop_preview, drop_slot, Layout, LeafLayout, SplitterLayout, TabLayout};
pub use node::{Axis, Leaf, Node, NodeId, NodeKind, Side, Slot, Split};
pub use panel::{Panel, PanelId};
pub use persistence::{LayoutSnapshot, SnapshotNode, LAYOUT_VERSION};
pub use schedule::FrameSchedule;
pub use ui::{Color, DockUi, Layer, PointerState};

/// Default log filter when neither `RUST_LOG` nor a configured filter is set
pub const DEFAULT_LOG_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn";

/// Initialize logging.
///
/// `RUST_LOG` wins over `filter`, which wins over [`DEFAULT_LOG_FILTER`].
/// Calling this more than once is harmless.
pub fn init_logging(filter: Option<&str>) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let fallback = filter.unwrap_or(DEFAULT_LOG_FILTER).to_string();
    let result = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
    if result.is_err() {
        tracing::debug!("Logging already initialized");
    }
}
