//! Editor UI panels
//!
//! This module contains the content drawn inside each docked panel: the
//! outliner, properties, viewport, timeline and node graph.

pub mod node_graph;
pub mod outliner;
pub mod properties;
pub mod timeline;
pub mod viewport;

pub use node_graph::{draw_node_graph, NodeGraphState};
pub use outliner::draw_outliner;
pub use properties::draw_properties;
pub use timeline::{draw_timeline, TimelineState};
pub use viewport::{draw_viewport, ViewportView};
