//! Dear ImGui host for the studio
//!
//! This crate opens the studio's OS windows, gives each one its own imgui
//! context and wgpu surface, and drives the shared [`dockspace::DockHost`]
//! so panels can be docked, tabbed and dragged between windows.

pub mod editor_window;
pub mod error;
pub mod gui_context;
pub mod panel_state;
pub mod panels;
pub mod render_context;
pub mod settings;
pub mod shared_state;
pub mod stage;
pub mod window_manager;
pub mod window_registry;

pub use editor_window::{EditorWindow, MenuAction};
pub use error::EditorError;
pub use panel_state::{PanelCatalog, PanelKind};
pub use settings::EditorSettings;
pub use window_registry::WindowRegistry;
