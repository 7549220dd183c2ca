//! Editor error types

use dockspace::DockError;

/// Errors raised while creating windows, GPU resources or GUI contexts
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("No suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("Failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("Failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("Window platform error: {0}")]
    Platform(#[from] winit::error::ExternalError),

    #[error("Another GUI context is already current")]
    ContextBusy,

    #[error("GUI context for this window is missing")]
    ContextMissing,

    #[error("Maximum window limit reached: {0}")]
    WindowLimit(usize),

    #[error("Cannot destroy the main window")]
    MainWindow,

    #[error("Unknown window: {0:?}")]
    UnknownWindow(winit::window::WindowId),

    #[error(transparent)]
    Dock(#[from] DockError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
