//! Per-window wgpu surfaces

use crate::error::EditorError;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use wgpu::{Instance, Surface, SurfaceConfiguration};
use winit::dpi::PhysicalSize;
use winit::window::{Window, WindowId};

pub struct WindowData {
    pub window: Arc<Window>,
    pub surface: Surface<'static>,
    pub surface_config: SurfaceConfiguration,
}

pub struct WindowManager {
    windows: HashMap<WindowId, WindowData>,
    main_window_id: WindowId,
    instance: Arc<Instance>,
    device: Arc<wgpu::Device>,
    max_windows: usize,
}

impl WindowManager {
    /// Take over the main window and its already created surface
    pub fn new(
        main_window: Arc<Window>,
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        instance: Arc<Instance>,
        device: Arc<wgpu::Device>,
        max_windows: usize,
    ) -> Self {
        let main_window_id = main_window.id();
        surface.configure(&device, &surface_config);

        let mut windows = HashMap::new();
        windows.insert(
            main_window_id,
            WindowData {
                window: main_window,
                surface,
                surface_config,
            },
        );

        info!(window_id = ?main_window_id, max_windows, "Created window manager with main window");

        Self {
            windows,
            main_window_id,
            instance,
            device,
            max_windows: max_windows.max(1),
        }
    }

    /// Register a secondary window, configuring its surface
    pub fn create_window(
        &mut self,
        window: Arc<Window>,
        surface: Surface<'static>,
        config: SurfaceConfiguration,
    ) -> Result<WindowId, EditorError> {
        if self.windows.len() >= self.max_windows {
            warn!("Maximum window limit reached: {}", self.max_windows);
            return Err(EditorError::WindowLimit(self.max_windows));
        }

        let window_id = window.id();
        surface.configure(&self.device, &config);

        self.windows.insert(
            window_id,
            WindowData {
                window,
                surface,
                surface_config: config,
            },
        );

        info!(window_id = ?window_id, "Created new window");
        Ok(window_id)
    }

    /// Create an unconfigured surface, used to pick a configuration before
    /// the window is registered
    pub fn create_surface(&self, window: Arc<Window>) -> Result<Surface<'static>, EditorError> {
        Ok(self.instance.create_surface(window)?)
    }

    pub fn destroy_window(&mut self, window_id: WindowId) -> Result<(), EditorError> {
        if window_id == self.main_window_id {
            return Err(EditorError::MainWindow);
        }

        if self.windows.remove(&window_id).is_some() {
            info!(window_id = ?window_id, "Destroyed window");
            Ok(())
        } else {
            warn!(window_id = ?window_id, "Attempted to destroy non-existent window");
            Err(EditorError::UnknownWindow(window_id))
        }
    }

    pub fn get_window(&self, window_id: WindowId) -> Option<&WindowData> {
        self.windows.get(&window_id)
    }

    pub fn main_window_id(&self) -> WindowId {
        self.main_window_id
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    pub fn max_windows(&self) -> usize {
        self.max_windows
    }

    pub fn resize_window(&mut self, window_id: WindowId, new_size: PhysicalSize<u32>) {
        if let Some(window_data) = self.windows.get_mut(&window_id) {
            if new_size.width > 0 && new_size.height > 0 {
                window_data.surface_config.width = new_size.width;
                window_data.surface_config.height = new_size.height;
                window_data
                    .surface
                    .configure(&self.device, &window_data.surface_config);

                debug!(
                    window_id = ?window_id,
                    width = new_size.width,
                    height = new_size.height,
                    "Resized window"
                );
            }
        }
    }

    /// Re-apply the current configuration after a lost or outdated surface
    pub fn reconfigure(&self, window_id: WindowId) {
        if let Some(window_data) = self.windows.get(&window_id) {
            window_data
                .surface
                .configure(&self.device, &window_data.surface_config);
        }
    }

    pub fn is_window_minimized(&self, window_id: WindowId) -> bool {
        if let Some(window_data) = self.windows.get(&window_id) {
            let size = window_data.window.inner_size();
            size.width == 0 || size.height == 0
        } else {
            false
        }
    }
}
