//! All studio windows and the per-frame loop over them
//!
//! The registry owns the GPU context, the surfaces, one [`EditorWindow`]
//! per OS window and the [`DockHost`] holding every window's dockspace.
//! Each frame it resolves panel hand-offs first (opening or closing OS
//! windows as needed) and then lets every live window draw once.

use crate::editor_window::{EditorWindow, MenuAction};
use crate::error::EditorError;
use crate::panel_state::PanelCatalog;
use crate::render_context::RenderContext;
use crate::settings::EditorSettings;
use crate::shared_state::{create_shared_state, with_state};
use crate::stage::Stage;
use crate::window_manager::WindowManager;
use dockspace::{DockHost, HostEvent, PanelId};
use glam::Vec2;
use imgui::Ui;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use winit::dpi::{LogicalPosition, LogicalSize};
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

pub struct WindowRegistry {
    render_context: RenderContext,
    windows: WindowManager,
    editor_windows: HashMap<WindowId, EditorWindow>,
    host: DockHost<WindowId, Ui>,
    catalog: PanelCatalog,
    settings: EditorSettings,
    /// Style of the last window that drew, copied into the next one
    last_style: Option<imgui::Style>,
    last_frame: Instant,
    exit_requested: bool,
}

impl WindowRegistry {
    /// Open the main window with the saved layout, or the default one
    pub fn new(event_loop: &ActiveEventLoop, settings: EditorSettings) -> Result<Self, EditorError> {
        let (width, height) = settings.windows.size;
        let attributes = Window::default_attributes()
            .with_title(settings.windows.title.clone())
            .with_inner_size(LogicalSize::new(width, height));
        let window = Arc::new(event_loop.create_window(attributes)?);

        let instance = Arc::new(wgpu::Instance::new(&wgpu::InstanceDescriptor::default()));
        let surface = instance.create_surface(Arc::clone(&window))?;
        let render_context = pollster::block_on(RenderContext::new(Arc::clone(&instance), Some(&surface)))?;

        let size = window.inner_size();
        let surface_config = render_context.create_surface_configuration(&surface, size.width, size.height);
        let format = surface_config.format;
        let windows = WindowManager::new(
            Arc::clone(&window),
            surface,
            surface_config,
            instance,
            Arc::clone(&render_context.device),
            settings.windows.max_windows,
        );

        let main = EditorWindow::new(Arc::clone(&window), &render_context, format, true)?;
        let main_id = main.id();

        let catalog = PanelCatalog::new(create_shared_state(Stage::demo()));
        let mut host = DockHost::new(main_id, catalog.default_layout(settings.dock.clone()), main.screen_bounds())
            .with_max_windows(settings.windows.max_windows);
        if settings.layout_path.exists() {
            match catalog.load_layout(&mut host, &settings.layout_path) {
                Ok(placed) => info!(placed, path = ?settings.layout_path, "Restored saved layout"),
                Err(e) => warn!("Failed to load layout from {:?}: {}", settings.layout_path, e),
            }
        }

        let mut editor_windows = HashMap::new();
        editor_windows.insert(main_id, main);
        info!(window_id = ?main_id, "Studio main window ready");

        Ok(Self {
            render_context,
            windows,
            editor_windows,
            host,
            catalog,
            settings,
            last_style: None,
            last_frame: Instant::now(),
            exit_requested: false,
        })
    }

    pub fn main_window_id(&self) -> WindowId {
        self.windows.main_window_id()
    }

    pub fn window_count(&self) -> usize {
        self.editor_windows.len()
    }

    pub fn wants_exit(&self) -> bool {
        self.exit_requested
    }

    /// Route a winit event to its window
    pub fn handle_window_event(&mut self, window_id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                if window_id == self.main_window_id() {
                    info!("Main window close requested");
                    self.exit_requested = true;
                } else {
                    self.destroy_window(window_id);
                }
                return;
            }
            WindowEvent::Resized(size) => {
                self.windows.resize_window(window_id, *size);
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(editor_window) = self.editor_windows.get(&window_id) {
                    let size = editor_window.window.inner_size();
                    self.windows.resize_window(window_id, size);
                }
            }
            WindowEvent::Focused(true) => {
                self.host.focus(&window_id);
            }
            _ => {}
        }

        if let Some(editor_window) = self.editor_windows.get_mut(&window_id) {
            editor_window.queue_event(event);
        }
    }

    /// Run one frame across every window
    pub fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        with_state(self.catalog.shared_state(), |state| state.timeline.advance(dt));

        for (id, editor_window) in &self.editor_windows {
            if let Err(e) = self.host.set_bounds(id, editor_window.screen_bounds()) {
                debug!("Skipping bounds update: {}", e);
            }
        }

        for event in self.host.begin_frame() {
            self.handle_host_event(event_loop, event);
        }

        let closed_panels = PanelCatalog::closed_panels(&self.host);
        let mut actions = Vec::new();
        for window_id in self.host.window_keys().to_vec() {
            let Some(editor_window) = self.editor_windows.get_mut(&window_id) else {
                continue;
            };
            match editor_window.frame(
                &mut self.host,
                &self.render_context,
                &self.windows,
                self.last_style.as_ref(),
                &closed_panels,
            ) {
                Ok(Some(frame)) => {
                    self.last_style = Some(frame.style);
                    actions.extend(frame.menu);
                }
                Ok(None) => {}
                Err(e) => warn!(window_id = ?window_id, "Frame failed: {}", e),
            }
        }

        for action in actions {
            self.apply_menu_action(action);
        }
        self.drop_orphaned_windows();

        if self.exit_requested {
            self.shutdown();
            event_loop.exit();
        }
    }

    fn handle_host_event(&mut self, event_loop: &ActiveEventLoop, event: HostEvent<WindowId>) {
        match event {
            HostEvent::Transferred { panel, from, to } => {
                debug!(panel = %panel, from = ?from, to = ?to, "Panel transferred");
                if let Some(target) = self.editor_windows.get(&to) {
                    target.window.focus_window();
                }
            }
            HostEvent::SpawnRequested { panel, from, screen_pos } => {
                if let Err(e) = self.spawn_window(event_loop, &panel, from, screen_pos) {
                    warn!(panel = %panel, "Failed to open window for panel: {}", e);
                }
            }
            HostEvent::Cancelled { panel, from } => {
                debug!(panel = %panel, from = ?from, "Panel drop cancelled");
            }
            HostEvent::WindowEmptied { window } => {
                self.destroy_window(window);
            }
        }
    }

    /// Open an OS window at `screen_pos` and move `panel` into it
    fn spawn_window(
        &mut self,
        event_loop: &ActiveEventLoop,
        panel: &PanelId,
        from: WindowId,
        screen_pos: Vec2,
    ) -> Result<(), EditorError> {
        if self.windows.window_count() >= self.windows.max_windows() {
            return Err(EditorError::WindowLimit(self.windows.max_windows()));
        }

        let (width, height) = self.settings.windows.detached_size;
        let attributes = Window::default_attributes()
            .with_title(panel.as_str())
            .with_inner_size(LogicalSize::new(width, height))
            .with_position(LogicalPosition::new(screen_pos.x - 20.0, screen_pos.y - 10.0));
        let window = Arc::new(event_loop.create_window(attributes)?);

        let surface = self.windows.create_surface(Arc::clone(&window))?;
        let size = window.inner_size();
        let config = self
            .render_context
            .create_surface_configuration(&surface, size.width, size.height);
        let format = config.format;
        let window_id = self.windows.create_window(Arc::clone(&window), surface, config)?;

        let editor_window = match EditorWindow::new(window, &self.render_context, format, false) {
            Ok(editor_window) => editor_window,
            Err(e) => {
                let _ = self.windows.destroy_window(window_id);
                return Err(e);
            }
        };
        if let Err(e) = self
            .host
            .detach_into(window_id, editor_window.screen_bounds(), &from, panel)
        {
            let _ = self.windows.destroy_window(window_id);
            return Err(e.into());
        }

        self.editor_windows.insert(window_id, editor_window);
        info!(panel = %panel, window_id = ?window_id, "Opened window for detached panel");
        Ok(())
    }

    /// Close a secondary window; its panels return to the main window
    fn destroy_window(&mut self, window_id: WindowId) {
        if window_id == self.main_window_id() {
            return;
        }
        if self.host.contains(&window_id) {
            if let Err(e) = self.host.close_window(&window_id) {
                warn!(window_id = ?window_id, "Failed to close dock window: {}", e);
            }
        }
        if let Err(e) = self.windows.destroy_window(window_id) {
            debug!("{}", e);
        }
        self.editor_windows.remove(&window_id);
    }

    /// Destroy OS windows whose dockspace the host no longer has
    fn drop_orphaned_windows(&mut self) {
        let orphaned: Vec<WindowId> = self
            .editor_windows
            .keys()
            .filter(|id| !self.host.contains(id))
            .copied()
            .collect();
        for window_id in orphaned {
            self.destroy_window(window_id);
        }
    }

    fn apply_menu_action(&mut self, action: MenuAction) {
        let result = match action {
            MenuAction::SaveLayout => PanelCatalog::save_layout(&self.host, &self.settings.layout_path),
            MenuAction::SaveLayoutAs => match layout_dialog().save_file() {
                Some(path) => PanelCatalog::save_layout(&self.host, &path).map(|()| self.remember_layout_path(path)),
                None => Ok(()),
            },
            MenuAction::LoadLayout => self
                .catalog
                .load_layout(&mut self.host, &self.settings.layout_path)
                .map(|_| ()),
            MenuAction::LoadLayoutFrom => match layout_dialog().pick_file() {
                Some(path) => self
                    .catalog
                    .load_layout(&mut self.host, &path)
                    .map(|_| self.remember_layout_path(path)),
                None => Ok(()),
            },
            MenuAction::ResetLayout => self.catalog.reset_layout(&mut self.host),
            MenuAction::Reopen(kind) => {
                self.catalog.reopen(&mut self.host, kind);
                Ok(())
            }
            MenuAction::Exit => {
                self.exit_requested = true;
                Ok(())
            }
        };
        if let Err(e) = result {
            warn!("Menu action failed: {}", e);
        }
    }

    fn remember_layout_path(&mut self, path: PathBuf) {
        if self.settings.layout_path == path {
            return;
        }
        self.settings.layout_path = path;
        if let Err(e) = self.settings.save() {
            warn!("Failed to save settings: {}", e);
        }
    }

    /// Persist the layout before the studio exits
    pub fn shutdown(&mut self) {
        match PanelCatalog::save_layout(&self.host, &self.settings.layout_path) {
            Ok(()) => info!(path = ?self.settings.layout_path, "Saved layout on exit"),
            Err(e) => warn!("Failed to save layout on exit: {}", e),
        }
    }
}

fn layout_dialog() -> rfd::FileDialog {
    rfd::FileDialog::new()
        .add_filter("Layout", &["json"])
        .set_file_name("studio_layout.json")
}
