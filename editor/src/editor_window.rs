//! A studio OS window: GUI context, platform glue and renderer
//!
//! Window events arrive between frames while another window's context may
//! be current, so they are queued and fed to imgui right after this
//! window's context is activated for its frame.

use crate::error::EditorError;
use crate::gui_context::GuiContext;
use crate::panel_state::PanelKind;
use crate::render_context::RenderContext;
use crate::window_manager::WindowManager;
use dockspace::{DockHost, FrameOutcome, Rect};
use glam::Vec2;
use imgui::{Condition, StyleVar, Ui, WindowFlags};
use imgui_wgpu::{Renderer, RendererConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use std::sync::Arc;
use tracing::{debug, error, info, trace};
use winit::event::{Event, WindowEvent};
use winit::window::{Window, WindowId};

/// Something picked from the main menu bar
#[derive(Debug, Clone, PartialEq)]
pub enum MenuAction {
    SaveLayout,
    SaveLayoutAs,
    LoadLayout,
    LoadLayoutFrom,
    ResetLayout,
    Reopen(PanelKind),
    Exit,
}

/// What one window's frame produced
pub struct WindowFrame {
    pub menu: Option<MenuAction>,
    pub outcome: Option<FrameOutcome>,
    /// Style of the context after the frame, handed to the next window
    pub style: imgui::Style,
}

pub struct EditorWindow {
    pub window: Arc<Window>,
    gui: GuiContext,
    platform: WinitPlatform,
    renderer: Renderer,
    pending_events: Vec<WindowEvent>,
    is_main: bool,
}

impl EditorWindow {
    /// Build the GUI context, platform and renderer for a registered window
    pub fn new(
        window: Arc<Window>,
        render_context: &RenderContext,
        texture_format: wgpu::TextureFormat,
        is_main: bool,
    ) -> Result<Self, EditorError> {
        let (gui, (platform, renderer)) = GuiContext::new(|ctx| {
            let style = ctx.style_mut();
            style.window_rounding = 0.0;
            style.scrollbar_rounding = 0.0;

            let mut platform = WinitPlatform::new(ctx);
            platform.attach_window(ctx.io_mut(), &window, HiDpiMode::Default);

            let renderer_config = RendererConfig {
                texture_format,
                ..Default::default()
            };
            let renderer = Renderer::new(ctx, &render_context.device, &render_context.queue, renderer_config);
            (platform, renderer)
        })?;

        info!(window_id = ?window.id(), is_main, "Created editor window");
        Ok(Self {
            window,
            gui,
            platform,
            renderer,
            pending_events: Vec::new(),
            is_main,
        })
    }

    pub fn id(&self) -> WindowId {
        self.window.id()
    }

    pub fn is_main(&self) -> bool {
        self.is_main
    }

    /// Queue an event for the next frame
    pub fn queue_event(&mut self, event: WindowEvent) {
        self.pending_events.push(event);
    }

    /// Window client area in logical screen coordinates
    pub fn screen_bounds(&self) -> Rect {
        let scale = self.window.scale_factor();
        let min = self
            .window
            .inner_position()
            .map(|p| p.to_logical::<f32>(scale))
            .map(|p| Vec2::new(p.x, p.y))
            .unwrap_or(Vec2::ZERO);
        let size = self.window.inner_size().to_logical::<f32>(scale);
        Rect::from_min_size(min, Vec2::new(size.width, size.height))
    }

    /// Build, lay out and present one frame.
    ///
    /// Runs this window's dockspace pass through `host`. `style` is the
    /// previous window's style. `closed_panels` feeds the View menu of the
    /// main window. Returns `Ok(None)` when the frame was skipped.
    pub fn frame(
        &mut self,
        host: &mut DockHost<WindowId, Ui>,
        render_context: &RenderContext,
        windows: &WindowManager,
        style: Option<&imgui::Style>,
        closed_panels: &[PanelKind],
    ) -> Result<Option<WindowFrame>, EditorError> {
        let window_id = self.window.id();
        let Some(window_data) = windows.get_window(window_id) else {
            return Err(EditorError::UnknownWindow(window_id));
        };
        if windows.is_window_minimized(window_id) {
            self.pending_events.clear();
            return Ok(None);
        }

        let mut gui = self.gui.activate(style)?;
        for event in self.pending_events.drain(..) {
            let event: Event<()> = Event::WindowEvent { window_id, event };
            self.platform.handle_event(gui.io_mut(), &self.window, &event);
        }

        let frame = match window_data.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                info!(window_id = ?window_id, "Surface lost or outdated, reconfiguring");
                windows.reconfigure(window_id);
                return Ok(None);
            }
            Err(e) => {
                error!(window_id = ?window_id, error = ?e, "Failed to acquire surface texture");
                return Ok(None);
            }
        };

        self.platform.prepare_frame(gui.io_mut(), &self.window)?;

        // Display size follows the surface, not whatever the platform guessed
        let surface_size = (window_data.surface_config.width, window_data.surface_config.height);
        {
            let dpi = self.window.scale_factor() as f32;
            let io = gui.io_mut();
            io.display_size = [surface_size.0 as f32 / dpi, surface_size.1 as f32 / dpi];
            io.display_framebuffer_scale = [dpi, dpi];
        }

        let ui: &Ui = gui.new_frame();
        let mut menu = None;
        let mut top = 0.0;
        if self.is_main {
            menu = draw_main_menu(ui, closed_panels);
            top = ui.frame_height();
        }

        let [width, height] = ui.io().display_size;
        let area = Rect::from_min_size(Vec2::new(0.0, top), Vec2::new(width, (height - top).max(0.0)));
        let mut outcome = None;
        {
            let _padding = ui.push_style_var(StyleVar::WindowPadding([0.0, 0.0]));
            let _border = ui.push_style_var(StyleVar::WindowBorderSize(0.0));
            ui.window("##dock_host")
                .position([area.min.x, area.min.y], Condition::Always)
                .size([area.width(), area.height()], Condition::Always)
                .flags(
                    WindowFlags::NO_DECORATION
                        | WindowFlags::NO_MOVE
                        | WindowFlags::NO_SAVED_SETTINGS
                        | WindowFlags::NO_BRING_TO_FRONT_ON_FOCUS
                        | WindowFlags::NO_NAV_FOCUS
                        | WindowFlags::NO_SCROLLBAR
                        | WindowFlags::NO_SCROLL_WITH_MOUSE,
                )
                .build(|| {
                    outcome = Some(host.run_pass(&window_id, ui, area));
                });
        }

        self.platform.prepare_render(ui, &self.window);
        let draw_data = gui.render();

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = render_context.create_command_encoder(Some("Studio Frame Encoder"));
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("ImGui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.08,
                            g: 0.08,
                            b: 0.09,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Err(e) = self.renderer.render(
                draw_data,
                &render_context.queue,
                &render_context.device,
                &mut pass,
            ) {
                error!("ImGui render failed: {e:?}");
            }
        }
        render_context.submit(std::iter::once(encoder.finish()));
        frame.present();
        trace!(window_id = ?window_id, "Presented frame");

        let style = gui.style().clone();
        let outcome = match outcome.transpose() {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!(window_id = ?window_id, "Dock pass skipped: {}", e);
                None
            }
        };
        Ok(Some(WindowFrame { menu, outcome, style }))
    }
}

fn draw_main_menu(ui: &Ui, closed_panels: &[PanelKind]) -> Option<MenuAction> {
    let mut action = None;
    ui.main_menu_bar(|| {
        ui.menu("File", || {
            if ui.menu_item("Save Layout") {
                action = Some(MenuAction::SaveLayout);
            }
            if ui.menu_item("Save Layout As...") {
                action = Some(MenuAction::SaveLayoutAs);
            }
            if ui.menu_item("Load Layout") {
                action = Some(MenuAction::LoadLayout);
            }
            if ui.menu_item("Load Layout From...") {
                action = Some(MenuAction::LoadLayoutFrom);
            }
            ui.separator();
            if ui.menu_item("Exit") {
                action = Some(MenuAction::Exit);
            }
        });
        ui.menu("View", || {
            ui.menu_with_enabled("Reopen Panel", !closed_panels.is_empty(), || {
                for kind in closed_panels {
                    if ui.menu_item(kind.title()) {
                        action = Some(MenuAction::Reopen(*kind));
                    }
                }
            });
            ui.separator();
            if ui.menu_item("Reset Layout") {
                action = Some(MenuAction::ResetLayout);
            }
        });
    });
    if let Some(action) = &action {
        debug!("Menu action: {:?}", action);
    }
    action
}
