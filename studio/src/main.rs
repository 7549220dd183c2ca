//! Scene Studio entry point

use editor::{EditorSettings, WindowRegistry};
use std::time::{Duration, Instant};
use tracing::{error, info};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

/// Upper bound on the time between frames while idle
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

struct StudioApp {
    settings: Option<EditorSettings>,
    registry: Option<WindowRegistry>,
}

impl ApplicationHandler for StudioApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Initialize on first resume
        let Some(settings) = self.settings.take() else {
            return;
        };
        match WindowRegistry::new(event_loop, settings) {
            Ok(registry) => self.registry = Some(registry),
            Err(e) => {
                error!("Failed to start studio: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if let Some(registry) = self.registry.as_mut() {
            registry.handle_window_event(window_id, event);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(registry) = self.registry.as_mut() else {
            return;
        };
        registry.frame(event_loop);
        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + FRAME_INTERVAL));
    }
}

fn main() {
    let settings = EditorSettings::load();
    dockspace::init_logging(Some(&settings.log_filter));
    info!("Starting Scene Studio");

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            error!("Failed to create event loop: {}", e);
            return;
        }
    };

    let mut app = StudioApp {
        settings: Some(settings),
        registry: None,
    };
    if let Err(e) = event_loop.run_app(&mut app) {
        error!("Event loop error: {}", e);
    }
}
