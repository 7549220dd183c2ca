//! GPU context shared by every studio window
//!
//! One instance, adapter, device and queue serve all windows. Each window
//! only owns its surface, see [`crate::window_manager`].

use crate::error::EditorError;
use std::sync::Arc;
use tracing::info;

pub struct RenderContext {
    pub instance: Arc<wgpu::Instance>,
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
    adapter: wgpu::Adapter,
    /// Adapter information for debugging
    pub adapter_info: wgpu::AdapterInfo,
}

impl RenderContext {
    /// Request an adapter able to present to `compatible_surface` and a
    /// device on it
    pub async fn new(
        instance: Arc<wgpu::Instance>,
        compatible_surface: Option<&wgpu::Surface<'_>>,
    ) -> Result<Self, EditorError> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface,
                force_fallback_adapter: false,
            })
            .await?;

        let adapter_info = adapter.get_info();
        info!(
            gpu_name = %adapter_info.name,
            backend = ?adapter_info.backend,
            "GPU adapter selected"
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: Some("Studio Device"),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        Ok(Self {
            instance,
            device: Arc::new(device),
            queue: Arc::new(queue),
            adapter,
            adapter_info,
        })
    }

    /// Surface configuration for a window of the given physical size
    pub fn create_surface_configuration(
        &self,
        surface: &wgpu::Surface,
        width: u32,
        height: u32,
    ) -> wgpu::SurfaceConfiguration {
        let surface_caps = surface.get_capabilities(&self.adapter);
        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: self.get_preferred_format(surface),
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        }
    }

    /// Preferred format for `surface`; sRGB when available
    pub fn get_preferred_format(&self, surface: &wgpu::Surface) -> wgpu::TextureFormat {
        let surface_caps = surface.get_capabilities(&self.adapter);
        surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb)
    }

    pub fn create_command_encoder(&self, label: Option<&str>) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label })
    }

    pub fn submit<I: IntoIterator<Item = wgpu::CommandBuffer>>(&self, command_buffers: I) {
        self.queue.submit(command_buffers);
    }
}
