use std::sync::{Arc, Mutex};

use brasa_renderer::{
    GpuContext, PostProcessSettings, RenderError, Renderer, UiOverlay,
};
use winit::window::Window;

/// Surface + renderer bundle created once the window exists.
pub struct GraphicsState {
    pub renderer: Renderer,
}

impl GraphicsState {
    pub async fn new(
        window: Arc<Window>,
        width: u32,
        height: u32,
        vsync: bool,
        overlay: Box<dyn UiOverlay>,
        post_settings: Arc<Mutex<PostProcessSettings>>,
    ) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .map_err(|e| RenderError::Context(e.to_string()))?;

        let ctx = GpuContext::new_with_instance(instance, Some(&surface)).await?;

        let caps = surface.get_capabilities(&ctx.adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(caps.formats[0]);
        let present_mode = if vsync {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 1,
        };
        surface.configure(&ctx.device, &config);

        let renderer = Renderer::new(ctx, surface, config, width, height, overlay, post_settings)?;

        Ok(Self { renderer })
    }
}
