//! The explicit graphics context shared by every GPU-facing module.
//!
//! One `GpuContext` is created at startup and threaded through resource
//! creation and per-frame calls — there is no hidden global state.  `Device`
//! and `Queue` are `Arc` so bind groups and buffers created elsewhere can
//! hold cheap clones.

use std::sync::Arc;

use crate::error::RenderError;
use crate::resources::texture::{Texture, TextureDesc};

/// Instance, adapter, device and queue for a single GPU, plus the small set
/// of fallback resources every material can rely on.
pub struct GpuContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
    pub defaults: GpuDefaults,
}

impl GpuContext {
    /// Creates a `GpuContext` reusing an existing `Instance` and optionally
    /// associating a `Surface` so the selected adapter is guaranteed to be
    /// compatible with the window it will present to.
    pub async fn new_with_instance(
        instance: wgpu::Instance,
        compatible_surface: Option<&wgpu::Surface<'_>>,
    ) -> Result<Self, RenderError> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface,
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| RenderError::Context("no suitable adapter found".into()))?;

        log::info!(
            "selected adapter: {} ({:?})",
            adapter.get_info().name,
            adapter.get_info().backend
        );

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Brasa Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    ..Default::default()
                },
                None,
            )
            .await
            .map_err(|e| RenderError::Context(e.to_string()))?;

        let defaults = GpuDefaults::new(&device, &queue);

        Ok(Self {
            instance,
            adapter,
            device: Arc::new(device),
            queue: Arc::new(queue),
            defaults,
        })
    }

    /// Headless context (no surface) — useful for compute-style tooling.
    pub async fn new() -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        Self::new_with_instance(instance, None).await
    }
}

/// Fallback resources bound in place of material slots the application has
/// not assigned yet: a 1×1 white texture with a linear sampler.
pub struct GpuDefaults {
    pub white_texture: Texture,
}

impl GpuDefaults {
    fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let white_texture = Texture::new(
            device,
            TextureDesc {
                label: "Default White",
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Unorm,
                width: 1,
                height: 1,
                depth: 1,
                mip_count: 1,
            },
        );
        white_texture.set_data(queue, &[255u8, 255, 255, 255]);
        Self { white_texture }
    }
}
