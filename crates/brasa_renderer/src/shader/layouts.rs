//! Shared `wgpu::BindGroupLayout` objects used by every compiled shader.
//!
//! The bind group index assignment is a fixed contract between the renderer
//! and all WGSL sources compiled through [`crate::shader::ShaderProgram`]:
//!
//! | group | contents                                             | owner      |
//! |-------|------------------------------------------------------|------------|
//! | 0     | per-frame constants block (view-proj, light, time)   | renderer   |
//! | 1     | per-object constants block (dynamic offset)          | renderer   |
//! | 2     | free material uniforms + textures (reflected)        | shader     |
//! | 3     | per-instance storage array (instanced shaders only)  | object     |
//!
//! Layouts for groups 0, 1 and 3 are created once here and shared, so every
//! pipeline is bind-compatible with the renderer's frame and object bind
//! groups.  Group 2 layouts are derived per shader from reflection.

use std::sync::Arc;

#[derive(Clone)]
pub struct SharedLayouts {
    /// group(0) — one uniform buffer at binding 0, visible to both stages.
    pub frame: Arc<wgpu::BindGroupLayout>,
    /// group(1) — per-object constants via a **dynamic** uniform buffer.
    ///
    /// `has_dynamic_offset: true` lets the renderer bind one large buffer
    /// once and supply a different byte offset per draw call instead of
    /// switching bind groups N times per frame.
    pub object: Arc<wgpu::BindGroupLayout>,
    /// group(3) — read-only storage array of per-instance records.
    pub instances: Arc<wgpu::BindGroupLayout>,
}

impl SharedLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let frame = Arc::new(device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Layout: Frame Constants"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            },
        ));

        let object = Arc::new(device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Layout: Object Constants (dynamic)"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        // Each slot is a mat4x4<f32> = 64 bytes.
                        min_binding_size: wgpu::BufferSize::new(64),
                    },
                    count: None,
                }],
            },
        ));

        let instances = Arc::new(device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Layout: Instances"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            },
        ));

        Self {
            frame,
            object,
            instances,
        }
    }
}
