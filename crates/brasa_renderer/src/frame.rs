//! The per-frame constant block.
//!
//! One small uniform buffer holds everything that is constant across a
//! frame: the view-projection matrix, the light direction and the elapsed
//! time.  It is created once, bound at the reserved frame bind group for
//! the lifetime of the context, and overwritten in place every frame —
//! passes must never hold on to constants from a previous frame.

use glam::{Mat4, Vec3};

use crate::resources::buffer;
use crate::shader::layouts::SharedLayouts;

/// CPU mirror of the WGSL `FrameConstants` block (group 0, binding 0).
///
/// The `vec3 + f32` tail packs into a single 16-byte row, matching WGSL's
/// uniform layout without explicit padding.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameConstants {
    pub view_proj: [[f32; 4]; 4],
    pub light_direction: [f32; 3],
    pub time: f32,
}

impl FrameConstants {
    pub fn new(view_proj: Mat4, light_direction: Vec3, time: f32) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            light_direction: light_direction.to_array(),
            time,
        }
    }
}

impl Default for FrameConstants {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Vec3::ONE.normalize(), 0.0)
    }
}

/// The GPU buffer + bind group pair for the frame constants.
pub struct FrameUniformBuffer {
    buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl FrameUniformBuffer {
    pub fn new(device: &wgpu::Device, layouts: &SharedLayouts) -> Self {
        let buffer = buffer::create_uniform(device, "Frame Constants", &FrameConstants::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Constants Bind Group"),
            layout: &layouts.frame,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self { buffer, bind_group }
    }

    /// Overwrites the constants in place for the current frame.
    pub fn update(&self, queue: &wgpu::Queue, constants: FrameConstants) {
        buffer::update_uniform(queue, &self.buffer, &constants);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_layout_matches_wgsl() {
        // mat4x4 (64) + vec3 (12) + f32 (4) = 80, 16-byte aligned.
        assert_eq!(std::mem::size_of::<FrameConstants>(), 80);
        assert_eq!(std::mem::align_of::<FrameConstants>() % 4, 0);

        let c = FrameConstants::new(Mat4::IDENTITY, Vec3::new(0.0, 1.0, 0.0), 2.5);
        let bytes = bytemuck::bytes_of(&c);
        // time sits immediately after the light direction, at offset 76.
        let time = f32::from_le_bytes(bytes[76..80].try_into().unwrap());
        assert_eq!(time, 2.5);
    }

    #[test]
    fn default_light_direction_is_normalized() {
        let c = FrameConstants::default();
        let len: f32 = c
            .light_direction
            .iter()
            .map(|v| v * v)
            .sum::<f32>()
            .sqrt();
        assert!((len - 1.0).abs() < 1e-6);
    }
}
