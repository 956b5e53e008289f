//! Dynamic uniform buffer for per-object world matrices.
//!
//! Every drawn object needs its local-to-world matrix on the GPU, and
//! `queue.write_buffer` ordering means a single shared buffer slot would be
//! overwritten by the last object before any draw executes.  Each draw
//! therefore gets its own aligned slot in one large buffer, bound once per
//! pass with a dynamic byte offset per draw call:
//!
//! ```text
//! rpass.set_bind_group(1, &objects.bind_group, &[objects.offset(slot)]);
//! ```
//!
//! Slots are reassigned every frame in draw-list order; nothing persists
//! across frames.

use crate::shader::layouts::SharedLayouts;

/// One slot = 64 bytes of matrix, padded up to the device's dynamic-offset
/// alignment (typically 256 bytes on desktop hardware).
const MAT4_SIZE: u64 = 64;

pub struct ObjectBuffer {
    pub buffer: wgpu::Buffer,
    /// Single bind group referencing the whole buffer with a dynamic offset.
    pub bind_group: wgpu::BindGroup,
    stride: u32,
    capacity: usize,
}

impl ObjectBuffer {
    pub fn new(device: &wgpu::Device, layouts: &SharedLayouts, initial_capacity: usize) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment;
        let stride = align_up(MAT4_SIZE as u32, alignment);
        let capacity = initial_capacity.max(1);
        let buffer = create_buffer(device, capacity, stride);
        let bind_group = create_bind_group(device, layouts, &buffer);
        Self {
            buffer,
            bind_group,
            stride,
            capacity,
        }
    }

    /// Byte offset of slot `index`.
    #[inline]
    pub fn offset(&self, index: usize) -> u32 {
        index as u32 * self.stride
    }

    /// Writes `matrix` into slot `index`.
    #[inline]
    pub fn write(&self, queue: &wgpu::Queue, index: usize, matrix: &glam::Mat4) {
        debug_assert!(index < self.capacity, "object slot out of range");
        queue.write_buffer(
            &self.buffer,
            self.offset(index) as u64,
            bytemuck::bytes_of(&matrix.to_cols_array()),
        );
    }

    /// Grows the buffer (doubling) until it can hold `needed` slots.  The
    /// bind group is recreated, so callers must fetch it again afterwards.
    pub fn ensure_capacity(
        &mut self,
        device: &wgpu::Device,
        layouts: &SharedLayouts,
        needed: usize,
    ) {
        if needed <= self.capacity {
            return;
        }
        let mut capacity = self.capacity;
        while capacity < needed {
            capacity *= 2;
        }
        self.buffer = create_buffer(device, capacity, self.stride);
        self.bind_group = create_bind_group(device, layouts, &self.buffer);
        self.capacity = capacity;
        log::debug!("object buffer grown to {capacity} slots");
    }
}

fn create_buffer(device: &wgpu::Device, capacity: usize, stride: u32) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Object Constants"),
        size: capacity as u64 * stride as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_bind_group(
    device: &wgpu::Device,
    layouts: &SharedLayouts,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Object Constants Bind Group"),
        layout: &layouts.object,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer,
                offset: 0,
                // The dynamic window the shader sees: one matrix.
                size: wgpu::BufferSize::new(MAT4_SIZE),
            }),
        }],
    })
}

/// Round `value` up to the next multiple of `alignment` (a power of two).
#[inline]
fn align_up(value: u32, alignment: u32) -> u32 {
    (value + alignment - 1) & !(alignment - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_up_rounds_to_power_of_two() {
        assert_eq!(align_up(64, 256), 256);
        assert_eq!(align_up(256, 256), 256);
        assert_eq!(align_up(257, 256), 512);
        assert_eq!(align_up(64, 64), 64);
    }

    #[test]
    fn slot_offsets_are_stride_multiples() {
        // Offsets are pure arithmetic over the stride; emulate a 256-byte
        // alignment without a device.
        let stride = align_up(MAT4_SIZE as u32, 256);
        assert_eq!(stride, 256);
        assert_eq!(0usize as u32 * stride, 0);
        assert_eq!(3u32 * stride, 768);
    }
}
