//! GPU-instanced drawing: one mesh replicated N times in a single draw call.
//!
//! Per-instance data is a flat array of 4-component records — position xyz
//! plus a rotation seed — uploaded once into a read-only storage buffer and
//! bound at the reserved instance bind group.  The vertex shader indexes the
//! array with `@builtin(instance_index)`; the shader side of the contract is
//! not modeled here.

use crate::resources::buffer;
use crate::shader::layouts::SharedLayouts;

/// A per-instance record: `[x, y, z, rotation_seed]`.
pub type InstanceData = [f32; 4];

/// The instance storage buffer attached to a scene object.
///
/// The base mesh is shared, not owned — the extension only replicates
/// whatever mesh its object currently references.  Replacing the extension
/// drops the previous buffer.
pub struct InstancedMesh {
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub instance_count: u32,
}

impl InstancedMesh {
    /// Uploads `instances` into a write-once storage buffer sized exactly to
    /// the array, and builds the bind group for the reserved instance slot.
    pub fn new(
        device: &wgpu::Device,
        layouts: &SharedLayouts,
        instances: &[InstanceData],
    ) -> Self {
        let buffer = buffer::create_storage(device, "Instance Data", instances);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Instance Bind Group"),
            layout: &layouts.instances,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self {
            buffer,
            bind_group,
            instance_count: instances.len() as u32,
        }
    }
}
