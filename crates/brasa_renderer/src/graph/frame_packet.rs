//! Data bundle assembled once per frame and passed immutably to every
//! `RenderPass`.
//!
//! Draw commands are fully resolved to GPU handles before any pass runs:
//! passes only see what they need to render, not how the scene or the
//! resource pools are structured.  The wgpu handle types inside are
//! internally reference counted, so a `DrawCommand` is a set of cheap
//! clones, not copies of GPU memory.

use std::sync::Arc;

/// A single mesh draw, resolved from a scene object.
pub struct DrawCommand {
    pub pipeline: wgpu::RenderPipeline,
    pub material_bind_group: wgpu::BindGroup,
    /// Byte offset of this object's slot in the object constants buffer.
    pub object_offset: u32,
    pub vertex_buffer: Arc<wgpu::Buffer>,
    pub index_buffer: Arc<wgpu::Buffer>,
    pub index_count: u32,
    /// Instance bind group + count when the object carries an instanced
    /// extension; `None` draws the plain mesh once.
    pub instances: Option<(wgpu::BindGroup, u32)>,
}

impl DrawCommand {
    /// Records this command into `rpass`.  Group 0 (frame constants) is
    /// expected to be bound already; instancing still issues exactly one
    /// draw call regardless of the instance count.
    pub fn record(&self, rpass: &mut wgpu::RenderPass<'_>, object_bind_group: &wgpu::BindGroup) {
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(1, object_bind_group, &[self.object_offset]);
        rpass.set_bind_group(2, &self.material_bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        match &self.instances {
            Some((bind_group, count)) => {
                rpass.set_bind_group(3, bind_group, &[]);
                rpass.draw_indexed(0..self.index_count, 0, 0..*count);
            }
            None => rpass.draw_indexed(0..self.index_count, 0, 0..1),
        }
    }
}

/// All data a `RenderPass` may need for one frame.
pub struct FramePacket<'a> {
    /// Per-frame constants bind group (group 0), bound by every pass.
    pub frame_bind_group: &'a wgpu::BindGroup,
    /// Shared per-object constants bind group (group 1, dynamic offsets).
    pub object_bind_group: &'a wgpu::BindGroup,
    /// Opaque draw list, resolved in list order.
    pub opaque: Vec<DrawCommand>,
}
