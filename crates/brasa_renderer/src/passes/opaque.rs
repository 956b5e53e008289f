//! Opaque geometry pass.
//!
//! Clears color and depth, then draws the opaque list with depth test and
//! write enabled (less-or-equal compare — the depth state is baked into the
//! pipelines of the resolved draw commands).  No shader override.

use std::sync::Arc;

use crate::graph::frame_packet::FramePacket;
use crate::graph::pass::RenderPass;
use crate::graph::targets::{ColorAttachment, DepthAttachment, TargetConfig};
use crate::resources::texture::Texture;

pub struct OpaquePass {
    color: Arc<Texture>,
    depth: Arc<Texture>,
}

impl OpaquePass {
    pub fn new(color: Arc<Texture>, depth: Arc<Texture>) -> Self {
        Self { color, depth }
    }
}

impl RenderPass for OpaquePass {
    fn name(&self) -> &str {
        "Opaque Pass"
    }

    fn configure_targets(&self) -> TargetConfig {
        TargetConfig {
            colors: vec![ColorAttachment::cleared(
                self.color.clone(),
                wgpu::Color::TRANSPARENT,
            )],
            depth: Some(DepthAttachment {
                target: self.depth.clone(),
                clear_before_pass: true,
            }),
        }
    }

    fn render(&mut self, rpass: &mut wgpu::RenderPass<'_>, packet: &FramePacket) {
        rpass.set_bind_group(0, packet.frame_bind_group, &[]);
        for command in &packet.opaque {
            command.record(rpass, packet.object_bind_group);
        }
    }
}
