//! UI overlay pass — composites an immediate-mode GUI on top of the
//! post-processed image.
//!
//! The GUI library itself is an external collaborator: it has already
//! recorded its draw data against the current frame's input state by the
//! time this pass runs, and receives a single `render` call with the
//! target bound.  The pass loads (never clears) its color target so the
//! overlay draws over the post-processed result.

use std::sync::Arc;

use crate::graph::frame_packet::FramePacket;
use crate::graph::pass::RenderPass;
use crate::graph::targets::{ColorAttachment, TargetConfig};
use crate::resources::texture::Texture;

/// Seam for the immediate-mode GUI collaborator.
pub trait UiOverlay {
    fn render(&mut self, rpass: &mut wgpu::RenderPass<'_>);
}

/// Overlay that draws nothing — for applications without a GUI.
pub struct NullOverlay;

impl UiOverlay for NullOverlay {
    fn render(&mut self, _rpass: &mut wgpu::RenderPass<'_>) {}
}

pub struct UiPass {
    target: Arc<Texture>,
    overlay: Box<dyn UiOverlay>,
}

impl UiPass {
    pub fn new(target: Arc<Texture>, overlay: Box<dyn UiOverlay>) -> Self {
        Self { target, overlay }
    }
}

impl RenderPass for UiPass {
    fn name(&self) -> &str {
        "UI Overlay Pass"
    }

    fn configure_targets(&self) -> TargetConfig {
        TargetConfig {
            colors: vec![ColorAttachment::loaded(self.target.clone())],
            // We don't need a depth buffer.
            depth: None,
        }
    }

    fn render(&mut self, rpass: &mut wgpu::RenderPass<'_>, _packet: &FramePacket) {
        let (width, height) = (self.target.desc.width, self.target.desc.height);
        rpass.set_viewport(0.0, 0.0, width as f32, height as f32, 0.0, 1.0);
        self.overlay.render(rpass);
    }
}
