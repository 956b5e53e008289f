//! The `RenderPass` trait — every stage of the pipeline implements this.
//!
//! ## Two-phase design
//! `prepare` → `render` lets passes write uniform data and rebuild bind
//! groups **before** draw recording begins; `render` then only records
//! commands against the already-bound framebuffer.
//!
//! ## Lifecycle
//! `Uninitialized → Configured → Ready`: a pass starts as plain data,
//! `PassNode::initialize` calls its `configure_targets` and builds the one
//! framebuffer it will ever own.  An attachment set that cannot form a
//! complete framebuffer aborts initialization with a fatal error.

use crate::context::GpuContext;
use crate::error::RenderError;

use super::frame_packet::FramePacket;
use super::targets::{Framebuffer, TargetConfig};

pub trait RenderPass {
    /// Short human-readable label, also used as the wgpu debug label.
    fn name(&self) -> &str;

    /// Declares the color attachment list and optional depth attachment.
    /// Called exactly once, by `PassNode::initialize`.
    fn configure_targets(&self) -> TargetConfig;

    /// Upload GPU data for this frame.  Called before any pass records
    /// draw commands, so `queue` writes land ahead of the frame's submit.
    #[allow(unused_variables)]
    fn prepare(&mut self, ctx: &GpuContext, packet: &FramePacket) {}

    /// Record draw commands.  The pass's framebuffer is already bound as
    /// the current draw target.
    fn render(&mut self, rpass: &mut wgpu::RenderPass<'_>, packet: &FramePacket);
}

/// A pass plus the framebuffer built from its target declaration.
pub struct PassNode {
    pass: Box<dyn RenderPass>,
    framebuffer: Framebuffer,
}

impl PassNode {
    /// Runs `configure_targets` and builds the framebuffer, binding every
    /// color attachment at sequential slots in list order.  Fails fatally
    /// if the resulting attachment set is not complete.
    pub fn initialize(pass: Box<dyn RenderPass>) -> Result<Self, RenderError> {
        let config = pass.configure_targets();
        let framebuffer = Framebuffer::new(pass.name(), &config)?;
        log::debug!(
            "pass '{}' initialized with {} color attachment(s)",
            pass.name(),
            config.colors.len()
        );
        Ok(Self { pass, framebuffer })
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn prepare(&mut self, ctx: &GpuContext, packet: &FramePacket) {
        self.pass.prepare(ctx, packet);
    }

    /// Binds the pass's framebuffer as the current draw target, then calls
    /// `render`.
    pub fn execute(&mut self, encoder: &mut wgpu::CommandEncoder, packet: &FramePacket) {
        let mut rpass = self.framebuffer.begin(encoder, self.pass.name());
        self.pass.render(&mut rpass, packet);
    }
}
