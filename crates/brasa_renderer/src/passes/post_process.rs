//! Post-process pass: one fullscreen triangle through the dedicated
//! post-process shader.
//!
//! The pass samples the opaque pass's color output and applies the effects
//! described by [`PostProcessSettings`] — a record owned by the application
//! and shared with the pass.  The pass reads it once per frame and never
//! writes or validates it.

use std::sync::{Arc, Mutex};

use glam::Vec4;

use crate::context::GpuContext;
use crate::error::RenderError;
use crate::geometry::Mesh;
use crate::graph::frame_packet::FramePacket;
use crate::graph::pass::RenderPass;
use crate::graph::targets::{ColorAttachment, TargetConfig, TargetState};
use crate::resources::texture::Texture;
use crate::shader::layouts::SharedLayouts;
use crate::shader::{ShaderProgram, UniformId};

const SOURCE_COLOR: UniformId = UniformId::from_name("source_color");
const SOURCE_SIZE: UniformId = UniformId::from_name("source_size");
const BRIGHTNESS: UniformId = UniformId::from_name("brightness");
const TRITONE_ENABLED: UniformId = UniformId::from_name("tritone_enabled");
const SHADOWS_COLOR: UniformId = UniformId::from_name("shadows_color");
const MIDTONES_COLOR: UniformId = UniformId::from_name("midtones_color");
const HIGHLIGHTS_COLOR: UniformId = UniformId::from_name("highlights_color");
const CHROMATIC_ENABLED: UniformId = UniformId::from_name("chromatic_enabled");
const CHROMATIC_INTENSITY: UniformId = UniformId::from_name("chromatic_intensity");

/// Mutable post-processing configuration, owned by the application.
///
/// `chromatic_intensity` is expected in `[0, 1]`; the pass forwards values
/// verbatim without clamping.
#[derive(Debug, Clone)]
pub struct PostProcessSettings {
    pub brightness: f32,
    pub tritone_enabled: bool,
    pub shadows_color: Vec4,
    pub midtones_color: Vec4,
    pub highlights_color: Vec4,
    pub chromatic_enabled: bool,
    pub chromatic_intensity: f32,
}

impl Default for PostProcessSettings {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            tritone_enabled: false,
            shadows_color: Vec4::ZERO,
            midtones_color: Vec4::ONE / 2.0,
            highlights_color: Vec4::ONE,
            chromatic_enabled: false,
            chromatic_intensity: 0.5,
        }
    }
}

pub struct PostProcessPass {
    source: Arc<Texture>,
    destination: Arc<Texture>,
    shader: ShaderProgram,
    triangle: Mesh,
    settings: Arc<Mutex<PostProcessSettings>>,
    pipeline: wgpu::RenderPipeline,
    material: wgpu::BindGroup,
}

impl PostProcessPass {
    pub fn new(
        ctx: &GpuContext,
        layouts: &SharedLayouts,
        source: Arc<Texture>,
        destination: Arc<Texture>,
        settings: Arc<Mutex<PostProcessSettings>>,
    ) -> Result<Self, RenderError> {
        let mut shader = ShaderProgram::compile(
            &ctx.device,
            layouts,
            &ctx.defaults,
            include_str!("../shaders/post_process.vs.wgsl"),
            include_str!("../shaders/post_process.fs.wgsl"),
        )?;

        // The source image never changes, bind it once up front.
        shader.set_texture(SOURCE_COLOR, &source);

        // Must match what `Framebuffer` will derive from `configure_targets`.
        let state = TargetState {
            color_formats: vec![destination.desc.format],
            depth_format: None,
            depth_write: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
        };
        let pipeline = shader.pipeline(&ctx.device, &state);
        let material = shader.material_bind_group(&ctx.device, &ctx.defaults);
        let triangle = Mesh::fullscreen_triangle(&ctx.device);

        Ok(Self {
            source,
            destination,
            shader,
            triangle,
            settings,
            pipeline,
            material,
        })
    }
}

impl RenderPass for PostProcessPass {
    fn name(&self) -> &str {
        "Post Process Pass"
    }

    fn configure_targets(&self) -> TargetConfig {
        TargetConfig {
            colors: vec![ColorAttachment::cleared(
                self.destination.clone(),
                wgpu::Color::BLACK,
            )],
            // No depth for this pass.
            depth: None,
        }
    }

    fn prepare(&mut self, ctx: &GpuContext, _packet: &FramePacket) {
        let queue = &ctx.queue;
        let shader = &self.shader;

        shader.set_vector(
            queue,
            SOURCE_SIZE,
            Vec4::new(
                self.source.desc.width as f32,
                self.source.desc.height as f32,
                0.0,
                0.0,
            ),
        );

        let settings = self.settings.lock().expect("post-process settings poisoned");
        shader.set_float(queue, BRIGHTNESS, settings.brightness);
        shader.set_float(
            queue,
            TRITONE_ENABLED,
            if settings.tritone_enabled { 1.0 } else { 0.0 },
        );
        shader.set_vector(queue, SHADOWS_COLOR, settings.shadows_color);
        shader.set_vector(queue, MIDTONES_COLOR, settings.midtones_color);
        shader.set_vector(queue, HIGHLIGHTS_COLOR, settings.highlights_color);
        shader.set_float(
            queue,
            CHROMATIC_ENABLED,
            if settings.chromatic_enabled { 1.0 } else { 0.0 },
        );
        shader.set_float(queue, CHROMATIC_INTENSITY, settings.chromatic_intensity);
        drop(settings);

        self.material = self.shader.material_bind_group(&ctx.device, &ctx.defaults);
    }

    fn render(&mut self, rpass: &mut wgpu::RenderPass<'_>, packet: &FramePacket) {
        let (width, height) = (self.destination.desc.width, self.destination.desc.height);
        rpass.set_viewport(0.0, 0.0, width as f32, height as f32, 0.0, 1.0);

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, packet.frame_bind_group, &[]);
        rpass.set_bind_group(1, packet.object_bind_group, &[0]);
        rpass.set_bind_group(2, &self.material, &[]);
        rpass.set_vertex_buffer(0, self.triangle.vertex_buffer.slice(..));
        rpass.set_index_buffer(self.triangle.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..self.triangle.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_neutral_grade() {
        let s = PostProcessSettings::default();
        assert_eq!(s.brightness, 1.0);
        assert!(!s.tritone_enabled);
        assert_eq!(s.shadows_color, Vec4::ZERO);
        assert_eq!(s.midtones_color, Vec4::splat(0.5));
        assert_eq!(s.highlights_color, Vec4::ONE);
        assert!(!s.chromatic_enabled);
        assert_eq!(s.chromatic_intensity, 0.5);
    }
}
