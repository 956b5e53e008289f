//! Top-level renderer: owns the intermediate targets, the per-frame and
//! per-object constant buffers, and the three fixed pipeline passes.
//!
//! Per frame, `render_scene`:
//! 1. rebuilds the draw lists from the scene set,
//! 2. uploads the frame constants (view-projection, light, time),
//! 3. resolves the opaque list into draw commands,
//! 4. executes Opaque → Post-process → UI — strictly in that order, the
//!    post pass consumes the opaque output and the UI composites on top —
//! 5. blits the post-process target to the acquired surface texture with
//!    nearest filtering and presents.
//!
//! The intermediate targets are sized once at construction and are *not*
//! reallocated on resize; the blit scales to the new surface extent.  This
//! mirrors the fixed-resolution design of the pipeline — applications that
//! need native-resolution intermediates recreate the `Renderer`.

use std::sync::{Arc, Mutex};

use brasa_core::{Camera, Time};
use glam::Vec3;

use crate::blit::BlitPipeline;
use crate::context::GpuContext;
use crate::draw_list::{partition_scene, DrawList, DrawSettings};
use crate::error::RenderError;
use crate::frame::{FrameConstants, FrameUniformBuffer};
use crate::graph::frame_packet::FramePacket;
use crate::graph::pass::PassNode;
use crate::object_buffer::ObjectBuffer;
use crate::passes::{OpaquePass, PostProcessPass, PostProcessSettings, UiPass, UiOverlay};
use crate::resources::pool::Assets;
use crate::resources::texture::{Texture, TextureDesc};
use crate::scene::Scene;
use crate::shader::layouts::SharedLayouts;

const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

pub struct Renderer {
    ctx: GpuContext,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,

    layouts: SharedLayouts,
    frame_uniforms: FrameUniformBuffer,
    object_buffer: ObjectBuffer,

    // Intermediate targets, fixed at construction-time resolution.
    camera_color: Arc<Texture>,
    camera_depth: Arc<Texture>,
    post_color: Arc<Texture>,

    opaque_pass: PassNode,
    post_pass: PassNode,
    ui_pass: PassNode,

    opaque_list: DrawList,
    transparent_list: DrawList,
    shadow_caster_list: DrawList,

    blit: BlitPipeline,
}

impl Renderer {
    /// Builds the full pipeline at `width` × `height`: intermediate
    /// targets, constant buffers, the three passes (initialized before any
    /// frame runs — execution order is fixed separately in `render_scene`)
    /// and the present blit.
    ///
    /// `ui_overlay` and `post_settings` are the two external collaborators:
    /// the overlay draws inside the UI pass, the settings record is read by
    /// the post-process pass every frame.
    pub fn new(
        ctx: GpuContext,
        surface: wgpu::Surface<'static>,
        surface_config: wgpu::SurfaceConfiguration,
        width: u32,
        height: u32,
        ui_overlay: Box<dyn UiOverlay>,
        post_settings: Arc<Mutex<PostProcessSettings>>,
    ) -> Result<Self, RenderError> {
        let device = &ctx.device;
        let layouts = SharedLayouts::new(device);
        let frame_uniforms = FrameUniformBuffer::new(device, &layouts);
        let object_buffer = ObjectBuffer::new(device, &layouts, 256);

        let camera_color = Arc::new(Texture::new(
            device,
            TextureDesc::d2("Camera Color", width, height, COLOR_FORMAT),
        ));
        let camera_depth = Arc::new(Texture::new(
            device,
            TextureDesc::d2("Camera Depth", width, height, DEPTH_FORMAT),
        ));
        let post_color = Arc::new(Texture::new(
            device,
            TextureDesc::d2("Post Process Color", width, height, COLOR_FORMAT),
        ));

        let opaque_pass = PassNode::initialize(Box::new(OpaquePass::new(
            camera_color.clone(),
            camera_depth.clone(),
        )))?;
        let post_pass = PassNode::initialize(Box::new(PostProcessPass::new(
            &ctx,
            &layouts,
            camera_color.clone(),
            post_color.clone(),
            post_settings,
        )?))?;
        let ui_pass = PassNode::initialize(Box::new(UiPass::new(post_color.clone(), ui_overlay)))?;

        let blit = BlitPipeline::new(device, &post_color, surface_config.format);

        Ok(Self {
            ctx,
            surface,
            surface_config,
            layouts,
            frame_uniforms,
            object_buffer,
            camera_color,
            camera_depth,
            post_color,
            opaque_pass,
            post_pass,
            ui_pass,
            opaque_list: DrawList::new("Opaque Objects"),
            transparent_list: DrawList::new("Transparent Objects"),
            shadow_caster_list: DrawList::new("Shadow Casters"),
            blit,
        })
    }

    pub fn context(&self) -> &GpuContext {
        &self.ctx
    }

    pub fn layouts(&self) -> &SharedLayouts {
        &self.layouts
    }

    /// Current surface extent (the blit destination).
    pub fn surface_size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    pub fn camera_color_buffer(&self) -> &Arc<Texture> {
        &self.camera_color
    }

    pub fn camera_depth_buffer(&self) -> &Arc<Texture> {
        &self.camera_depth
    }

    pub fn post_process_color_buffer(&self) -> &Arc<Texture> {
        &self.post_color
    }

    /// Renders one frame of `scene` through the fixed pass sequence and
    /// presents it.
    pub fn render_scene(
        &mut self,
        camera: &Camera,
        scene: &Scene,
        assets: &mut Assets,
        time: Time,
    ) -> Result<(), wgpu::SurfaceError> {
        partition_scene(
            scene,
            &mut self.opaque_list,
            &mut self.transparent_list,
            &mut self.shadow_caster_list,
        );

        // Per-frame constants: view = inverse of the camera's world matrix.
        let view_proj = camera.projection_matrix() * camera.view_matrix();
        self.frame_uniforms.update(
            &self.ctx.queue,
            FrameConstants::new(view_proj, Vec3::ONE.normalize(), time.elapsed_f32()),
        );

        self.object_buffer
            .ensure_capacity(&self.ctx.device, &self.layouts, self.opaque_list.len());

        let opaque = self.opaque_list.resolve(
            &self.ctx,
            scene,
            assets,
            &DrawSettings::default(),
            self.opaque_pass.framebuffer().state(),
            &self.object_buffer,
            0,
        );

        let packet = FramePacket {
            frame_bind_group: &self.frame_uniforms.bind_group,
            object_bind_group: &self.object_buffer.bind_group,
            opaque,
        };

        self.opaque_pass.prepare(&self.ctx, &packet);
        self.post_pass.prepare(&self.ctx, &packet);
        self.ui_pass.prepare(&self.ctx, &packet);

        let output = self.surface.get_current_texture()?;
        let surface_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        self.opaque_pass.execute(&mut encoder, &packet);
        self.post_pass.execute(&mut encoder, &packet);
        self.ui_pass.execute(&mut encoder, &packet);

        // Present the post-processed (and overlaid) image.
        self.blit.blit(&mut encoder, &surface_view);

        self.ctx.queue.submit(Some(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Reconfigures the surface for a new window size.  The intermediate
    /// targets keep their construction-time resolution; the present blit
    /// covers the full new extent with nearest-neighbour scaling.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.ctx.device, &self.surface_config);
    }
}
