/// `brasa_renderer` — a minimal forward rendering pipeline on wgpu.
///
/// # Module layout
///
/// | Module          | Responsibility                                        |
/// |-----------------|-------------------------------------------------------|
/// | `context`       | Instance/adapter/device/queue + default resources     |
/// | `resources`     | Texture wrapper, buffer helpers, mip generation, pools|
/// | `geometry`      | `Vertex`, `Mesh`, the instanced draw extension        |
/// | `shader`        | WGSL compile + reflection, uniform binding cache      |
/// | `frame`         | Per-frame constant block (view-proj, light, time)     |
/// | `object_buffer` | Per-object world matrices (dynamic uniform slots)     |
/// | `graph`         | `RenderPass` trait, framebuffer wiring, frame packet  |
/// | `draw_list`     | Per-frame partitioning and draw-command resolution    |
/// | `scene`         | `SceneObject` + the application-owned `Scene` pool    |
/// | `passes`        | Opaque, post-process and UI overlay passes            |
/// | `renderer`      | Orchestration: pass sequencing and the present blit   |
pub mod blit;
pub mod context;
pub mod draw_list;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod graph;
pub mod object_buffer;
pub mod passes;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod shader;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use context::GpuContext;
pub use draw_list::{DrawList, DrawSettings};
pub use error::RenderError;
pub use geometry::{Mesh, Vertex};
pub use graph::{FramePacket, RenderPass};
pub use passes::{NullOverlay, PostProcessSettings, UiOverlay};
pub use renderer::Renderer;
pub use resources::{
    Assets, FilterMode, MeshHandle, MipmapGenerator, ShaderHandle, Texture, TextureDesc,
    TextureHandle, WrapMode,
};
pub use scene::{ObjectHandle, Scene, SceneObject};
pub use shader::{ShaderProgram, UniformId};

pub use glam;
