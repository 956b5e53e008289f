//! Windowing driver for Brasa applications.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use brasa_app::{App, AppContext, BrasaApp};
//!
//! struct MyGame;
//!
//! impl BrasaApp for MyGame {
//!     fn on_load(&mut self, ctx: &mut AppContext) {
//!         // create meshes/shaders in ctx.assets, spawn objects in ctx.scene
//!     }
//! }
//!
//! fn main() {
//!     App::new(MyGame).with_title("My Game").run();
//! }
//! ```

pub mod builder;
pub mod context;
mod graphics;
pub mod logging;
mod runner;
pub mod traits;

pub use builder::{App, AppConfig};
pub use context::AppContext;
pub use traits::BrasaApp;

// ── Re-export the most-used primitives ─────────────────────────────────────
// Users can write `use brasa_app::{Camera, Transform, ...};` without adding
// the core/renderer crates as direct dependencies.
pub use brasa_core::{Camera, Time, TimeClock, Transform};
pub use brasa_renderer::{
    Assets, FilterMode, Mesh, MipmapGenerator, NullOverlay, PostProcessSettings, Renderer, Scene,
    SceneObject, ShaderProgram, Texture, TextureDesc, UiOverlay, UniformId, Vertex, WrapMode,
};

// glam math types — re-exported for convenience.
pub use brasa_core::glam::{Mat4, Quat, Vec2, Vec3, Vec4};
