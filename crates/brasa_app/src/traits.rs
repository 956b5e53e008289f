use crate::context::AppContext;

/// The core trait every Brasa application implements.
///
/// All methods have empty default implementations so you only override what
/// you need.  The windowing driver invokes them in a fixed contract:
/// `on_load` once after the window and GPU are ready, then per frame
/// `on_update` followed by `on_render`, `on_resize` on every surface size
/// change, and `on_close` once during teardown.
#[allow(unused_variables)]
pub trait BrasaApp {
    /// Called once after the window and GPU context are ready.
    ///
    /// Use this to upload meshes and textures into `ctx.assets`, compile
    /// shaders, and spawn the initial scene objects.
    fn on_load(&mut self, ctx: &mut AppContext) {}

    /// Called every frame before rendering.  `dt` is the frame delta in
    /// seconds.  Game logic and scene mutation go here.
    fn on_update(&mut self, dt: f32, ctx: &mut AppContext) {}

    /// Called every frame after `on_update`.  This is where the app sets
    /// per-frame material uniforms and calls
    /// `ctx.renderer.render_scene(..)` with its camera.
    fn on_render(&mut self, dt: f32, ctx: &mut AppContext) {}

    /// Called whenever the window is resized.  The runner has already
    /// reconfigured the surface; recompute the camera aspect ratio here.
    fn on_resize(&mut self, new_size: (u32, u32), ctx: &mut AppContext) {}

    /// Called once when the window is closing, before GPU teardown.
    fn on_close(&mut self, ctx: &mut AppContext) {}
}
