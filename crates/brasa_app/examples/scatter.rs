//! Demo scene: a procedural terrain plus 5000 instanced rocks scattered
//! across it, rendered through the full forward pipeline (opaque pass →
//! post-process → UI overlay → present blit).
//!
//! Everything is generated in code — no asset files — so the example runs
//! from a bare checkout.  Escape closes the window.

use brasa_app::{
    App, AppContext, BrasaApp, Camera, FilterMode, Mesh, MipmapGenerator, SceneObject,
    ShaderProgram, Texture, TextureDesc, UniformId, Vec3, Vec4, Vertex, WrapMode,
};
use brasa_renderer::{MeshHandle, ObjectHandle, ShaderHandle, TextureHandle};
use rand::{Rng, SeedableRng};

const COLOR: UniformId = UniformId::from_name("color");
const BASE_COLOR: UniformId = UniformId::from_name("base_color");

const TERRAIN_EXTENT: f32 = 250.0;
const ROCK_COUNT: usize = 5000;

// ── Shaders ──────────────────────────────────────────────────────────────────

const STANDARD_VS: &str = r#"
struct FrameConstants {
    view_proj: mat4x4<f32>,
    light_direction: vec3<f32>,
    time: f32,
}
@group(0) @binding(0) var<uniform> frame: FrameConstants;

struct ObjectConstants {
    local_to_world: mat4x4<f32>,
}
@group(1) @binding(0) var<uniform> object: ObjectConstants;

struct VsOut {
    @builtin(position) position: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) uv: vec2<f32>,
}

@vertex
fn vs_main(
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) texcoord: vec2<f32>,
) -> VsOut {
    var out: VsOut;
    let world = object.local_to_world * vec4<f32>(position, 1.0);
    out.position = frame.view_proj * world;
    out.normal = (object.local_to_world * vec4<f32>(normal, 0.0)).xyz;
    out.uv = texcoord;
    return out;
}
"#;

const INSTANCED_VS: &str = r#"
struct FrameConstants {
    view_proj: mat4x4<f32>,
    light_direction: vec3<f32>,
    time: f32,
}
@group(0) @binding(0) var<uniform> frame: FrameConstants;

struct ObjectConstants {
    local_to_world: mat4x4<f32>,
}
@group(1) @binding(0) var<uniform> object: ObjectConstants;

// One record per instance: xyz = world offset, w = rotation seed.
@group(3) @binding(0) var<storage, read> instances: array<vec4<f32>>;

struct VsOut {
    @builtin(position) position: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) uv: vec2<f32>,
}

fn rotate_y(v: vec3<f32>, angle: f32) -> vec3<f32> {
    let s = sin(angle);
    let c = cos(angle);
    return vec3<f32>(c * v.x + s * v.z, v.y, -s * v.x + c * v.z);
}

@vertex
fn vs_main(
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) texcoord: vec2<f32>,
    @builtin(instance_index) instance: u32,
) -> VsOut {
    let data = instances[instance];
    let angle = data.w + frame.time * 0.5;
    let local = rotate_y(position, angle) + data.xyz;

    var out: VsOut;
    let world = object.local_to_world * vec4<f32>(local, 1.0);
    out.position = frame.view_proj * world;
    out.normal = (object.local_to_world * vec4<f32>(rotate_y(normal, angle), 0.0)).xyz;
    out.uv = texcoord;
    return out;
}
"#;

const STANDARD_FS: &str = r#"
struct FrameConstants {
    view_proj: mat4x4<f32>,
    light_direction: vec3<f32>,
    time: f32,
}
@group(0) @binding(0) var<uniform> frame: FrameConstants;

@group(2) @binding(0) var base_color: texture_2d<f32>;
@group(2) @binding(1) var base_sampler: sampler;
@group(2) @binding(2) var<uniform> color: vec4<f32>;

struct VsOut {
    @builtin(position) position: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) uv: vec2<f32>,
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    let n = normalize(in.normal);
    let diffuse = max(dot(n, normalize(frame.light_direction)), 0.0);
    let lighting = 0.25 + 0.75 * diffuse;
    let albedo = textureSample(base_color, base_sampler, in.uv) * color;
    return vec4<f32>(albedo.rgb * lighting, albedo.a);
}
"#;

// ── Procedural content ───────────────────────────────────────────────────────

fn terrain_height(x: f32, z: f32) -> f32 {
    (x * 0.02).sin() * 4.0 + (z * 0.015).cos() * 3.0
}

fn terrain_mesh(device: &wgpu::Device) -> Mesh {
    const CELLS: usize = 128;
    let step = TERRAIN_EXTENT * 2.0 / CELLS as f32;

    let mut vertices = Vec::with_capacity((CELLS + 1) * (CELLS + 1));
    for row in 0..=CELLS {
        for col in 0..=CELLS {
            let x = -TERRAIN_EXTENT + col as f32 * step;
            let z = -TERRAIN_EXTENT + row as f32 * step;
            let y = terrain_height(x, z);
            // Normal from central differences of the height field.
            let dx = terrain_height(x + step, z) - terrain_height(x - step, z);
            let dz = terrain_height(x, z + step) - terrain_height(x, z - step);
            let normal = Vec3::new(-dx, 2.0 * step, -dz).normalize();
            vertices.push(Vertex {
                position: [x, y, z],
                normal: normal.to_array(),
                texcoord: [x / 25.0, z / 25.0],
            });
        }
    }

    let mut indices = Vec::with_capacity(CELLS * CELLS * 6);
    for row in 0..CELLS {
        for col in 0..CELLS {
            let a = (row * (CELLS + 1) + col) as u32;
            let b = a + 1;
            let c = a + (CELLS + 1) as u32;
            let d = c + 1;
            indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }

    Mesh::new(device, &vertices, &indices)
}

fn rock_mesh(device: &wgpu::Device) -> Mesh {
    // An octahedron with per-vertex normals pointing outward.
    let corners = [
        Vec3::new(0.0, 1.5, 0.0),
        Vec3::new(0.0, -1.5, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(-1.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(0.0, 0.0, -1.0),
    ];
    let vertices: Vec<Vertex> = corners
        .iter()
        .map(|p| Vertex {
            position: p.to_array(),
            normal: p.normalize().to_array(),
            texcoord: [p.x * 0.5 + 0.5, p.z * 0.5 + 0.5],
        })
        .collect();
    let indices = vec![
        0, 4, 2, 0, 2, 5, 0, 5, 3, 0, 3, 4, //
        1, 2, 4, 1, 5, 2, 1, 3, 5, 1, 4, 3,
    ];
    Mesh::new(device, &vertices, &indices)
}

fn checker_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    mips: &mut MipmapGenerator,
) -> Texture {
    const SIZE: u32 = 256;
    let desc = TextureDesc {
        mip_count: TextureDesc::full_mip_chain(SIZE, SIZE),
        ..TextureDesc::d2("Checker", SIZE, SIZE, wgpu::TextureFormat::Rgba8UnormSrgb)
    };
    let mut texture = Texture::new(device, desc);

    let mut pixels = Vec::with_capacity((SIZE * SIZE * 4) as usize);
    for y in 0..SIZE {
        for x in 0..SIZE {
            let v = if ((x / 32) + (y / 32)) % 2 == 0 { 210 } else { 90 };
            pixels.extend_from_slice(&[v, v, v, 255]);
        }
    }
    texture.set_data(queue, &pixels);
    texture.generate_all_mips(device, queue, mips);
    texture.set_wrap_mode(device, WrapMode::Repeat);
    texture.set_filter_mode(device, FilterMode::Linear);
    texture
}

// ── Application ──────────────────────────────────────────────────────────────

#[derive(Default)]
struct Scatter {
    camera: Camera,
    terrain_shader: Option<ShaderHandle>,
    rock_shader: Option<ShaderHandle>,
    checker: Option<TextureHandle>,
    terrain: Option<ObjectHandle>,
    rocks: Option<ObjectHandle>,
    terrain_mesh: Option<MeshHandle>,
    rock_mesh: Option<MeshHandle>,
}

impl BrasaApp for Scatter {
    fn on_load(&mut self, ctx: &mut AppContext) {
        let device = ctx.renderer.context().device.clone();
        let queue = ctx.renderer.context().queue.clone();
        let layouts = ctx.renderer.layouts().clone();
        let defaults = &ctx.renderer.context().defaults;

        self.camera.aspect_ratio = ctx.window_size.0 as f32 / ctx.window_size.1 as f32;
        self.camera.transform.position = Vec3::new(0.0, 25.0, 70.0);
        self.camera.transform.set_euler_degrees(Vec3::new(-15.0, 0.0, 0.0));

        let mut mips = MipmapGenerator::new(&device);
        let checker = ctx
            .assets
            .add_texture(checker_texture(&device, &queue, &mut mips));

        let terrain_shader = ShaderProgram::compile(&device, &layouts, defaults, STANDARD_VS, STANDARD_FS)
            .expect("terrain shader must compile");
        let rock_shader = ShaderProgram::compile(&device, &layouts, defaults, INSTANCED_VS, STANDARD_FS)
            .expect("rock shader must compile");
        let terrain_shader = ctx.assets.add_shader(terrain_shader);
        let rock_shader = ctx.assets.add_shader(rock_shader);

        let terrain_mesh = ctx.assets.add_mesh(terrain_mesh(&device));
        let rock_mesh = ctx.assets.add_mesh(rock_mesh(&device));

        let mut terrain = SceneObject::new(terrain_mesh, terrain_shader, Default::default());
        terrain.queue_order = 0;
        let terrain = ctx.scene.add(terrain);

        let mut rocks = SceneObject::new(rock_mesh, rock_shader, Default::default());
        rocks.queue_order = 10;
        rocks.cast_shadows = true;
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let instances: Vec<[f32; 4]> = (0..ROCK_COUNT)
            .map(|_| {
                let x = rng.gen_range(-TERRAIN_EXTENT..TERRAIN_EXTENT);
                let z = rng.gen_range(-TERRAIN_EXTENT..TERRAIN_EXTENT);
                let seed = rng.gen_range(0.0..std::f32::consts::TAU);
                [x, terrain_height(x, z) + 1.0, z, seed]
            })
            .collect();
        rocks.set_instances(&device, &layouts, &instances);
        let rocks = ctx.scene.add(rocks);

        // Slight warm grade so the post pass visibly runs.
        {
            let mut post = ctx.post_settings.lock().unwrap();
            post.tritone_enabled = true;
            post.shadows_color = Vec4::new(0.05, 0.03, 0.02, 1.0);
            post.midtones_color = Vec4::new(0.55, 0.5, 0.45, 1.0);
            post.highlights_color = Vec4::ONE;
        }

        self.terrain_shader = Some(terrain_shader);
        self.rock_shader = Some(rock_shader);
        self.checker = Some(checker);
        self.terrain = Some(terrain);
        self.rocks = Some(rocks);
        self.terrain_mesh = Some(terrain_mesh);
        self.rock_mesh = Some(rock_mesh);
    }

    fn on_render(&mut self, _dt: f32, ctx: &mut AppContext) {
        let (Some(terrain_shader), Some(rock_shader), Some(checker)) =
            (self.terrain_shader, self.rock_shader, self.checker)
        else {
            return;
        };

        let queue = ctx.renderer.context().queue.clone();
        if let Some(shader) = ctx.assets.shader(terrain_shader) {
            shader.set_vector(&queue, COLOR, Vec4::ONE);
        }
        if let Some(shader) = ctx.assets.shader(rock_shader) {
            shader.set_vector(&queue, COLOR, Vec4::new(0.9, 0.85, 0.8, 1.0));
        }
        ctx.assets.bind_texture(terrain_shader, BASE_COLOR, checker);
        ctx.assets.bind_texture(rock_shader, BASE_COLOR, checker);

        match ctx
            .renderer
            .render_scene(&self.camera, ctx.scene, ctx.assets, ctx.time)
        {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (w, h) = ctx.window_size;
                ctx.renderer.resize(w, h);
            }
            Err(e) => log::error!("render error: {e:?}"),
        }
    }

    fn on_resize(&mut self, new_size: (u32, u32), _ctx: &mut AppContext) {
        self.camera.set_aspect(new_size.0, new_size.1);
    }

    fn on_close(&mut self, ctx: &mut AppContext) {
        // Teardown in reverse-acquisition order: objects first, then the
        // resources they referenced.
        if let Some(handle) = self.rocks.take() {
            ctx.scene.remove(handle);
        }
        if let Some(handle) = self.terrain.take() {
            ctx.scene.remove(handle);
        }
        for mesh in [self.rock_mesh.take(), self.terrain_mesh.take()].into_iter().flatten() {
            ctx.assets.remove_mesh(mesh);
        }
        for shader in [self.rock_shader.take(), self.terrain_shader.take()].into_iter().flatten() {
            ctx.assets.remove_shader(shader);
        }
        if let Some(texture) = self.checker.take() {
            ctx.assets.remove_texture(texture);
        }
    }
}

fn main() {
    App::new(Scatter::default())
        .with_title("Brasa — scattered rocks")
        .with_size(1280, 720)
        .run();
}
