//! Generation-checked pools for resources shared between scene objects.
//!
//! Meshes and shaders are referenced by many objects at once.  Instead of
//! raw shared pointers, they live in arenas and are addressed by typed
//! index handles: removing a resource invalidates every outstanding handle
//! to it (the generation no longer matches), so a stale reference is a
//! detectable `None` at lookup time rather than undefined behaviour.

use generational_arena::{Arena, Index};

use crate::resources::texture::Texture;
use crate::geometry::Mesh;
use crate::shader::{ShaderProgram, UniformId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub(crate) Index);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub(crate) Index);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub(crate) Index);

/// Application-owned storage for every shared GPU resource.
///
/// The renderer only ever borrows this; dropping an `Assets` releases all
/// contained GPU objects in one go (reverse-acquisition order is irrelevant
/// for pooled resources, wgpu handles retire safely on drop).
#[derive(Default)]
pub struct Assets {
    meshes: Arena<Mesh>,
    shaders: Arena<ShaderProgram>,
    textures: Arena<Texture>,
}

impl Assets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshHandle {
        MeshHandle(self.meshes.insert(mesh))
    }

    pub fn mesh(&self, handle: MeshHandle) -> Option<&Mesh> {
        self.meshes.get(handle.0)
    }

    /// Explicitly destroys a mesh.  Outstanding handles become stale and
    /// resolve to `None` from now on.
    pub fn remove_mesh(&mut self, handle: MeshHandle) -> Option<Mesh> {
        self.meshes.remove(handle.0)
    }

    pub fn add_shader(&mut self, shader: ShaderProgram) -> ShaderHandle {
        ShaderHandle(self.shaders.insert(shader))
    }

    pub fn shader(&self, handle: ShaderHandle) -> Option<&ShaderProgram> {
        self.shaders.get(handle.0)
    }

    pub fn shader_mut(&mut self, handle: ShaderHandle) -> Option<&mut ShaderProgram> {
        self.shaders.get_mut(handle.0)
    }

    pub fn remove_shader(&mut self, handle: ShaderHandle) -> Option<ShaderProgram> {
        self.shaders.remove(handle.0)
    }

    pub fn add_texture(&mut self, texture: Texture) -> TextureHandle {
        TextureHandle(self.textures.insert(texture))
    }

    pub fn texture(&self, handle: TextureHandle) -> Option<&Texture> {
        self.textures.get(handle.0)
    }

    pub fn texture_mut(&mut self, handle: TextureHandle) -> Option<&mut Texture> {
        self.textures.get_mut(handle.0)
    }

    pub fn remove_texture(&mut self, handle: TextureHandle) -> Option<Texture> {
        self.textures.remove(handle.0)
    }

    /// Assigns a pooled texture to a shader's material slot.  The two pools
    /// are disjoint fields, so both can be borrowed in one call; stale
    /// handles on either side degrade to a logged no-op.
    pub fn bind_texture(&mut self, shader: ShaderHandle, id: UniformId, texture: TextureHandle) {
        let Some(tex) = self.textures.get(texture.0) else {
            log::warn!("bind_texture: texture handle is stale");
            return;
        };
        match self.shaders.get_mut(shader.0) {
            Some(program) => program.set_texture(id, tex),
            None => log::warn!("bind_texture: shader handle is stale"),
        }
    }
}
