//! A drawable scene entry: mesh + shader + transform + render flags.
//!
//! Mesh and shader are generation-checked handles into the shared
//! [`crate::resources::Assets`] pools — many objects can reference the same
//! resources, and disposing a resource while objects still point at it is
//! caught at draw resolution instead of being undefined behaviour.

use brasa_core::Transform;

use crate::geometry::instancing::{InstanceData, InstancedMesh};
use crate::resources::pool::{MeshHandle, ShaderHandle};
use crate::shader::layouts::SharedLayouts;

pub struct SceneObject {
    pub mesh: MeshHandle,
    pub shader: ShaderHandle,
    pub transform: Transform,
    /// Routes the object into the transparent draw list instead of opaque.
    pub is_transparent: bool,
    /// Additionally routes the object into the shadow-caster list.
    pub cast_shadows: bool,
    /// Sort key within a draw list; lower values draw first.
    pub queue_order: i32,
    instanced: Option<InstancedMesh>,
}

impl SceneObject {
    pub fn new(mesh: MeshHandle, shader: ShaderHandle, transform: Transform) -> Self {
        Self {
            mesh,
            shader,
            transform,
            is_transparent: false,
            cast_shadows: false,
            queue_order: 0,
            instanced: None,
        }
    }

    /// Attaches (or replaces) the instanced draw extension.  The previous
    /// instance buffer, if any, is dropped here — one extension per object.
    pub fn set_instances(
        &mut self,
        device: &wgpu::Device,
        layouts: &SharedLayouts,
        instances: &[InstanceData],
    ) {
        self.instanced = Some(InstancedMesh::new(device, layouts, instances));
    }

    /// Detaches the instanced extension, reverting to plain mesh draws.
    pub fn clear_instances(&mut self) {
        self.instanced = None;
    }

    pub fn instanced(&self) -> Option<&InstancedMesh> {
        self.instanced.as_ref()
    }
}
