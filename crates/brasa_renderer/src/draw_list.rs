//! Ordered, clearable batches of scene objects.
//!
//! Draw lists are rebuilt from scratch every frame — an O(N) sweep over the
//! scene set, with no incremental diffing.  Partitioning is by predicate:
//! transparent objects go to the transparent list, everything else to the
//! opaque list, and shadow casters are collected independently.  After
//! partitioning each list is stably sorted by `queue_order`, preserving
//! insertion order between equal keys.

use crate::context::GpuContext;
use crate::graph::frame_packet::DrawCommand;
use crate::graph::targets::TargetState;
use crate::object_buffer::ObjectBuffer;
use crate::resources::pool::{Assets, ShaderHandle};
use crate::scene::{ObjectHandle, Scene};

/// Caller-supplied settings for a batch draw.
#[derive(Default)]
pub struct DrawSettings {
    /// When set, every object in the batch draws with this shader instead
    /// of its own (single-shader override, shadow-pass style).
    pub override_shader: Option<ShaderHandle>,
}

/// An ordered sequence of scene object references.  No ownership: entries
/// are handles resolved against the scene at draw time.
pub struct DrawList {
    pub name: &'static str,
    items: Vec<ObjectHandle>,
}

impl DrawList {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            items: Vec::with_capacity(16),
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn add(&mut self, handle: ObjectHandle) {
        self.items.push(handle);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[ObjectHandle] {
        &self.items
    }

    /// Stable sort by the objects' `queue_order`.  Handles that no longer
    /// resolve keep their position and are skipped later, at resolve time.
    pub fn sort_by_queue_order(&mut self, scene: &Scene) {
        self.items
            .sort_by_key(|h| scene.get(*h).map_or(0, |obj| obj.queue_order));
    }

    /// Resolves the list into draw commands, one per live object, in list
    /// order.  Each resolved object writes its world matrix into its slot
    /// of the object constants buffer (`base_slot + position`).
    ///
    /// Stale handles and missing pool resources are skipped with a warning
    /// — the generation check turns would-be dangling references into
    /// observable no-ops.
    #[allow(clippy::too_many_arguments)]
    pub fn resolve(
        &self,
        ctx: &GpuContext,
        scene: &Scene,
        assets: &mut Assets,
        settings: &DrawSettings,
        state: &TargetState,
        objects: &ObjectBuffer,
        base_slot: usize,
    ) -> Vec<DrawCommand> {
        let mut commands = Vec::with_capacity(self.items.len());

        for (position, handle) in self.items.iter().enumerate() {
            let Some(object) = scene.get(*handle) else {
                log::warn!("{}: stale object handle, skipping draw", self.name);
                continue;
            };
            let Some(mesh) = assets.mesh(object.mesh) else {
                log::warn!("{}: object references a removed mesh", self.name);
                continue;
            };
            let (vertex_buffer, index_buffer, index_count) = (
                mesh.vertex_buffer.clone(),
                mesh.index_buffer.clone(),
                mesh.index_count,
            );

            let shader_handle = settings.override_shader.unwrap_or(object.shader);
            let instances = object
                .instanced()
                .map(|inst| (inst.bind_group.clone(), inst.instance_count));

            let Some(shader) = assets.shader_mut(shader_handle) else {
                log::warn!("{}: object references a removed shader", self.name);
                continue;
            };
            if shader.is_instanced() && instances.is_none() {
                log::warn!(
                    "{}: instanced shader on an object without instance data, skipping",
                    self.name
                );
                continue;
            }

            let slot = base_slot + position;
            objects.write(&ctx.queue, slot, &object.transform.local_to_world());

            commands.push(DrawCommand {
                pipeline: shader.pipeline(&ctx.device, state),
                material_bind_group: shader.material_bind_group(&ctx.device, &ctx.defaults),
                object_offset: objects.offset(slot),
                vertex_buffer,
                index_buffer,
                index_count,
                instances: if shader.is_instanced() { instances } else { None },
            });
        }

        commands
    }
}

/// Rebuilds the three standard lists from the full scene set.
///
/// Every object lands in exactly one of {opaque, transparent} and,
/// orthogonally, in the shadow-caster list iff `cast_shadows`.
pub fn partition_scene(
    scene: &Scene,
    opaque: &mut DrawList,
    transparent: &mut DrawList,
    shadow_casters: &mut DrawList,
) {
    opaque.clear();
    transparent.clear();
    shadow_casters.clear();

    for (handle, object) in scene.iter() {
        if object.is_transparent {
            transparent.add(handle);
        } else {
            opaque.add(handle);
        }
        if object.cast_shadows {
            shadow_casters.add(handle);
        }
    }

    opaque.sort_by_queue_order(scene);
    transparent.sort_by_queue_order(scene);
    shadow_casters.sort_by_queue_order(scene);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::pool::{MeshHandle, ShaderHandle};
    use crate::scene::SceneObject;
    use brasa_core::Transform;
    use generational_arena::Arena;

    fn object(transparent: bool, shadows: bool, queue_order: i32) -> SceneObject {
        let mut scratch = Arena::new();
        let mesh = MeshHandle(scratch.insert(0));
        let shader = ShaderHandle(scratch.insert(1));
        let mut obj = SceneObject::new(mesh, shader, Transform::IDENTITY);
        obj.is_transparent = transparent;
        obj.cast_shadows = shadows;
        obj.queue_order = queue_order;
        obj
    }

    fn lists() -> (DrawList, DrawList, DrawList) {
        (
            DrawList::new("Opaque Objects"),
            DrawList::new("Transparent Objects"),
            DrawList::new("Shadow Casters"),
        )
    }

    #[test]
    fn every_object_lands_in_exactly_one_color_list() {
        let mut scene = Scene::new();
        for i in 0..20 {
            scene.add(object(i % 3 == 0, i % 2 == 0, 0));
        }
        let (mut opaque, mut transparent, mut shadows) = lists();
        partition_scene(&scene, &mut opaque, &mut transparent, &mut shadows);

        assert_eq!(opaque.len() + transparent.len(), scene.len());
        for (handle, obj) in scene.iter() {
            let in_opaque = opaque.items().contains(&handle);
            let in_transparent = transparent.items().contains(&handle);
            assert!(in_opaque != in_transparent);
            assert_eq!(in_transparent, obj.is_transparent);
            assert_eq!(shadows.items().contains(&handle), obj.cast_shadows);
        }
    }

    #[test]
    fn lists_are_rebuilt_not_appended() {
        let mut scene = Scene::new();
        scene.add(object(false, true, 0));
        let (mut opaque, mut transparent, mut shadows) = lists();

        partition_scene(&scene, &mut opaque, &mut transparent, &mut shadows);
        partition_scene(&scene, &mut opaque, &mut transparent, &mut shadows);

        assert_eq!(opaque.len(), 1);
        assert_eq!(shadows.len(), 1);
        assert!(transparent.is_empty());
    }

    #[test]
    fn queue_order_sorts_stably() {
        let mut scene = Scene::new();
        let high = scene.add(object(false, false, 10));
        let low_first = scene.add(object(false, false, 0));
        let low_second = scene.add(object(false, false, 0));

        let (mut opaque, mut transparent, mut shadows) = lists();
        partition_scene(&scene, &mut opaque, &mut transparent, &mut shadows);

        let pos = |h| opaque.items().iter().position(|x| *x == h).unwrap();
        assert_eq!(pos(high), 2, "highest queue order draws last");
        // Equal keys keep scene iteration order.
        assert!(pos(low_first) < pos(low_second));
    }
}
