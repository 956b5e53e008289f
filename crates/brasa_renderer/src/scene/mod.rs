pub mod object;

pub use object::SceneObject;

use generational_arena::{Arena, Index};

/// Handle to a [`SceneObject`] stored in a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectHandle(pub(crate) Index);

/// Application-owned set of scene objects.
///
/// The renderer reads this every frame to rebuild its draw lists but never
/// destroys an object implicitly — lifetime stays with whoever owns the
/// scene.  Removal invalidates outstanding handles (generation check), so a
/// stale handle resolves to `None` instead of aliasing a new object.
#[derive(Default)]
pub struct Scene {
    objects: Arena<SceneObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: SceneObject) -> ObjectHandle {
        ObjectHandle(self.objects.insert(object))
    }

    pub fn remove(&mut self, handle: ObjectHandle) -> Option<SceneObject> {
        self.objects.remove(handle.0)
    }

    pub fn get(&self, handle: ObjectHandle) -> Option<&SceneObject> {
        self.objects.get(handle.0)
    }

    pub fn get_mut(&mut self, handle: ObjectHandle) -> Option<&mut SceneObject> {
        self.objects.get_mut(handle.0)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectHandle, &SceneObject)> {
        self.objects.iter().map(|(idx, obj)| (ObjectHandle(idx), obj))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::pool::{MeshHandle, ShaderHandle};
    use brasa_core::Transform;

    fn dummy_object() -> SceneObject {
        // Handles only need to carry a generation-checked index; a scratch
        // arena provides one without touching the GPU.
        let mut scratch = Arena::new();
        let mesh = MeshHandle(scratch.insert(0));
        let shader = ShaderHandle(scratch.insert(1));
        SceneObject::new(mesh, shader, Transform::IDENTITY)
    }

    #[test]
    fn stale_handle_is_detected_after_removal() {
        let mut scene = Scene::new();
        let handle = scene.add(dummy_object());
        assert!(scene.get(handle).is_some());

        scene.remove(handle);
        assert!(scene.get(handle).is_none());

        // A later insertion reuses the arena slot but not the generation.
        let newer = scene.add(dummy_object());
        assert!(scene.get(handle).is_none());
        assert!(scene.get(newer).is_some());
    }
}
