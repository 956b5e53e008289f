//! Perspective camera owned by the application.
//!
//! The camera is plain CPU state: a [`Transform`] placing it in the world
//! plus the perspective projection parameters.  The renderer derives the
//! view matrix by inverting the camera's world matrix each frame; GPU
//! resources (the frame uniform buffer) stay on the renderer side.

use glam::Mat4;

use crate::transform::Transform;

/// Perspective camera used by both the renderer and application code.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Vertical field of view in degrees.
    pub field_of_view: f32,
    /// Width / height of the output surface.
    pub aspect_ratio: f32,
    pub near_plane: f32,
    pub far_plane: f32,
    /// World placement; the view matrix is this transform inverted.
    pub transform: Transform,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            field_of_view: 60.0,
            aspect_ratio: 16.0 / 9.0,
            near_plane: 0.3,
            far_plane: 1000.0,
            transform: Transform::IDENTITY,
        }
    }
}

impl Camera {
    /// Perspective projection with depth mapped to wgpu's `[0, 1]` range.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.field_of_view.to_radians(),
            self.aspect_ratio,
            self.near_plane,
            self.far_plane,
        )
    }

    /// World-to-view matrix: the inverse of the camera's world placement.
    pub fn view_matrix(&self) -> Mat4 {
        self.transform.local_to_world().inverse()
    }

    /// Combined view-projection matrix for the frame constants.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Update the aspect ratio when the output surface is resized.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect_ratio = width as f32 / height as f32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn set_aspect_from_surface_size() {
        let mut cam = Camera::default();
        cam.set_aspect(1920, 1080);
        assert!((cam.aspect_ratio - 1920.0 / 1080.0).abs() < 1e-6);
        // A zero height must not poison the ratio with a division by zero.
        cam.set_aspect(800, 0);
        assert!((cam.aspect_ratio - 1920.0 / 1080.0).abs() < 1e-6);
    }

    #[test]
    fn view_is_inverse_of_world() {
        let mut cam = Camera::default();
        cam.transform.position = Vec3::new(0.0, 2.0, 5.0);
        let round_trip = cam.view_matrix() * cam.transform.local_to_world();
        assert!((round_trip - Mat4::IDENTITY).abs_diff_eq(Mat4::ZERO, 1e-5));
    }

    #[test]
    fn projection_maps_near_plane_to_zero_depth() {
        let cam = Camera::default();
        let p = cam.projection_matrix() * glam::Vec4::new(0.0, 0.0, -cam.near_plane, 1.0);
        let ndc_z = p.z / p.w;
        assert!(ndc_z.abs() < 1e-5, "near plane should land at depth 0, got {ndc_z}");
    }
}
