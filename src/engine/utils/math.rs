use glam::{Mat4, Vec3};

use crate::engine::config::ProjectionConfig;

/// Distance the pyramid is pushed back from the camera.
pub const MODEL_DEPTH: f32 = -2.5;
/// Axis the pyramid spins around (normalized when the matrix is built).
pub const ROTATION_AXIS: Vec3 = Vec3::new(1.0, 0.3, 0.75);
/// Fixed uniform draw scale.
pub const MODEL_SCALE: f32 = 0.5;

/// `translate(offset, 0, -2.5) * rotate(angle, axis) * scale(0.5)`.
pub fn model_matrix(offset: f32, angle_radians: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(offset, 0.0, MODEL_DEPTH))
        * Mat4::from_axis_angle(ROTATION_AXIS.normalize(), angle_radians)
        * Mat4::from_scale(Vec3::splat(MODEL_SCALE))
}

/// Right-handed perspective with OpenGL's [-1, 1] clip depth.
pub fn projection_matrix(projection: &ProjectionConfig, aspect_ratio: f32) -> Mat4 {
    Mat4::perspective_rh_gl(
        projection.fov_y_degrees.to_radians(),
        aspect_ratio,
        projection.near,
        projection.far,
    )
}

/// Width over height, falling back to 1 for a zero-height framebuffer.
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    if height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}
