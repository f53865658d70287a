//! Camera for view and projection matrix generation.

use glam::{Mat4, Vec3};

/// A fixed look-at camera in front of the scene.
///
/// Matrices are recomputed from the current fields on every call; nothing is
/// cached between frames.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Position in world space.
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Up direction, normally +Y.
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect_ratio: f32,
    /// Near clip plane distance (always positive).
    pub near: f32,
    /// Far clip plane distance (always positive, > near).
    pub far: f32,
}

impl Camera {
    /// Compute the right-handed look-at view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Compute the perspective projection matrix with reverse-Z.
    pub fn projection_matrix(&self) -> Mat4 {
        // Reverse-Z: near plane maps to z=1, far plane maps to z=0.
        // This is handled by swapping near/far in the projection matrix.
        Mat4::perspective_rh(
            self.fov_y,
            self.aspect_ratio,
            self.far,  // swapped: far as "near" parameter
            self.near, // swapped: near as "far" parameter
        )
    }

    /// Compute the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Per-frame update hook. The camera is static, so this does nothing,
    /// but the render loop calls it unconditionally at the top of every
    /// frame so a moving camera can be dropped in without touching the loop.
    pub fn update(&mut self) {}

    /// Update the aspect ratio after a window resize.
    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        self.aspect_ratio = width / height.max(1.0);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: std::f32::consts::FRAC_PI_4, // 45 degrees
            aspect_ratio: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn test_default_camera_looks_at_origin() {
        let camera = Camera::default();
        let view = camera.view_matrix();
        // The origin should land on the view-space -Z axis, 5 units away.
        let origin = view * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(origin.x.abs() < 1e-6);
        assert!(origin.y.abs() < 1e-6);
        assert!((origin.z + 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_default_fov_is_45_degrees() {
        let camera = Camera::default();
        assert!((camera.fov_y - FRAC_PI_4).abs() < 1e-6);
    }

    #[test]
    fn test_set_aspect_ratio() {
        let mut camera = Camera::default();
        camera.set_aspect_ratio(1920.0, 1080.0);
        assert!((camera.aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_set_aspect_ratio_zero_height() {
        let mut camera = Camera::default();
        camera.set_aspect_ratio(800.0, 0.0);
        assert!(camera.aspect_ratio.is_finite());
    }

    #[test]
    fn test_reverse_z_near_maps_to_one() {
        let camera = Camera::default();
        let proj = camera.projection_matrix();
        // A point on the near plane should project to depth 1.
        let near_point = proj * Vec4::new(0.0, 0.0, -camera.near, 1.0);
        let ndc_z = near_point.z / near_point.w;
        assert!((ndc_z - 1.0).abs() < 1e-4);
        // A point on the far plane should project to depth 0.
        let far_point = proj * Vec4::new(0.0, 0.0, -camera.far, 1.0);
        let ndc_z = far_point.z / far_point.w;
        assert!(ndc_z.abs() < 1e-4);
    }

    #[test]
    fn test_view_projection_combines_correctly() {
        let camera = Camera::default();
        let vp = camera.view_projection_matrix();
        let expected = camera.projection_matrix() * camera.view_matrix();
        for col in 0..4 {
            for row in 0..4 {
                assert!(
                    (vp.col(col)[row] - expected.col(col)[row]).abs() < 1e-6,
                    "mismatch at col={col}, row={row}"
                );
            }
        }
    }

    #[test]
    fn test_update_is_stable() {
        let mut camera = Camera::default();
        let before = camera.view_projection_matrix();
        camera.update();
        let after = camera.view_projection_matrix();
        assert_eq!(before, after);
    }
}
