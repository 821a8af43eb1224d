//! Camera system: cached perspective projection and a time-driven swaying rig.

use glam::{Mat4, Vec3};

use crate::params::{CameraRig, RenderConfig};

/// Camera system with a cached projection and a stateless model-view
pub struct CameraSystem {
    rig: CameraRig,
    fov_radians: f32,
    near_plane: f32,
    far_plane: f32,
    viewport: (u32, u32),
    projection: Mat4,
}

impl CameraSystem {
    /// Create camera system for an initial viewport size (pixels)
    pub fn new(rig: CameraRig, render_config: &RenderConfig, viewport: (u32, u32)) -> Self {
        let fov_radians = render_config.fov_degrees.to_radians();
        let near_plane = render_config.near_plane;
        let far_plane = render_config.far_plane;

        Self {
            rig,
            fov_radians,
            near_plane,
            far_plane,
            viewport,
            projection: Self::perspective(fov_radians, aspect(viewport), near_plane, far_plane),
        }
    }

    /// Update the viewport, recomputing the projection only when it changed
    ///
    /// # Returns
    /// Whether the projection was recomputed
    pub fn set_viewport(&mut self, width: u32, height: u32) -> bool {
        if self.viewport == (width, height) {
            return false;
        }
        self.viewport = (width, height);
        self.projection = Self::perspective(
            self.fov_radians,
            aspect(self.viewport),
            self.near_plane,
            self.far_plane,
        );
        true
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// Yaw (degrees) at the given timestamp
    pub fn yaw_degrees(&self, time_ms: f64) -> f32 {
        let sway = (time_ms * self.rig.sway_rate_per_ms).sin() as f32;
        self.rig.yaw_base_degrees + self.rig.yaw_sway_degrees * sway
    }

    /// Model-view matrix at the given timestamp
    ///
    /// Pure function of time: no state is accumulated between frames.
    pub fn model_view(&self, time_ms: f64) -> Mat4 {
        let pitch = self.rig.pitch_degrees.to_radians();
        let yaw = self.yaw_degrees(time_ms).to_radians();
        let roll = self.rig.roll_degrees.to_radians();

        Mat4::from_translation(Vec3::from_array(self.rig.translation))
            * Mat4::from_rotation_z(roll)
            * Mat4::from_rotation_y(yaw)
            * Mat4::from_rotation_x(pitch)
    }

    /// Create world-view-projection matrix for rendering
    pub fn world_view_projection(&self, time_ms: f64) -> Mat4 {
        self.projection * self.model_view(time_ms)
    }

    /// Symmetric perspective frustum (right-handed, depth in [0, 1])
    fn perspective(fov_radians: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective_rh(fov_radians, aspect, near, far)
    }
}

fn aspect((width, height): (u32, u32)) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> CameraSystem {
        CameraSystem::new(CameraRig::default(), &RenderConfig::default(), (900, 550))
    }

    #[test]
    fn test_projection_matches_frustum() {
        let camera = camera();
        let projection = camera.projection();

        let f = 1.0 / (55.0_f32.to_radians() / 2.0).tan();
        let aspect = 900.0 / 550.0;

        assert!((projection.x_axis.x - f / aspect).abs() < 1e-5);
        assert!((projection.y_axis.y - f).abs() < 1e-5);
        assert_eq!(projection.z_axis.w, -1.0);
    }

    #[test]
    fn test_projection_is_cached_until_resize() {
        let mut camera = camera();
        let before = camera.projection();

        assert!(!camera.set_viewport(900, 550));
        assert_eq!(camera.projection(), before);

        assert!(camera.set_viewport(1200, 600));
        assert_ne!(camera.projection(), before);
        assert!((camera.projection().x_axis.x * 2.0 - camera.projection().y_axis.y).abs() < 1e-5);
    }

    #[test]
    fn test_zero_height_viewport_stays_finite() {
        let mut camera = camera();
        camera.set_viewport(800, 0);

        assert!(camera.projection().to_cols_array().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_yaw_sway() {
        let camera = camera();

        assert!((camera.yaw_degrees(0.0) - 270.0).abs() < 1e-5);

        // sin(t * 0.0005) peaks at t = π / 0.001
        let peak_ms = std::f64::consts::PI / 0.001;
        assert!((camera.yaw_degrees(peak_ms) - 300.0).abs() < 1e-3);

        for t in 0..200 {
            let yaw = camera.yaw_degrees(t as f64 * 997.0);
            assert!((240.0..=300.0).contains(&yaw));
        }
    }

    #[test]
    fn test_model_view_is_pure_function_of_time() {
        let camera = camera();

        let first = camera.model_view(123_456.0);
        let _ = camera.model_view(999.0);
        let second = camera.model_view(123_456.0);

        assert_eq!(first, second);
    }

    #[test]
    fn test_model_view_matches_euler_composition() {
        let camera = camera();
        let t = 4_321.0;

        let (x, y, z) = (
            (-180.0_f32).to_radians(),
            camera.yaw_degrees(t).to_radians(),
            90.0_f32.to_radians(),
        );
        let (cx, sx) = (x.cos(), x.sin());
        let (cy, sy) = (y.cos(), y.sin());
        let (cz, sz) = (z.cos(), z.sin());

        let expected = Mat4::from_cols_array(&[
            cy * cz,
            cy * sz,
            -sy,
            0.0,
            sx * sy * cz - cx * sz,
            sx * sy * sz + cx * cz,
            sx * cy,
            0.0,
            cx * sy * cz + sx * sz,
            cx * sy * sz - sx * cz,
            cx * cy,
            0.0,
            0.0,
            -2.0,
            -9.0,
            1.0,
        ]);

        assert!(camera.model_view(t).abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_world_view_projection_places_mesh_in_front() {
        let camera = camera();
        let clip = camera.world_view_projection(0.0) * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);

        // Mesh center is pulled 9 units away: inside the near/far range
        assert!(clip.w > 1.0 && clip.w < 100.0);
        let depth = clip.z / clip.w;
        assert!((0.0..=1.0).contains(&depth));
    }
}
