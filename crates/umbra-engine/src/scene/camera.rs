use glam::{Mat4, Vec3};

use super::Transform;

/// Perspective camera looking down its local -Z axis.
///
/// The projection matrix is cached: after changing `fov_y_deg`, `aspect`,
/// `near` or `far`, call [`update_projection_matrix`](Self::update_projection_matrix).
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub transform: Transform,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(fov_y_deg: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov_y_deg,
            aspect,
            near,
            far,
            transform: Transform::default(),
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    /// Recomputes the cached projection (depth mapped to `[0, 1]`).
    pub fn update_projection_matrix(&mut self) {
        self.projection =
            Mat4::perspective_rh(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far);
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view(&self) -> Mat4 {
        self.transform.matrix().inverse()
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection * self.view()
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_is_stale_until_updated() {
        let mut cam = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0);
        let before = cam.projection();

        cam.aspect = 800.0 / 600.0;
        assert_eq!(cam.projection(), before);

        cam.update_projection_matrix();
        assert_ne!(cam.projection(), before);
    }

    #[test]
    fn aspect_scales_x_only() {
        let square = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0).projection();
        let wide = PerspectiveCamera::new(75.0, 2.0, 0.1, 100.0).projection();
        assert!((wide.x_axis.x * 2.0 - square.x_axis.x).abs() < 1e-6);
        assert_eq!(wide.y_axis.y, square.y_axis.y);
    }

    #[test]
    fn origin_projects_to_screen_centre_from_z4() {
        let mut cam = PerspectiveCamera::new(75.0, 4.0 / 3.0, 0.1, 100.0);
        cam.transform.position = Vec3::new(0.0, 0.0, 4.0);

        let clip = cam.view_proj() * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
