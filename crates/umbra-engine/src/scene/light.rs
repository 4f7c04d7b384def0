use glam::{Mat4, Vec3};

use crate::paint::Color;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

impl AmbientLight {
    pub fn new(color: Color) -> Self {
        Self { color, intensity: 1.0 }
    }

    /// Color with intensity folded in, as uploaded.
    pub fn radiance(&self) -> Color {
        self.color.scaled(self.intensity)
    }
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self { color: Color::BLACK, intensity: 1.0 }
    }
}

/// Orthographic shadow camera and map settings of a directional light.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ShadowConfig {
    /// Square shadow map edge, in texels.
    pub map_size: u32,
    /// Added to the receiver's light-space depth before comparison.
    pub bias: f32,
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            map_size: 512,
            bias: 0.0,
            left: -5.0,
            right: 5.0,
            bottom: -5.0,
            top: 5.0,
            near: 0.5,
            far: 500.0,
        }
    }
}

/// Parallel light shining from `position` towards `target`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub cast_shadow: bool,
    pub shadow: ShadowConfig,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 1.0,
            position: Vec3::Y,
            target: Vec3::ZERO,
            cast_shadow: false,
            shadow: ShadowConfig::default(),
        }
    }
}

impl DirectionalLight {
    pub fn new(color: Color, intensity: f32) -> Self {
        Self { color, intensity, ..Self::default() }
    }

    pub fn radiance(&self) -> Color {
        self.color.scaled(self.intensity)
    }

    /// Unit vector pointing from the target towards the light.
    pub fn direction(&self) -> Vec3 {
        (self.position - self.target).normalize_or_zero()
    }

    /// World → shadow-map clip space.
    pub fn shadow_view_proj(&self) -> Mat4 {
        let s = &self.shadow;
        let proj = Mat4::orthographic_rh(s.left, s.right, s.bottom, s.top, s.near, s.far);

        // Looking straight along Y leaves Y unusable as "up".
        let up = if self.direction().cross(Vec3::Y).length_squared() < 1e-8 {
            Vec3::NEG_Z
        } else {
            Vec3::Y
        };
        proj * Mat4::look_at_rh(self.position, self.target, up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_ndc(m: Mat4, p: Vec3) -> Vec3 {
        let clip = m * p.extend(1.0);
        clip.truncate() / clip.w
    }

    #[test]
    fn default_light_points_down_from_above() {
        let light = DirectionalLight::default();
        assert_eq!(light.direction(), Vec3::Y);
    }

    #[test]
    fn overhead_shadow_camera_is_well_formed() {
        let m = DirectionalLight::default().shadow_view_proj();
        assert!(m.is_finite());

        // The plane below the light lands inside the depth range.
        let ndc = to_ndc(m, Vec3::new(0.0, -1.5, 0.0));
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn nearer_points_have_smaller_depth() {
        let m = DirectionalLight::default().shadow_view_proj();
        let high = to_ndc(m, Vec3::new(0.5, -0.5, 0.2));
        let low = to_ndc(m, Vec3::new(0.5, -1.5, 0.2));
        assert!(high.z < low.z);
    }

    #[test]
    fn ortho_extent_maps_to_ndc_edges() {
        let m = DirectionalLight::default().shadow_view_proj();
        let corner = to_ndc(m, Vec3::new(5.0, -1.0, 5.0));
        assert!((corner.x.abs() - 1.0).abs() < 1e-5);
        assert!((corner.y.abs() - 1.0).abs() < 1e-5);
    }
}
