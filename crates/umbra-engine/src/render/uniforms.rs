//! Host-side mirrors of the engine-owned uniform blocks in the `common` and
//! `lights_pars` chunks. Field order and padding must match the WGSL.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::scene::{AmbientLight, DirectionalLight, Mesh, PerspectiveCamera};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 4],
}

impl CameraUniform {
    pub fn from_camera(camera: &PerspectiveCamera) -> Self {
        Self::new(camera.view_proj(), camera.position())
    }

    pub fn new(view_proj: Mat4, position: Vec3) -> Self {
        Self { view_proj: view_proj.to_cols_array_2d(), position: position.extend(1.0).to_array() }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct EntityUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub flags: [f32; 4],
}

impl EntityUniform {
    pub fn from_mesh(mesh: &Mesh) -> Self {
        Self {
            model: mesh.transform.matrix().to_cols_array_2d(),
            normal_matrix: mesh.transform.normal_matrix().to_cols_array_2d(),
            flags: [if mesh.receive_shadow { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct LightUniform {
    pub ambient: [f32; 4],
    pub direction: [f32; 4],
    pub color: [f32; 4],
    pub shadow_matrix: [[f32; 4]; 4],
    pub shadow: [f32; 4],
}

impl LightUniform {
    /// `shadows` says whether the shadow map holds this frame's depth.
    pub fn new(ambient: &AmbientLight, directional: Option<&DirectionalLight>, shadows: bool) -> Self {
        let [ar, ag, ab] = ambient.radiance().rgb();
        let mut u = Self {
            ambient: [ar, ag, ab, 1.0],
            direction: [0.0, 1.0, 0.0, 0.0],
            color: [0.0; 4],
            shadow_matrix: Mat4::IDENTITY.to_cols_array_2d(),
            shadow: [0.0; 4],
        };

        if let Some(light) = directional {
            let [r, g, b] = light.radiance().rgb();
            u.direction = light.direction().extend(0.0).to_array();
            u.color = [r, g, b, 1.0];
            if shadows {
                u.shadow_matrix = light.shadow_view_proj().to_cols_array_2d();
                u.shadow = [1.0, light.shadow.bias, light.shadow.map_size as f32, 0.0];
            }
        }
        u
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;

    #[test]
    fn sizes_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
        assert_eq!(std::mem::size_of::<EntityUniform>(), 144);
        assert_eq!(std::mem::size_of::<LightUniform>(), 128);
    }

    #[test]
    fn shadow_block_stays_off_without_shadows() {
        let light = DirectionalLight { cast_shadow: true, ..DirectionalLight::default() };
        let u = LightUniform::new(&AmbientLight::new(Color::from_hex(0x404040)), Some(&light), false);
        assert_eq!(u.shadow[0], 0.0);
        assert_eq!(u.color, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn shadow_block_carries_map_settings() {
        let light = DirectionalLight { cast_shadow: true, ..DirectionalLight::default() };
        let u = LightUniform::new(&AmbientLight::default(), Some(&light), true);
        assert_eq!(u.shadow, [1.0, 0.0, 512.0, 0.0]);
        assert_eq!(u.direction, [0.0, 1.0, 0.0, 0.0]);
    }
}
