use crate::paint::Color;

use super::{AmbientLight, DirectionalLight, Material, Mesh};

/// Index of a material in its [`Scene`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MaterialId(usize);

/// Index of a mesh in its [`Scene`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MeshId(usize);

/// Flat list of meshes plus the materials and lights they are drawn with.
///
/// Nothing is ever removed, so ids stay valid for the scene's lifetime.
#[derive(Debug, Default)]
pub struct Scene {
    materials: Vec<Material>,
    meshes: Vec<Mesh>,
    pub ambient: AmbientLight,
    pub directional: Option<DirectionalLight>,
    /// Overrides the renderer's clear color.
    pub background: Option<Color>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    pub fn material_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id.0)
    }

    pub fn materials(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials.iter().enumerate().map(|(i, m)| (MaterialId(i), m))
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshId {
        self.meshes.push(mesh);
        MeshId(self.meshes.len() - 1)
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id.0)
    }

    pub fn mesh_mut(&mut self, id: MeshId) -> Option<&mut Mesh> {
        self.meshes.get_mut(id.0)
    }

    pub fn meshes(&self) -> impl Iterator<Item = (MeshId, &Mesh)> {
        self.meshes.iter().enumerate().map(|(i, m)| (MeshId(i), m))
    }

    /// True if any visible mesh casts and a directional light casts.
    pub fn has_shadow_casters(&self) -> bool {
        self.directional.is_some_and(|l| l.cast_shadow)
            && self.meshes.iter().any(|m| m.visible && m.cast_shadow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Geometry, ShadowDepth};
    use crate::shader::DepthPacking;

    fn scene_with_sphere() -> (Scene, MeshId, MaterialId) {
        let mut scene = Scene::new();
        let lit = scene.add_material(Material::lambert(Color::WHITE).unwrap());
        let depth = scene.add_material(Material::depth(DepthPacking::Rgba).unwrap());

        let mut sphere = Mesh::new("sphere", Geometry::sphere(1.0, 8, 6), lit);
        sphere.shadow_depth = ShadowDepth::Custom(depth);
        sphere.cast_shadow = true;
        let id = scene.add_mesh(sphere);
        (scene, id, depth)
    }

    #[test]
    fn ids_resolve_to_what_was_added() {
        let (scene, mesh, depth) = scene_with_sphere();
        assert_eq!(scene.mesh(mesh).map(|m| m.label.as_str()), Some("sphere"));
        assert_eq!(scene.material(depth).and_then(|m| m.depth_packing()), Some(DepthPacking::Rgba));
        assert_eq!(scene.materials().count(), 2);
    }

    #[test]
    fn shadow_depth_choice_is_swappable() {
        let (mut scene, mesh, depth) = scene_with_sphere();
        let m = scene.mesh_mut(mesh).unwrap();
        m.shadow_depth = ShadowDepth::EngineDefault;
        assert!(!m.shadow_depth.is_custom());
        m.shadow_depth = ShadowDepth::Custom(depth);
        assert!(m.shadow_depth.is_custom());
    }

    #[test]
    fn casters_need_a_casting_light() {
        let (mut scene, _, _) = scene_with_sphere();
        assert!(!scene.has_shadow_casters());

        scene.directional = Some(DirectionalLight { cast_shadow: true, ..DirectionalLight::default() });
        assert!(scene.has_shadow_casters());
    }
}
