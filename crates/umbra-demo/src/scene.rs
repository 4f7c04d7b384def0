//! One-time scene composition: camera, lights, the boiling sphere and the
//! shadow-receiving plane.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;
use umbra_engine::paint::Color;
use umbra_engine::scene::{
    AmbientLight, DirectionalLight, Geometry, Material, MaterialId, Mesh, MeshId,
    PerspectiveCamera, Scene, ShaderMaterialDesc, ShadowDepth,
};
use umbra_engine::shader::{Defines, DepthPacking, ShaderError, ShaderLib, Uniforms};

use crate::config::DemoConfig;
use crate::shaders;

/// Ids of the scene parts the frame loop and the toggle touch.
#[derive(Debug, Copy, Clone)]
pub struct SceneHandles {
    pub sphere: MeshId,
    pub color_material: MaterialId,
    pub depth_material: MaterialId,
}

/// Library lambert lighting over the displaced vertex stage.
pub fn color_material(diffuse: Color) -> Result<Material, ShaderError> {
    let desc = ShaderMaterialDesc::from_program("boiling sphere", &ShaderLib::lambert())
        .with_vertex_shader(shaders::COLOR_VERTEX)
        .merge_uniforms(Uniforms::new().with("diffuse", diffuse).with("time", 0.0))
        .with_chunks(shaders::chunks());
    Material::new(desc)
}

/// Library RGBA depth packing over the displaced vertex stage.
pub fn depth_material() -> Result<Material, ShaderError> {
    let desc = ShaderMaterialDesc::from_program("boiling sphere depth", &ShaderLib::depth())
        .with_vertex_shader(shaders::DEPTH_VERTEX)
        .merge_uniforms(Uniforms::new().with("time", 0.0))
        .with_defines(Defines::new().with(DepthPacking::DEFINE, DepthPacking::Rgba.define_value()))
        .with_chunks(shaders::chunks());
    Material::new(desc)
}

pub fn camera(config: &DemoConfig, aspect: f32) -> PerspectiveCamera {
    let mut camera = PerspectiveCamera::new(config.fov_y_deg, aspect, config.near, config.far);
    camera.transform.position = Vec3::new(0.0, 0.0, config.camera_distance);
    camera
}

pub fn compose(config: &DemoConfig) -> Result<(Scene, SceneHandles), ShaderError> {
    let mut scene = Scene::new();

    let color_material = scene.add_material(color_material(config.sphere_color)?);
    let depth_material = scene.add_material(depth_material()?);
    let plane_material = scene.add_material(Material::lambert(Color::WHITE)?);

    let (ws, hs) = config.sphere_segments;
    let mut sphere = Mesh::new("sphere", Geometry::sphere(1.0, ws, hs), color_material);
    sphere.cast_shadow = true;
    sphere.shadow_depth = if config.use_custom_depth_material {
        ShadowDepth::Custom(depth_material)
    } else {
        ShadowDepth::EngineDefault
    };
    let sphere = scene.add_mesh(sphere);

    let mut plane = Mesh::new("plane", Geometry::plane(config.plane_size, config.plane_size), plane_material);
    plane.transform.position.y = config.plane_height;
    plane.transform.rotation.x = -FRAC_PI_2;
    plane.receive_shadow = true;
    scene.add_mesh(plane);

    scene.directional = Some(DirectionalLight { cast_shadow: true, ..DirectionalLight::default() });
    scene.ambient = AmbientLight::new(config.ambient_color);

    log::info!(
        "scene composed: {} meshes, custom shadow depth = {}",
        scene.meshes().count(),
        config.use_custom_depth_material
    );

    Ok((scene, SceneHandles { sphere, color_material, depth_material }))
}
