use std::sync::atomic::{AtomicU64, Ordering};

use crate::paint::Color;
use crate::shader::{
    expand, groups, validate_wgsl, ChunkSet, Defines, DepthPacking, ProgramSource, ShaderError,
    ShaderLib, ShaderStage, UniformLayout, UniformValue, Uniforms,
};

static NEXT_MATERIAL_UID: AtomicU64 = AtomicU64::new(1);

/// Everything needed to build a [`Material`].
///
/// Stage sources may `#include` library chunks, chunks from `chunks`, and
/// `material_uniforms` (generated from `uniforms`).
#[derive(Debug, Clone)]
pub struct ShaderMaterialDesc<'a> {
    pub label: &'a str,
    pub vertex_shader: &'a str,
    pub fragment_shader: &'a str,
    pub uniforms: Uniforms,
    pub defines: Defines,
    pub chunks: ChunkSet,
    /// Program reads the frame group's light and shadow bindings.
    pub lights: bool,
}

impl<'a> ShaderMaterialDesc<'a> {
    pub fn new(label: &'a str, vertex_shader: &'a str, fragment_shader: &'a str) -> Self {
        Self {
            label,
            vertex_shader,
            fragment_shader,
            uniforms: Uniforms::new(),
            defines: Defines::new(),
            chunks: ChunkSet::new(),
            lights: false,
        }
    }

    /// Starts from a library program: both stages, its default uniforms and
    /// its `lights` flag.
    pub fn from_program(label: &'a str, program: &ProgramSource) -> Self {
        Self {
            uniforms: program.uniforms.clone(),
            lights: program.lights,
            ..Self::new(label, program.vertex_shader, program.fragment_shader)
        }
    }

    pub fn with_vertex_shader(mut self, source: &'a str) -> Self {
        self.vertex_shader = source;
        self
    }

    /// Overlays `uniforms` on the current set (existing names keep their slot).
    pub fn merge_uniforms(mut self, uniforms: Uniforms) -> Self {
        self.uniforms = self.uniforms.merged(uniforms);
        self
    }

    pub fn with_defines(mut self, defines: Defines) -> Self {
        self.defines = defines;
        self
    }

    pub fn with_chunks(mut self, chunks: ChunkSet) -> Self {
        self.chunks = chunks;
        self
    }
}

/// A validated shader program plus its mutable uniform values.
///
/// Sources are fixed at construction; only uniform values change afterwards,
/// and never their names or types, so the uniform buffer layout is stable.
#[derive(Debug, Clone)]
pub struct Material {
    uid: u64,
    label: String,
    vertex_wgsl: String,
    fragment_wgsl: String,
    uniforms: Uniforms,
    layout: UniformLayout,
    lights: bool,
    depth_packing: Option<DepthPacking>,
}

impl Material {
    /// Expands, validates and wraps a program.
    pub fn new(desc: ShaderMaterialDesc<'_>) -> Result<Self, ShaderError> {
        let ShaderMaterialDesc { label, vertex_shader, fragment_shader, uniforms, defines, chunks, lights } =
            desc;

        let layout = UniformLayout::of(&uniforms);

        let mut all_chunks = ShaderLib::chunks();
        all_chunks.extend(&chunks);
        all_chunks.insert("material_uniforms", layout.wgsl_block(groups::MATERIAL, 0));

        let prefix = defines.to_wgsl();
        let vertex_wgsl = expand(&format!("{prefix}{vertex_shader}"), &all_chunks)?;
        let fragment_wgsl = expand(&format!("{prefix}{fragment_shader}"), &all_chunks)?;

        validate_wgsl(label, ShaderStage::Vertex, &vertex_wgsl)?;
        validate_wgsl(label, ShaderStage::Fragment, &fragment_wgsl)?;

        log::debug!(
            "material '{label}': {} uniforms, {} byte block, lights={lights}",
            uniforms.len(),
            layout.size()
        );

        Ok(Self {
            uid: NEXT_MATERIAL_UID.fetch_add(1, Ordering::Relaxed),
            label: label.to_string(),
            vertex_wgsl,
            fragment_wgsl,
            uniforms,
            layout,
            lights,
            depth_packing: DepthPacking::from_defines(&defines),
        })
    }

    /// Library lambert material with the given diffuse color.
    pub fn lambert(color: Color) -> Result<Self, ShaderError> {
        Self::new(
            ShaderMaterialDesc::from_program("lambert", &ShaderLib::lambert())
                .merge_uniforms(Uniforms::new().with("diffuse", color)),
        )
    }

    /// Library depth material; the renderer's default shadow-depth program.
    pub fn depth(packing: DepthPacking) -> Result<Self, ShaderError> {
        Self::new(
            ShaderMaterialDesc::from_program("depth", &ShaderLib::depth())
                .with_defines(Defines::new().with(DepthPacking::DEFINE, packing.define_value())),
        )
    }

    /// Process-unique id; keys GPU pipeline caches.
    pub fn uid(&self) -> u64 {
        self.uid
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Fully expanded vertex stage.
    pub fn vertex_wgsl(&self) -> &str {
        &self.vertex_wgsl
    }

    /// Fully expanded fragment stage.
    pub fn fragment_wgsl(&self) -> &str {
        &self.fragment_wgsl
    }

    pub fn uniforms(&self) -> &Uniforms {
        &self.uniforms
    }

    pub fn uniform(&self, name: &str) -> Option<&UniformValue> {
        self.uniforms.get(name)
    }

    /// Updates a declared uniform; picked up by the next render.
    pub fn set_uniform(&mut self, name: &str, value: impl Into<UniformValue>) -> Result<(), ShaderError> {
        self.uniforms.set(name, value)
    }

    pub fn layout(&self) -> &UniformLayout {
        &self.layout
    }

    /// Current uniform values packed for upload.
    pub fn uniform_bytes(&self) -> Vec<u8> {
        self.layout.pack(&self.uniforms)
    }

    pub fn lights(&self) -> bool {
        self.lights
    }

    /// Depth encoding, for depth programs.
    pub fn depth_packing(&self) -> Option<DepthPacking> {
        self.depth_packing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lambert_merges_color_over_library_defaults() {
        let m = Material::lambert(Color::from_hex(0x6699ff)).unwrap();
        let names: Vec<&str> = m.uniforms().iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["diffuse", "emissive", "opacity"]);
        assert_eq!(m.uniform("diffuse"), Some(&Color::from_hex(0x6699ff).into()));
        assert!(m.lights());
        assert_eq!(m.depth_packing(), None);
    }

    #[test]
    fn depth_material_records_its_packing() {
        let m = Material::depth(DepthPacking::Rgba).unwrap();
        assert_eq!(m.depth_packing(), Some(DepthPacking::Rgba));
        assert!(!m.lights());
        assert!(m.fragment_wgsl().contains("const DEPTH_PACKING: u32 = 1u;"));
    }

    #[test]
    fn uids_are_unique() {
        let a = Material::depth(DepthPacking::Rgba).unwrap();
        let b = Material::depth(DepthPacking::Rgba).unwrap();
        assert_ne!(a.uid(), b.uid());
    }

    #[test]
    fn expanded_stages_carry_no_directives() {
        let m = Material::lambert(Color::WHITE).unwrap();
        assert!(!m.vertex_wgsl().contains("#include"));
        assert!(!m.fragment_wgsl().contains("#include"));
        assert!(m.vertex_wgsl().contains("struct MaterialUniforms"));
    }

    #[test]
    fn custom_chunks_are_resolved() {
        let vs = "#include <common>\n#include <vertex_input>\n#include <material_uniforms>\n\
                  @vertex fn vs_main(v: VertexInput) -> @builtin(position) vec4<f32> {\n\
                  #include <offset>\n    return camera.view_proj * vec4<f32>(p, 1.0);\n}\n";
        let fs = "@fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }\n";

        let desc = ShaderMaterialDesc::new("custom", vs, fs)
            .merge_uniforms(Uniforms::new().with("lift", 0.5))
            .with_chunks(ChunkSet::new().with("offset", "    let p = v.position + vec3<f32>(0.0, material.lift, 0.0);"));

        let m = Material::new(desc).unwrap();
        assert!(m.vertex_wgsl().contains("material.lift"));
    }

    #[test]
    fn invalid_source_fails_construction() {
        let desc = ShaderMaterialDesc::new("broken", "@vertex fn vs_main( {", "");
        assert!(matches!(Material::new(desc), Err(ShaderError::Parse { .. })));
    }

    #[test]
    fn unknown_include_fails_construction() {
        let desc = ShaderMaterialDesc::new("broken", "#include <nope>", "");
        assert_eq!(
            Material::new(desc).unwrap_err(),
            ShaderError::UnknownChunk { name: "nope".into() }
        );
    }

    #[test]
    fn set_uniform_updates_packed_bytes() {
        let mut m = Material::depth(DepthPacking::Rgba).unwrap();
        m.set_uniform("opacity", 0.25).unwrap();
        let bytes = m.uniform_bytes();
        assert_eq!(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]), 0.25);
    }
}
