use crate::paint::Color;

use super::{ChunkSet, Uniforms};

/// Library chunks, by include name.
const CHUNKS: &[(&str, &str)] = &[
    ("common", include_str!("chunks/common.wgsl")),
    ("vertex_input", include_str!("chunks/vertex_input.wgsl")),
    ("lights_pars", include_str!("chunks/lights_pars.wgsl")),
    ("packing", include_str!("chunks/packing.wgsl")),
    ("lambert_varyings", include_str!("chunks/lambert_varyings.wgsl")),
    ("depth_varyings", include_str!("chunks/depth_varyings.wgsl")),
    ("beginnormal_vertex", include_str!("chunks/beginnormal_vertex.wgsl")),
    ("defaultnormal_vertex", include_str!("chunks/defaultnormal_vertex.wgsl")),
    ("begin_vertex", include_str!("chunks/begin_vertex.wgsl")),
    ("displacementmap_vertex", include_str!("chunks/displacementmap_vertex.wgsl")),
    ("project_vertex", include_str!("chunks/project_vertex.wgsl")),
    ("lights_lambert_vertex", include_str!("chunks/lights_lambert_vertex.wgsl")),
    ("shadowmap_vertex", include_str!("chunks/shadowmap_vertex.wgsl")),
    ("depth_vertex", include_str!("chunks/depth_vertex.wgsl")),
    ("shadowmap_pars_fragment", include_str!("chunks/shadowmap_pars_fragment.wgsl")),
    ("lambert_fragment", include_str!("chunks/lambert_fragment.wgsl")),
    ("depth_fragment", include_str!("chunks/depth_fragment.wgsl")),
];

/// Unexpanded stages plus default uniforms of a library program.
///
/// Custom materials start from one of these: keep a stage, swap the other,
/// and merge extra uniforms over `uniforms`.
#[derive(Debug, Clone)]
pub struct ProgramSource {
    pub name: &'static str,
    pub vertex_shader: &'static str,
    pub fragment_shader: &'static str,
    pub uniforms: Uniforms,
    /// Program reads the light/shadow bindings of the frame group.
    pub lights: bool,
}

/// The engine's built-in WGSL chunks and programs.
pub struct ShaderLib;

impl ShaderLib {
    /// Looks up one library chunk.
    pub fn get(name: &str) -> Option<&'static str> {
        CHUNKS.iter().find(|(n, _)| *n == name).map(|(_, s)| *s)
    }

    /// Every library chunk, ready for `expand`.
    pub fn chunks() -> ChunkSet {
        let mut set = ChunkSet::new();
        for (name, source) in CHUNKS {
            set.insert(*name, *source);
        }
        set
    }

    /// Diffuse-only lit program with per-vertex light accumulation and
    /// shadow-mapped direct light.
    pub fn lambert() -> ProgramSource {
        ProgramSource {
            name: "lambert",
            vertex_shader: include_str!("programs/lambert_vert.wgsl"),
            fragment_shader: include_str!("programs/lambert_frag.wgsl"),
            uniforms: Uniforms::new()
                .with("diffuse", Color::WHITE)
                .with("emissive", Color::BLACK)
                .with("opacity", 1.0),
            lights: true,
        }
    }

    /// Depth program used for shadow maps. Requires the `DEPTH_PACKING` define
    /// (see [`DepthPacking`](crate::shader::DepthPacking)).
    pub fn depth() -> ProgramSource {
        ProgramSource {
            name: "depth",
            vertex_shader: include_str!("programs/depth_vert.wgsl"),
            fragment_shader: include_str!("programs/depth_frag.wgsl"),
            uniforms: Uniforms::new()
                .with("opacity", 1.0)
                .with("displacement_bias", 0.0),
            lights: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::{expand, validate_wgsl, Defines, DepthPacking, ShaderStage, UniformLayout};

    fn assemble(program: &ProgramSource, defines: &Defines) -> (String, String) {
        let mut chunks = ShaderLib::chunks();
        let layout = UniformLayout::of(&program.uniforms);
        chunks.insert("material_uniforms", layout.wgsl_block(2, 0));

        let prefix = defines.to_wgsl();
        let vs = expand(&format!("{prefix}{}", program.vertex_shader), &chunks).unwrap();
        let fs = expand(&format!("{prefix}{}", program.fragment_shader), &chunks).unwrap();
        (vs, fs)
    }

    #[test]
    fn every_chunk_is_reachable_by_name() {
        for (name, source) in CHUNKS {
            assert_eq!(ShaderLib::get(name), Some(*source));
        }
        assert!(ShaderLib::get("nope").is_none());
    }

    #[test]
    fn lambert_program_validates() {
        let (vs, fs) = assemble(&ShaderLib::lambert(), &Defines::new());
        assert_eq!(validate_wgsl("lambert", ShaderStage::Vertex, &vs), Ok(()));
        assert_eq!(validate_wgsl("lambert", ShaderStage::Fragment, &fs), Ok(()));
    }

    #[test]
    fn depth_program_validates_for_both_packings() {
        for packing in [DepthPacking::Basic, DepthPacking::Rgba] {
            let defines = Defines::new().with(DepthPacking::DEFINE, packing.define_value());
            let (vs, fs) = assemble(&ShaderLib::depth(), &defines);
            assert_eq!(validate_wgsl("depth", ShaderStage::Vertex, &vs), Ok(()));
            assert_eq!(validate_wgsl("depth", ShaderStage::Fragment, &fs), Ok(()));
        }
    }

    #[test]
    fn depth_fragment_needs_the_packing_define() {
        let (_, fs) = assemble(&ShaderLib::depth(), &Defines::new());
        assert!(validate_wgsl("depth", ShaderStage::Fragment, &fs).is_err());
    }

    #[test]
    fn lambert_defaults_are_white_and_opaque() {
        let u = ShaderLib::lambert().uniforms;
        assert_eq!(u.get("diffuse"), Some(&Color::WHITE.into()));
        assert_eq!(u.get("opacity").and_then(|v| v.as_float()), Some(1.0));
    }
}
