use super::{Geometry, MaterialId, Transform};

/// Which program renders a mesh into the shadow map.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum ShadowDepth {
    /// The renderer's own RGBA-packed depth material.
    #[default]
    EngineDefault,
    /// A material from the scene; should pack depth as RGBA.
    Custom(MaterialId),
}

impl ShadowDepth {
    pub fn is_custom(self) -> bool {
        matches!(self, ShadowDepth::Custom(_))
    }
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub label: String,
    pub transform: Transform,
    pub geometry: Geometry,
    pub material: MaterialId,
    pub shadow_depth: ShadowDepth,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub visible: bool,
}

impl Mesh {
    pub fn new(label: impl Into<String>, geometry: Geometry, material: MaterialId) -> Self {
        Self {
            label: label.into(),
            transform: Transform::default(),
            geometry,
            material,
            shadow_depth: ShadowDepth::EngineDefault,
            cast_shadow: false,
            receive_shadow: false,
            visible: true,
        }
    }
}
