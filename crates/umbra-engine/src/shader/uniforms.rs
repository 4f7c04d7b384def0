use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::paint::Color;

use super::ShaderError;

/// A uniform value as stored on a material.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    /// Linear RGB; uploaded as `vec3<f32>`, alpha dropped.
    Color(Color),
    Mat4(Mat4),
}

impl UniformValue {
    pub fn kind(&self) -> UniformKind {
        match self {
            UniformValue::Float(_) => UniformKind::Float,
            UniformValue::Vec2(_) => UniformKind::Vec2,
            UniformValue::Vec3(_) | UniformValue::Color(_) => UniformKind::Vec3,
            UniformValue::Vec4(_) => UniformKind::Vec4,
            UniformValue::Mat4(_) => UniformKind::Mat4,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            UniformValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    fn write_to(&self, out: &mut [u8]) {
        match self {
            UniformValue::Float(v) => out.copy_from_slice(bytemuck::bytes_of(v)),
            UniformValue::Vec2(v) => out.copy_from_slice(bytemuck::cast_slice(&v.to_array())),
            UniformValue::Vec3(v) => out.copy_from_slice(bytemuck::cast_slice(&v.to_array())),
            UniformValue::Color(c) => out.copy_from_slice(bytemuck::cast_slice(&c.rgb())),
            UniformValue::Vec4(v) => out.copy_from_slice(bytemuck::cast_slice(&v.to_array())),
            UniformValue::Mat4(m) => out.copy_from_slice(bytemuck::cast_slice(&m.to_cols_array())),
        }
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self { UniformValue::Float(v) }
}

impl From<Vec2> for UniformValue {
    fn from(v: Vec2) -> Self { UniformValue::Vec2(v) }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self { UniformValue::Vec3(v) }
}

impl From<Vec4> for UniformValue {
    fn from(v: Vec4) -> Self { UniformValue::Vec4(v) }
}

impl From<Color> for UniformValue {
    fn from(c: Color) -> Self { UniformValue::Color(c) }
}

impl From<Mat4> for UniformValue {
    fn from(m: Mat4) -> Self { UniformValue::Mat4(m) }
}

/// WGSL type of a uniform, with its uniform address-space layout rules.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UniformKind {
    Float,
    Vec2,
    Vec3,
    Vec4,
    Mat4,
}

impl UniformKind {
    pub fn wgsl_type(self) -> &'static str {
        match self {
            UniformKind::Float => "f32",
            UniformKind::Vec2 => "vec2<f32>",
            UniformKind::Vec3 => "vec3<f32>",
            UniformKind::Vec4 => "vec4<f32>",
            UniformKind::Mat4 => "mat4x4<f32>",
        }
    }

    pub fn align(self) -> u64 {
        match self {
            UniformKind::Float => 4,
            UniformKind::Vec2 => 8,
            UniformKind::Vec3 | UniformKind::Vec4 | UniformKind::Mat4 => 16,
        }
    }

    pub fn size(self) -> u64 {
        match self {
            UniformKind::Float => 4,
            UniformKind::Vec2 => 8,
            UniformKind::Vec3 => 12,
            UniformKind::Vec4 => 16,
            UniformKind::Mat4 => 64,
        }
    }
}

/// Ordered name → value map of a material's uniforms.
///
/// Order is declaration order and fixes the generated block layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Uniforms {
    entries: Vec<(String, UniformValue)>,
}

impl Uniforms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<UniformValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts a uniform, replacing an existing entry in place (kind included).
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<UniformValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Overlays `other` onto `self`: existing names are overwritten where they
    /// stand, new names are appended in `other`'s order.
    pub fn merged(mut self, other: Uniforms) -> Self {
        for (name, value) in other.entries {
            self.insert(name, value);
        }
        self
    }

    /// Updates an existing uniform. The kind must not change.
    pub fn set(&mut self, name: &str, value: impl Into<UniformValue>) -> Result<(), ShaderError> {
        let value = value.into();
        let Some(entry) = self.entries.iter_mut().find(|(n, _)| n == name) else {
            return Err(ShaderError::UnknownUniform { name: name.to_string() });
        };

        let (expected, found) = (entry.1.kind(), value.kind());
        if expected != found {
            return Err(ShaderError::UniformKindMismatch {
                name: name.to_string(),
                expected: expected.wgsl_type(),
                found: found.wgsl_type(),
            });
        }

        entry.1 = value;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UniformValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One member of a generated uniform block.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformField {
    pub name: String,
    pub kind: UniformKind,
    pub offset: u64,
}

/// Byte layout of a material's uniform block under WGSL uniform rules.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformLayout {
    fields: Vec<UniformField>,
    size: u64,
}

impl UniformLayout {
    /// Struct name used by the generated WGSL block.
    pub const STRUCT_NAME: &'static str = "MaterialUniforms";

    /// Computes member offsets in declaration order.
    ///
    /// Struct size is rounded up to 16 bytes so the buffer always satisfies
    /// uniform binding alignment. An empty set still occupies one slot.
    pub fn of(uniforms: &Uniforms) -> Self {
        let mut fields = Vec::with_capacity(uniforms.len());
        let mut end = 0u64;

        for (name, value) in uniforms.iter() {
            let kind = value.kind();
            let offset = end.next_multiple_of(kind.align());
            end = offset + kind.size();
            fields.push(UniformField { name: name.to_string(), kind, offset });
        }

        Self { fields, size: end.max(4).next_multiple_of(16) }
    }

    pub fn fields(&self) -> &[UniformField] {
        &self.fields
    }

    /// Total buffer size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn offset_of(&self, name: &str) -> Option<u64> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.offset)
    }

    /// WGSL struct + binding declaration for this layout.
    pub fn wgsl_block(&self, group: u32, binding: u32) -> String {
        let mut out = format!("struct {} {{\n", Self::STRUCT_NAME);
        if self.fields.is_empty() {
            out.push_str("    _unused: f32,\n");
        }
        for field in &self.fields {
            out.push_str(&format!("    {}: {},\n", field.name, field.kind.wgsl_type()));
        }
        out.push_str("};\n");
        out.push_str(&format!(
            "@group({group}) @binding({binding}) var<uniform> material: {};\n",
            Self::STRUCT_NAME
        ));
        out
    }

    /// Packs `uniforms` into a buffer image. Names absent from the layout are
    /// ignored; fields whose value is missing or of another kind stay zeroed.
    pub fn pack(&self, uniforms: &Uniforms) -> Vec<u8> {
        let mut bytes = vec![0u8; self.size as usize];
        for field in &self.fields {
            let Some(value) = uniforms.get(&field.name) else { continue };
            if value.kind() != field.kind {
                continue;
            }
            let start = field.offset as usize;
            let end = start + field.kind.size() as usize;
            value.write_to(&mut bytes[start..end]);
        }
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lambert_like() -> Uniforms {
        Uniforms::new()
            .with("diffuse", Color::WHITE)
            .with("emissive", Color::BLACK)
            .with("opacity", 1.0)
            .with("time", 0.0)
    }

    // ── Uniforms ──────────────────────────────────────────────────────────

    #[test]
    fn merged_overwrites_in_place_and_appends_new() {
        let base = Uniforms::new().with("diffuse", Color::WHITE).with("opacity", 1.0);
        let extra = Uniforms::new().with("diffuse", Color::BLACK).with("time", 0.0);

        let merged = base.merged(extra);
        let names: Vec<&str> = merged.iter().map(|(n, _)| n).collect();

        assert_eq!(names, ["diffuse", "opacity", "time"]);
        assert_eq!(merged.get("diffuse"), Some(&UniformValue::Color(Color::BLACK)));
    }

    #[test]
    fn set_rejects_unknown_names() {
        let mut u = lambert_like();
        assert_eq!(
            u.set("speed", 1.0),
            Err(ShaderError::UnknownUniform { name: "speed".into() })
        );
    }

    #[test]
    fn set_rejects_kind_changes() {
        let mut u = lambert_like();
        let err = u.set("time", Vec3::ONE).unwrap_err();
        assert!(matches!(err, ShaderError::UniformKindMismatch { .. }));
        assert_eq!(u.get("time").and_then(UniformValue::as_float), Some(0.0));
    }

    #[test]
    fn color_and_vec3_share_a_kind() {
        let mut u = lambert_like();
        assert!(u.set("diffuse", Vec3::new(0.1, 0.2, 0.3)).is_ok());
    }

    // ── UniformLayout ─────────────────────────────────────────────────────

    #[test]
    fn scalars_pack_into_vec3_tail_padding() {
        let layout = UniformLayout::of(&lambert_like());

        assert_eq!(layout.offset_of("diffuse"), Some(0));
        assert_eq!(layout.offset_of("emissive"), Some(16));
        assert_eq!(layout.offset_of("opacity"), Some(28)); // tail of emissive
        assert_eq!(layout.offset_of("time"), Some(32));
        assert_eq!(layout.size(), 48);
    }

    #[test]
    fn vec3_after_scalar_is_realigned() {
        let u = Uniforms::new().with("time", 0.0).with("offset", Vec3::ZERO).with("m", Mat4::IDENTITY);
        let layout = UniformLayout::of(&u);

        assert_eq!(layout.offset_of("offset"), Some(16));
        assert_eq!(layout.offset_of("m"), Some(32));
        assert_eq!(layout.size(), 96);
    }

    #[test]
    fn empty_layout_still_has_a_slot() {
        let layout = UniformLayout::of(&Uniforms::new());
        assert_eq!(layout.size(), 16);
        assert!(layout.wgsl_block(2, 0).contains("_unused: f32"));
    }

    #[test]
    fn pack_writes_values_at_offsets() {
        let u = lambert_like().with("time", 2.5);
        let layout = UniformLayout::of(&u);
        let bytes = layout.pack(&u);

        let floats: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(&floats[0..3], &[1.0, 1.0, 1.0]); // diffuse
        assert_eq!(&floats[4..7], &[0.0, 0.0, 0.0]); // emissive
        assert_eq!(floats[7], 1.0); // opacity
        assert_eq!(floats[8], 2.5); // time
    }

    #[test]
    fn wgsl_block_lists_fields_in_order() {
        let block = UniformLayout::of(&lambert_like()).wgsl_block(2, 0);
        let diffuse = block.find("diffuse: vec3<f32>").unwrap();
        let time = block.find("time: f32").unwrap();
        assert!(diffuse < time);
        assert!(block.contains("@group(2) @binding(0) var<uniform> material: MaterialUniforms;"));
    }
}
