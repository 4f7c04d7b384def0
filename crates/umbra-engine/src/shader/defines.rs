/// Value of a program define.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum DefineValue {
    Bool(bool),
    U32(u32),
    F32(f32),
}

impl DefineValue {
    fn wgsl(self) -> (&'static str, String) {
        match self {
            DefineValue::Bool(v) => ("bool", v.to_string()),
            DefineValue::U32(v) => ("u32", format!("{v}u")),
            // `{:?}` keeps a decimal point on whole numbers ("1.0", not "1").
            DefineValue::F32(v) => ("f32", format!("{v:?}")),
        }
    }
}

/// Compile-time program configuration.
///
/// Each define becomes a module-scope `const NAME: T = value;` at the top of
/// both stages, so WGSL code branches on it like any other constant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Defines {
    entries: Vec<(String, DefineValue)>,
}

impl Defines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: DefineValue) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts or replaces a define.
    pub fn insert(&mut self, name: impl Into<String>, value: DefineValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<DefineValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// WGSL declarations for every define, one per line.
    pub fn to_wgsl(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.entries {
            let (ty, lit) = value.wgsl();
            out.push_str(&format!("const {name}: {ty} = {lit};\n"));
        }
        out
    }
}

/// How the depth fragment stage encodes depth into its color output.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum DepthPacking {
    /// `1 - depth` written as gray; 8 bits of precision.
    Basic,
    /// Depth spread across the four RGBA8 channels; what shadow maps sample.
    #[default]
    Rgba,
}

impl DepthPacking {
    /// Name of the define selecting the packing.
    pub const DEFINE: &'static str = "DEPTH_PACKING";

    /// Value matching the `*_DEPTH_PACKING` constants of the `packing` chunk.
    pub fn define_value(self) -> DefineValue {
        match self {
            DepthPacking::Basic => DefineValue::U32(0),
            DepthPacking::Rgba => DefineValue::U32(1),
        }
    }

    /// Reads the packing back from a define set.
    pub fn from_defines(defines: &Defines) -> Option<Self> {
        match defines.get(Self::DEFINE)? {
            DefineValue::U32(0) => Some(DepthPacking::Basic),
            DefineValue::U32(1) => Some(DepthPacking::Rgba),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defines_render_as_typed_consts() {
        let defines = Defines::new()
            .with("DEPTH_PACKING", DefineValue::U32(1))
            .with("DOUBLE_SIDED", DefineValue::Bool(false))
            .with("SCALE", DefineValue::F32(2.0));

        assert_eq!(
            defines.to_wgsl(),
            "const DEPTH_PACKING: u32 = 1u;\n\
             const DOUBLE_SIDED: bool = false;\n\
             const SCALE: f32 = 2.0;\n"
        );
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut defines = Defines::new().with("A", DefineValue::U32(1)).with("B", DefineValue::U32(2));
        defines.insert("A", DefineValue::U32(7));
        assert_eq!(defines.to_wgsl(), "const A: u32 = 7u;\nconst B: u32 = 2u;\n");
    }

    #[test]
    fn depth_packing_round_trips_through_defines() {
        for packing in [DepthPacking::Basic, DepthPacking::Rgba] {
            let defines = Defines::new().with(DepthPacking::DEFINE, packing.define_value());
            assert_eq!(DepthPacking::from_defines(&defines), Some(packing));
        }
        assert_eq!(DepthPacking::from_defines(&Defines::new()), None);
    }
}
