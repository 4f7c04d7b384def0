use std::fmt;

/// Pipeline stage a shader error refers to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Errors raised while assembling a shader program or updating its uniforms.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderError {
    /// `#include <name>` names no known chunk.
    UnknownChunk { name: String },
    /// A chunk (transitively) includes itself.
    IncludeCycle { chain: Vec<String> },
    /// Expanded WGSL does not parse.
    Parse { label: String, stage: ShaderStage, message: String },
    /// Expanded WGSL parses but fails validation.
    Validation { label: String, stage: ShaderStage, message: String },
    /// The stage does not export its required entry point.
    MissingEntryPoint { label: String, stage: ShaderStage, entry: &'static str },
    /// A uniform update names no declared uniform.
    UnknownUniform { name: String },
    /// A uniform update changes the declared type; the block layout is fixed.
    UniformKindMismatch { name: String, expected: &'static str, found: &'static str },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::UnknownChunk { name } => {
                write!(f, "unknown shader chunk <{name}>")
            }
            ShaderError::IncludeCycle { chain } => {
                write!(f, "shader include cycle: {}", chain.join(" -> "))
            }
            ShaderError::Parse { label, stage, message } => {
                write!(f, "{label}: {stage} shader failed to parse:\n{message}")
            }
            ShaderError::Validation { label, stage, message } => {
                write!(f, "{label}: {stage} shader failed validation:\n{message}")
            }
            ShaderError::MissingEntryPoint { label, stage, entry } => {
                write!(f, "{label}: {stage} shader has no `{entry}` entry point")
            }
            ShaderError::UnknownUniform { name } => {
                write!(f, "no uniform named `{name}`")
            }
            ShaderError::UniformKindMismatch { name, expected, found } => {
                write!(f, "uniform `{name}` is {expected}, got {found}")
            }
        }
    }
}

impl std::error::Error for ShaderError {}
