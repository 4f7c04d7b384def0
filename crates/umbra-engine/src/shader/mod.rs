//! Shader library and program assembly.
//!
//! Programs are written in WGSL and composed from named chunks with
//! `#include <name>` lines. Assembly is:
//!
//! 1. inject `defines` as module-scope `const` declarations
//! 2. expand includes (library chunks, program-local chunks, and the
//!    generated `material_uniforms` block)
//! 3. parse + validate the result with `naga`
//!
//! Binding model shared by every program:
//! - group 0: frame (`camera`; lit programs add `lights` and `shadow_map`)
//! - group 1: object (`entity`)
//! - group 2: material (`material`, generated from the uniform set)

mod defines;
mod error;
mod library;
mod packing;
mod preprocess;
mod uniforms;
mod validate;

pub use defines::{DefineValue, Defines, DepthPacking};
pub use error::{ShaderError, ShaderStage};
pub use library::{ProgramSource, ShaderLib};
pub use packing::{pack_depth_to_rgba, unpack_rgba_to_depth};
pub use preprocess::{expand, ChunkSet};
pub use uniforms::{UniformField, UniformKind, UniformLayout, UniformValue, Uniforms};
pub use validate::validate_wgsl;

/// Entry point every vertex stage must export.
pub const VERTEX_ENTRY: &str = "vs_main";

/// Entry point every fragment stage must export.
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Bind group indices of the shared binding model.
pub mod groups {
    pub const FRAME: u32 = 0;
    pub const OBJECT: u32 = 1;
    pub const MATERIAL: u32 = 2;
}
