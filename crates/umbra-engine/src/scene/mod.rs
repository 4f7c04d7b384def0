//! Minimal 3D scene: meshes, materials, one perspective camera, an ambient
//! light and an optional shadow-casting directional light.
//!
//! Materials live in an arena on the [`Scene`] and are referenced by
//! [`MaterialId`], so a mesh and its shadow-depth choice can share programs
//! without reference counting.

mod camera;
mod geometry;
mod graph;
mod light;
mod material;
mod mesh;
mod transform;

pub use camera::PerspectiveCamera;
pub use geometry::{Geometry, Vertex};
pub use graph::{MaterialId, MeshId, Scene};
pub use light::{AmbientLight, DirectionalLight, ShadowConfig};
pub use material::{Material, ShaderMaterialDesc};
pub use mesh::{Mesh, ShadowDepth};
pub use transform::Transform;
