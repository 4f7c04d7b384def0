//! The boiling displacement: WGSL chunks spliced into both sphere programs,
//! and an `f32` CPU mirror of the same math.

use glam::Vec3;
use umbra_engine::shader::ChunkSet;

/// `hash()` definition.
pub const DISPLACEMENT_PARS: &str = include_str!("shaders/displacement_pars.wgsl");

/// Statement displacing `transformed` along `object_normal` by `material.time`.
pub const DISPLACEMENT_VERTEX: &str = include_str!("shaders/displacement_vertex.wgsl");

/// Vertex stage of the color program (paired with the library lambert fragment).
pub const COLOR_VERTEX: &str = include_str!("shaders/boil_lambert_vert.wgsl");

/// Vertex stage of the shadow-depth program (paired with the library depth fragment).
pub const DEPTH_VERTEX: &str = include_str!("shaders/boil_depth_vert.wgsl");

const HASH_WEIGHTS: Vec3 = Vec3::new(12.9898, 78.233, 39.425);
const HASH_SCALE: f32 = 43758.5453;

/// Chunks both sphere programs include.
pub fn chunks() -> ChunkSet {
    ChunkSet::new()
        .with("displacement_pars", DISPLACEMENT_PARS)
        .with("displacement_vertex", DISPLACEMENT_VERTEX)
}

/// Deterministic scalar in `[0, 1)`.
pub fn hash(p: Vec3) -> f32 {
    let x = p.dot(HASH_WEIGHTS).sin() * HASH_SCALE;
    // WGSL fract, not Rust's (which keeps the sign).
    let h = x - x.floor();
    if h >= 1.0 { 0.0 } else { h }
}

/// Signed offset along the normal at time `t` (seconds).
pub fn displacement(p: Vec3, t: f32) -> f32 {
    0.5 * (0.5 * t + 10.0 * hash(p)).sin()
}

/// Displaced position of a vertex with object-space `normal`.
pub fn displace(p: Vec3, normal: Vec3, t: f32) -> Vec3 {
    p + normal * displacement(p, t)
}
