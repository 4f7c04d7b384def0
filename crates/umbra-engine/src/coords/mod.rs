//! Screen-space geometry for overlays.
//!
//! Canonical space: logical pixels (DPI-aware), origin top-left, +X right,
//! +Y down. Vectors are `glam::Vec2`.

mod rect;

pub use rect::Rect;
