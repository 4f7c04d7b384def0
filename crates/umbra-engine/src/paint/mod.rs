//! Color model shared by materials, lights and overlays.

pub mod color;

pub use color::Color;
