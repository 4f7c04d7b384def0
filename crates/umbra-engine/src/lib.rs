//! Umbra engine crate.
//!
//! Owns the platform + GPU runtime (window loop, device/surface, input, frame
//! clock, logging) and a small 3D layer: scene, camera, lights, geometry,
//! shader library, materials and a forward renderer with shadow mapping.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod paint;
pub mod scene;
pub mod shader;
pub mod render;
