//! Time subsystem.
//!
//! One `FrameClock` per window. `tick()` is called once per presented frame and
//! yields a `FrameTime` carrying both the clamped delta and the unclamped
//! elapsed time since the clock started. Elapsed time is the value animation
//! uniforms are driven from.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
