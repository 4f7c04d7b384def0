//! Input subsystem.
//!
//! Public API is platform-agnostic: the runtime translates `winit` window events
//! into `InputEvent`s (see `platform`) and folds them into an `InputState` plus
//! a per-frame `InputFrame`.

mod frame;
pub(crate) mod platform;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{ButtonState, InputEvent, Key, MouseButton};
