//! GPU rendering subsystem.
//!
//! - [`Renderer`] draws a [`Scene`](crate::scene::Scene): shadow-map pass,
//!   then a lit color pass with its own depth buffer.
//! - [`OverlayRenderer`] draws solid screen-space rectangles on top, in
//!   logical pixels (top-left origin, +Y down).
//!
//! Each renderer owns its GPU resources and creates them on first use.

mod ctx;
mod overlay;
mod pipeline;
mod renderer;
mod shadow;
mod uniforms;

pub use ctx::{RenderCtx, RenderTarget, Viewport};
pub use overlay::{OverlayRenderer, SolidRect};
pub use renderer::{Renderer, ShadowMapSettings};
pub(crate) use pipeline::{DEPTH_FORMAT, SHADOW_FORMAT};
