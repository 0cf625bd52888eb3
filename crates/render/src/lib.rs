//! Rendering adapter: renderer-agnostic frame description.
//!
//! # Invariants
//! - Renderers never mutate scene state; they receive an extracted `Frame`.
//! - Grid, axes, entities and debug boxes are drawn the same way in every
//!   editor mode. Only the overlay differs.
//!
//! GPU backends implement [`Renderer`]; [`DebugTextRenderer`] is the
//! built-in text backend used by the CLI and tests.

mod frame;
mod renderer;

pub use frame::{
    DrawItem, Frame, GREEN, GREY, LineSet, Overlay, RED, RenderView, WIREFRAME, grid_lines, world_axes,
};
pub use renderer::{DebugTextRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "lain-render v0.1.0"
}
