//! Geometry kernel: ray/box intersection and the screen -> world pipeline
//! used by picking.
//!
//! # Invariants
//! - No query divides by a zero ray component; parallel slabs are guarded
//!   explicitly instead of relying on IEEE infinities.
//! - Degenerate input (zero-length ray, invalid box, singular matrix,
//!   empty viewport) answers "no hit" / `None`, never NaN or a panic.

mod intersect;
mod unproject;

pub use intersect::{ray_aabb_distance, ray_intersects_aabb};
pub use unproject::{
    clip_to_view, cursor_ray, ndc_to_clip, project_to_screen, screen_to_ndc, screen_to_world,
    view_to_world, Viewport,
};

pub fn crate_info() -> &'static str {
    "lain-geom v0.1.0"
}
