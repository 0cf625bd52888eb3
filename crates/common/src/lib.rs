//! Shared value types used by every lain crate.
//!
//! # Invariants
//! - Entity ids are never reused within one registry.
//! - `Transform::model_matrix` is always composed from the current fields.

mod bounds;
mod types;

pub use bounds::{Aabb, Ray};
pub use types::{EntityId, EntityInfo, ModelType, Transform, UnknownModelType};

pub fn crate_info() -> &'static str {
    "lain-common v0.1.0"
}
