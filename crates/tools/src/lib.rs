//! Developer tooling for the level editor.
//!
//! # Invariants
//! - Tools only read scene state.

mod inspector;

pub use inspector::{LevelInspector, LevelSummary};

pub fn crate_info() -> &'static str {
    "lain-tools v0.1.0"
}
