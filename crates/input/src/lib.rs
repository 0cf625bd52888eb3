//! Desktop input for the level editor.
//!
//! The window layer feeds raw key/button/cursor events into an
//! [`InputState`]; the editor reads edge-triggered queries from it once per
//! frame. UI widgets produce [`Action`]s instead of touching the scene.
//!
//! # Invariants
//! - A key is "pressed" on exactly one frame: the first frame it is down.
//! - Cursor delta and the moved flag only cover the current frame.

pub mod action;
pub mod state;

pub use action::{Action, EditorModeRequest};
pub use state::{InputState, Key, MouseButton};

pub fn crate_info() -> &'static str {
    "lain-input v0.1.0"
}
