//! Level editor session: fly camera, ray picking, move/edit modes and
//! level save/load on top of the entity registry.
//!
//! # Invariants
//! - The session owns every registry; picking and rendering only borrow
//!   them.
//! - Switching to the mode the editor is already in changes nothing.
//! - A failed load or save leaves the scene and the selection untouched.
//! - The selection is either `None` or a live entity id.

pub mod camera;
pub mod config;
pub mod editor;
pub mod mode;
pub mod picking;

pub use camera::EditorCamera;
pub use config::{CameraConfig, ConfigError, EditorConfig, GridConfig, ViewportConfig};
pub use editor::{EditorError, LevelEditor, StatusKind, StatusMessage};
pub use mode::{CursorMode, EditorMode};
pub use picking::{PickOptions, PickPolicy, pick};

pub fn crate_info() -> &'static str {
    "lain-editor v0.1.0"
}
