use lain_common::{EntityId, ModelType, Transform};

/// Mode the UI asks the editor to enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorModeRequest {
    Move,
    Edit,
}

/// A command produced by the UI layer.
///
/// The editor applies actions between input processing and update; widgets
/// never mutate the registries directly.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Create an entity of the given model and select it.
    AddEntity(ModelType),
    /// Remove the selected entity, if any.
    RemoveSelected,
    /// Remove every entity.
    RemoveAll,
    /// Replace the transform of the selected entity.
    SetSelectedTransform(Transform),
    Select(EntityId),
    Deselect,
    /// Save the scene under a level name.
    SaveLevel(String),
    /// Replace the scene with a saved level.
    LoadLevel(String),
    /// Toggle drawing of collision boxes.
    ToggleDebugDraw,
    SwitchMode(EditorModeRequest),
    /// No-op (used for widgets that have not been bound yet).
    Noop,
}
