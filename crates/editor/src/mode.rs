use lain_input::EditorModeRequest;

/// Top-level editor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    /// Free-fly navigation with a captured cursor.
    #[default]
    Move,
    /// Cursor released for picking and UI panels.
    Edit,
}

/// What the host window should do with the OS cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMode {
    /// Confined to the window and hidden.
    Locked,
    /// Released and drawn.
    Free,
}

impl EditorMode {
    pub fn cursor_mode(self) -> CursorMode {
        match self {
            Self::Move => CursorMode::Locked,
            Self::Edit => CursorMode::Free,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Edit => "edit",
        }
    }
}

impl From<EditorModeRequest> for EditorMode {
    fn from(request: EditorModeRequest) -> Self {
        match request {
            EditorModeRequest::Move => Self::Move,
            EditorModeRequest::Edit => Self::Edit,
        }
    }
}

impl std::fmt::Display for EditorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
