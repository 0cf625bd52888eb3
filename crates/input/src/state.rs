use glam::Vec2;

/// Keys the editor binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
    F1,
    F2,
    B,
    Escape,
    Delete,
}

impl Key {
    pub const ALL: [Key; 11] = [
        Key::W,
        Key::A,
        Key::S,
        Key::D,
        Key::Q,
        Key::E,
        Key::F1,
        Key::F2,
        Key::B,
        Key::Escape,
        Key::Delete,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    pub const ALL: [MouseButton; 3] = [MouseButton::Left, MouseButton::Right, MouseButton::Middle];

    fn index(self) -> usize {
        self as usize
    }
}

const KEY_COUNT: usize = Key::ALL.len();
const BUTTON_COUNT: usize = MouseButton::ALL.len();

/// Down/up state of keys and buttons for this frame and the previous one.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys: [bool; KEY_COUNT],
    prev_keys: [bool; KEY_COUNT],
    buttons: [bool; BUTTON_COUNT],
    prev_buttons: [bool; BUTTON_COUNT],
    cursor: Vec2,
    cursor_delta: Vec2,
    cursor_moved: bool,
    cursor_seen: bool,
    pointer_over_ui: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame: current state becomes previous state and the
    /// per-frame cursor motion is cleared.
    pub fn begin_frame(&mut self) {
        self.prev_keys = self.keys;
        self.prev_buttons = self.buttons;
        self.cursor_delta = Vec2::ZERO;
        self.cursor_moved = false;
    }

    pub fn set_key(&mut self, key: Key, down: bool) {
        self.keys[key.index()] = down;
    }

    pub fn set_mouse_button(&mut self, button: MouseButton, down: bool) {
        self.buttons[button.index()] = down;
    }

    /// Record a cursor position in pixels. Motion accumulates until the next
    /// `begin_frame`. The first position ever seen produces no delta.
    pub fn set_cursor(&mut self, pos: Vec2) {
        if self.cursor_seen {
            self.cursor_delta += pos - self.cursor;
        }
        self.cursor = pos;
        self.cursor_seen = true;
        self.cursor_moved = true;
    }

    /// Whether the UI layer currently captures the mouse.
    pub fn set_pointer_over_ui(&mut self, over: bool) {
        self.pointer_over_ui = over;
    }

    /// Up on the previous frame, down on this one.
    pub fn key_pressed(&self, key: Key) -> bool {
        let i = key.index();
        self.keys[i] && !self.prev_keys[i]
    }

    /// Down on both frames.
    pub fn key_held(&self, key: Key) -> bool {
        let i = key.index();
        self.keys[i] && self.prev_keys[i]
    }

    /// Down now, whether or not it just went down.
    pub fn key_down(&self, key: Key) -> bool {
        self.keys[key.index()]
    }

    pub fn key_released(&self, key: Key) -> bool {
        let i = key.index();
        !self.keys[i] && self.prev_keys[i]
    }

    pub fn button_pressed(&self, button: MouseButton) -> bool {
        let i = button.index();
        self.buttons[i] && !self.prev_buttons[i]
    }

    pub fn button_held(&self, button: MouseButton) -> bool {
        let i = button.index();
        self.buttons[i] && self.prev_buttons[i]
    }

    pub fn button_released(&self, button: MouseButton) -> bool {
        let i = button.index();
        !self.buttons[i] && self.prev_buttons[i]
    }

    pub fn cursor_position(&self) -> Vec2 {
        self.cursor
    }

    pub fn cursor_delta(&self) -> Vec2 {
        self.cursor_delta
    }

    pub fn cursor_moved(&self) -> bool {
        self.cursor_moved
    }

    pub fn pointer_over_ui(&self) -> bool {
        self.pointer_over_ui
    }
}
