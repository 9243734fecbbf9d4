// Chunk: docs/chunks/key_events - Abstract key event types
//!
//! Key event types for the editor's input pipeline.
//!
//! These types abstract over the terminal backend's event representation so
//! that key bindings can be written and tested without a terminal. Decoding
//! raw input bytes into these events is the terminal shim's job.

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key that was pressed
    pub key: Key,
    /// Modifier keys held during the event
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Creates a new KeyEvent with the given key and modifiers.
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Creates a KeyEvent for a key with no modifiers.
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }

    /// Creates a KeyEvent for a single character with no modifiers.
    pub fn char(ch: char) -> Self {
        Self::plain(Key::Char(ch))
    }

    /// Creates a KeyEvent for a character with control held (`Ctrl+Q` etc.).
    pub fn ctrl(ch: char) -> Self {
        Self {
            key: Key::Char(ch),
            modifiers: Modifiers {
                control: true,
                ..Default::default()
            },
        }
    }

    /// Returns true if this is `Ctrl+<ch>` (case-insensitive) with no other
    /// modifier besides shift.
    pub fn is_ctrl(&self, ch: char) -> bool {
        self.modifiers.control
            && !self.modifiers.alt
            && matches!(self.key, Key::Char(c) if c.eq_ignore_ascii_case(&ch))
    }
}

/// Modifier keys that can be held during a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Shift key
    pub shift: bool,
    /// Control key
    pub control: bool,
    /// Alt / Meta key
    pub alt: bool,
}

impl Modifiers {
    /// Returns true if no modifier keys are held.
    pub fn is_empty(&self) -> bool {
        !self.shift && !self.control && !self.alt
    }

    /// Returns true if only shift is held (for uppercase letters).
    pub fn is_shift_only(&self) -> bool {
        self.shift && !self.control && !self.alt
    }
}

/// Keys that can be pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable character (already accounts for shift state)
    Char(char),
    /// Backspace / Delete backward
    Backspace,
    /// Forward delete
    Delete,
    /// Return / Enter
    Return,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Home key
    Home,
    /// End key
    End,
    /// Tab key
    Tab,
    /// Escape key
    Escape,
    /// Page Up
    PageUp,
    /// Page Down
    PageDown,
    /// Insert key
    Insert,
    /// Function key F1..F12
    F(u8),
}
