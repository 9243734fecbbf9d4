// Chunk: docs/chunks/key_bindings - Stateless key to text action mapping
//!
//! Key resolution for the text buffer.
//!
//! Every binding is a single modifier+key chord, so resolution is a pure
//! function from a key event to a [`Command`] and from a command to a
//! [`TextAction`]. Nothing here touches a buffer; the editor state turns the
//! action into an operation against whichever buffer is active.

use pagedit_buffer::{Delta, TextAction};
use pagedit_input::{Key, KeyEvent};

/// Large enough to reach either end of any line or window.
const FAR: i64 = 1000;

/// What a key asks the editor to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Leave the editor (Ctrl+Q)
    Quit,
    /// Type one byte at the cursor
    InsertByte(u8),
    /// Delete the byte before the cursor, joining lines at column 0
    DeleteBackward,
    /// Delete the byte under the cursor, joining lines at the line end
    DeleteForward,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    /// Move to column 0
    MoveToLineStart,
    /// Move past the last byte of the line
    MoveToLineEnd,
    /// Move up by at most one window
    PageUp,
    /// Move down by at most one window
    PageDown,
    /// Recognized but does nothing (Ctrl+L, Escape, non-ASCII input)
    Nothing,
}

/// Resolves a key event to a command. Returns `None` for keys with no
/// binding at all.
pub fn resolve_command(event: &KeyEvent) -> Option<Command> {
    let mods = &event.modifiers;

    if event.is_ctrl('q') {
        return Some(Command::Quit);
    }
    // Ctrl+H is the forward delete, not a backspace alias
    if event.is_ctrl('h') {
        return Some(Command::DeleteForward);
    }
    if event.is_ctrl('l') {
        return Some(Command::Nothing);
    }

    match event.key {
        // Printable ASCII. Other control chords are unbound.
        Key::Char(ch) if !mods.control && !mods.alt => {
            if ch.is_ascii_graphic() || ch == ' ' {
                Some(Command::InsertByte(ch as u8))
            } else {
                Some(Command::Nothing)
            }
        }
        Key::Return => Some(Command::InsertByte(b'\n')),
        Key::Tab => Some(Command::InsertByte(b'\t')),

        Key::Backspace => Some(Command::DeleteBackward),
        Key::Delete => Some(Command::DeleteForward),

        Key::Left => Some(Command::MoveLeft),
        Key::Right => Some(Command::MoveRight),
        Key::Up => Some(Command::MoveUp),
        Key::Down => Some(Command::MoveDown),
        Key::Home => Some(Command::MoveToLineStart),
        Key::End => Some(Command::MoveToLineEnd),
        Key::PageUp => Some(Command::PageUp),
        Key::PageDown => Some(Command::PageDown),

        Key::Escape => Some(Command::Nothing),

        _ => None,
    }
}

/// The text action for a command. `Quit` has no text effect and maps to an
/// empty action, as does `Nothing`.
pub fn action_for(command: Command) -> TextAction {
    match command {
        Command::InsertByte(byte) => TextAction::insertion(byte),
        Command::DeleteBackward => TextAction::deletion(Delta::horizontal(-1).crossing_lines()),
        Command::DeleteForward => TextAction::deletion(Delta::horizontal(1).crossing_lines()),
        Command::MoveLeft => TextAction::movement(Delta::horizontal(-1).crossing_lines()),
        Command::MoveRight => TextAction::movement(Delta::horizontal(1).crossing_lines()),
        Command::MoveUp => TextAction::movement(Delta::vertical(-1).crossing_lines()),
        Command::MoveDown => TextAction::movement(Delta::vertical(1).crossing_lines()),
        Command::MoveToLineStart => TextAction::movement(Delta::horizontal(-FAR)),
        Command::MoveToLineEnd => TextAction::movement(Delta::horizontal(FAR)),
        Command::PageUp => TextAction::movement(Delta::vertical(-FAR).clamped_by_window()),
        Command::PageDown => TextAction::movement(Delta::vertical(FAR).clamped_by_window()),
        Command::Quit | Command::Nothing => TextAction::default(),
    }
}
