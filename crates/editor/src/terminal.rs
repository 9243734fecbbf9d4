// Chunk: docs/chunks/terminal_shim - Raw terminal session
//!
//! The thin layer between the editor and the terminal: raw mode and the
//! alternate screen for the session's lifetime, window size, key input and
//! unbuffered frame output. Everything above this module works on
//! `pagedit-input` events and byte frames, so it can be tested without a
//! terminal.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute};
use pagedit_input::{Key, KeyEvent, Modifiers};

/// Size reported when the terminal cannot be queried.
pub const FALLBACK_SIZE: (usize, usize) = (80, 24);

/// Raw mode plus alternate screen. Restores the terminal when dropped, so
/// a panic unwinding through `main` still leaves a usable shell.
pub struct TerminalSession {
    _private: (),
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        if let Err(err) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = terminal::disable_raw_mode();
            return Err(err);
        }
        tracing::debug!("terminal session entered");
        Ok(Self { _private: () })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        tracing::debug!("terminal session restored");
    }
}

/// Terminal size as `(columns, rows)`, or [`FALLBACK_SIZE`] when the query
/// fails or reports an empty window.
pub fn window_size() -> (usize, usize) {
    match terminal::size() {
        Ok((cols, rows)) if cols > 0 && rows > 0 => (cols as usize, rows as usize),
        Ok(size) => {
            tracing::warn!(?size, "terminal reported an empty window, using fallback size");
            FALLBACK_SIZE
        }
        Err(err) => {
            tracing::warn!(%err, "window size query failed, using fallback size");
            FALLBACK_SIZE
        }
    }
}

/// Waits up to `timeout` for a key press.
///
/// Returns `None` on timeout and for events that are not key presses
/// (resize, focus, releases). The caller redraws either way.
pub fn wait_for_key(timeout: Duration) -> io::Result<Option<KeyEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    match event::read()? {
        Event::Key(key) => Ok(key_event_from_crossterm(&key)),
        _ => Ok(None),
    }
}

/// Maps a crossterm key event to the editor's input type. Releases and
/// keys the editor has no name for map to `None`.
pub fn key_event_from_crossterm(event: &event::KeyEvent) -> Option<KeyEvent> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    let key = match event.code {
        KeyCode::Char(ch) => Key::Char(ch),
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Enter => Key::Return,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Tab => Key::Tab,
        KeyCode::Esc => Key::Escape,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Insert => Key::Insert,
        KeyCode::F(n) => Key::F(n),
        _ => return None,
    };

    let modifiers = Modifiers {
        shift: event.modifiers.contains(KeyModifiers::SHIFT),
        control: event.modifiers.contains(KeyModifiers::CONTROL),
        alt: event.modifiers.contains(KeyModifiers::ALT),
    };
    Some(KeyEvent::new(key, modifiers))
}

/// Writes a whole frame to the terminal and flushes it.
pub fn write_console(bytes: &[u8]) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(bytes)?;
    stdout.flush()
}
