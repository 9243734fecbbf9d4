// Chunk: docs/chunks/editor_loop - Frame loop: key to action to operation to apply
//!
//! Editor state: everything the frame loop reads and mutates.
//!
//! There is one editable buffer, created on the first successful load, and
//! one read-only placeholder shown when nothing is loaded. Each key goes
//! through the same pipeline: resolve a command, turn it into a text
//! action, resolve that against the active buffer into an operation built
//! in the frame arena, apply it, and reset the frame arena.

use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use pagedit_arena::{Arena, ArenaError};
use pagedit_buffer::{Buffer, LoadError};
use pagedit_input::KeyEvent;

use crate::buffer_target::{action_for, resolve_command, Command};
use crate::config::EditorConfig;
use crate::renderer::{render_frame, FrameInfo};
use crate::viewport::Viewport;

/// How long a status message stays on screen.
pub const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(5);

/// Status message shown at startup.
pub const INITIAL_STATUS: &str = "Ctrl-Q to quit";

/// Status message shown when the requested file cannot be read.
pub const LOAD_FAILED_STATUS: &str = "Failed to load file";

/// Result of handling one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// Keep running
    Continue,
    /// The user asked to quit
    Quit,
}

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Arena(#[from] ArenaError),
    #[error(transparent)]
    Load(#[from] LoadError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Active {
    Placeholder,
    Editable,
}

#[derive(Debug)]
struct StatusMessage {
    text: String,
    set_at: Instant,
}

pub struct EditorState {
    config: EditorConfig,
    viewport: Viewport,
    status: StatusMessage,
    editable: Option<Buffer>,
    placeholder: Buffer,
    active: Active,
    frame: Arena,
}

impl EditorState {
    pub fn new(config: EditorConfig) -> Result<Self, ArenaError> {
        let frame = Arena::new(config.frame_arena_config())?;
        let placeholder = Buffer::placeholder()?;
        Ok(Self {
            config,
            viewport: Viewport::default(),
            status: StatusMessage {
                text: INITIAL_STATUS.to_string(),
                set_at: Instant::now(),
            },
            editable: None,
            placeholder,
            active: Active::Placeholder,
            frame,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_window_size(&mut self, (width, height): (usize, usize)) {
        self.viewport = Viewport::new(width, height);
    }

    pub fn set_status_message(&mut self, text: impl Into<String>) {
        self.status = StatusMessage {
            text: text.into(),
            set_at: Instant::now(),
        };
    }

    /// The status message if it was set less than [`STATUS_MESSAGE_TTL`]
    /// before `now`.
    pub fn status_message(&self, now: Instant) -> Option<&str> {
        (now.saturating_duration_since(self.status.set_at) < STATUS_MESSAGE_TTL)
            .then_some(self.status.text.as_str())
    }

    pub fn is_placeholder_active(&self) -> bool {
        self.active == Active::Placeholder
    }

    pub fn active_buffer(&self) -> &Buffer {
        match (self.active, &self.editable) {
            (Active::Editable, Some(buffer)) => buffer,
            _ => &self.placeholder,
        }
    }

    /// Active buffer and the frame arena, borrowed together.
    fn active_parts(&mut self) -> (&mut Buffer, &mut Arena) {
        let buffer = match (self.active, &mut self.editable) {
            (Active::Editable, Some(buffer)) => buffer,
            _ => &mut self.placeholder,
        };
        (buffer, &mut self.frame)
    }

    /// Loads `path` into the editable buffer and makes it active.
    ///
    /// The editable buffer is created on first use and reused after that;
    /// its arena is reset on every load. On failure the placeholder becomes
    /// active and the status message says so.
    pub fn load_file(&mut self, path: &Path) -> Result<(), EditorError> {
        let result = self.load_into_editable(path);
        match &result {
            Ok(()) => {
                self.active = Active::Editable;
                tracing::info!(path = %path.display(), "opened file");
            }
            Err(_) => {
                self.active = Active::Placeholder;
                self.set_status_message(LOAD_FAILED_STATUS);
            }
        }
        result
    }

    fn load_into_editable(&mut self, path: &Path) -> Result<(), EditorError> {
        let mut buffer = match self.editable.take() {
            Some(buffer) => buffer,
            None => Buffer::new(self.config.buffer_config())?,
        };
        let result = buffer.load_file(path);
        self.editable = Some(buffer);
        Ok(result?)
    }

    /// Runs one key through the edit pipeline.
    pub fn handle_key(&mut self, key: &KeyEvent) -> Handled {
        let Some(command) = resolve_command(key) else {
            tracing::trace!(?key, "unbound key");
            return Handled::Continue;
        };
        if command == Command::Quit {
            tracing::info!("quit requested");
            return Handled::Quit;
        }

        let action = action_for(command);
        let rows = self.viewport.text_rows();
        let (buffer, frame) = self.active_parts();
        {
            let op = buffer.operation_from_action(&action, rows, frame);
            tracing::trace!(?command, ?op, "applying operation");
            buffer.apply_operation(&op);
        }
        frame.reset();
        Handled::Continue
    }

    /// Checks the active buffer's structure.
    ///
    /// # Panics
    ///
    /// Panics on any invariant violation. Editing a corrupt buffer further
    /// would only spread the damage.
    pub fn validate(&self) {
        if let Err(violation) = self.active_buffer().validate() {
            tracing::error!(%violation, "buffer invariant violated");
            panic!("buffer invariant violated: {violation}");
        }
    }

    /// Scrolls the active buffer so the cursor is visible.
    pub fn update_scroll(&mut self) {
        let viewport = self.viewport;
        let tab_width = self.config.tab_width;
        let (buffer, _) = self.active_parts();
        viewport.update_scroll(buffer, tab_width);
    }

    /// Builds the frame for the active buffer as of `now`.
    pub fn render(&self, now: Instant) -> io::Result<Vec<u8>> {
        let info = FrameInfo {
            viewport: self.viewport,
            tab_width: self.config.tab_width,
            is_placeholder: self.is_placeholder_active(),
            status_message: self.status_message(now),
        };
        render_frame(self.active_buffer(), &info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagedit_buffer::Point;
    use pagedit_input::Key;
    use std::io::Write;

    fn editor() -> EditorState {
        let config = EditorConfig {
            arena_reserve: 4 << 20,
            ..EditorConfig::default()
        };
        EditorState::new(config).unwrap()
    }

    fn file_with(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file
    }

    #[test]
    fn test_starts_on_placeholder_with_hint() {
        let state = editor();
        assert!(state.is_placeholder_active());
        assert_eq!(state.active_buffer().line_bytes(0), b"~");
        assert_eq!(state.status_message(Instant::now()), Some(INITIAL_STATUS));
    }

    #[test]
    fn test_status_message_expires() {
        let state = editor();
        let later = Instant::now() + STATUS_MESSAGE_TTL;
        assert_eq!(state.status_message(later), None);
    }

    #[test]
    fn test_load_failure_keeps_placeholder() {
        let mut state = editor();
        let dir = tempfile::tempdir().unwrap();
        let err = state.load_file(&dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, EditorError::Load(_)));
        assert!(state.is_placeholder_active());
        assert_eq!(state.status_message(Instant::now()), Some(LOAD_FAILED_STATUS));
    }

    #[test]
    fn test_load_activates_editable_buffer() {
        let mut state = editor();
        let file = file_with(b"hello\nworld");
        state.load_file(file.path()).unwrap();
        assert!(!state.is_placeholder_active());
        assert_eq!(state.active_buffer().line_count(), 2);
        assert_eq!(state.active_buffer().name(), file.path().display().to_string());
    }

    #[test]
    fn test_typing_edits_loaded_buffer() {
        let mut state = editor();
        let file = file_with(b"");
        state.load_file(file.path()).unwrap();

        for ch in ['H', 'i'] {
            assert_eq!(state.handle_key(&KeyEvent::char(ch)), Handled::Continue);
        }
        state.handle_key(&KeyEvent::plain(Key::Return));
        state.handle_key(&KeyEvent::char('!'));

        let buffer = state.active_buffer();
        assert_eq!(buffer.contents(), b"Hi\n!");
        assert_eq!(buffer.cursor(), Point::new(1, 1));
        state.validate();
    }

    #[test]
    fn test_placeholder_ignores_edits_but_moves() {
        let mut state = editor();
        state.handle_key(&KeyEvent::char('x'));
        state.handle_key(&KeyEvent::plain(Key::Backspace));
        assert_eq!(state.active_buffer().contents(), b"~");

        state.handle_key(&KeyEvent::plain(Key::End));
        assert_eq!(state.active_buffer().cursor(), Point::new(1, 0));
    }

    #[test]
    fn test_ctrl_q_quits() {
        let mut state = editor();
        assert_eq!(state.handle_key(&KeyEvent::ctrl('q')), Handled::Quit);
    }

    #[test]
    fn test_frame_arena_reset_after_each_key() {
        let mut state = editor();
        let file = file_with(b"abc");
        state.load_file(file.path()).unwrap();
        state.handle_key(&KeyEvent::char('z'));
        assert_eq!(state.frame.pos(), 0);
    }

    #[test]
    fn test_reload_reuses_editable_buffer() {
        let mut state = editor();
        let first = file_with(b"first");
        let second = file_with(b"second\nfile");
        state.load_file(first.path()).unwrap();
        let id = state.active_buffer().arena_id();

        state.load_file(second.path()).unwrap();
        assert_eq!(state.active_buffer().arena_id(), id);
        assert_eq!(state.active_buffer().contents(), b"second\nfile");
    }

    #[test]
    fn test_page_down_uses_text_rows() {
        let mut state = editor();
        let text: String = (0..100).map(|i| format!("{i}\n")).collect();
        let file = file_with(text.as_bytes());
        state.load_file(file.path()).unwrap();
        state.set_window_size((80, 12));

        state.handle_key(&KeyEvent::plain(Key::PageDown));
        assert_eq!(state.active_buffer().cursor().y, 10);

        state.update_scroll();
        assert_eq!(state.active_buffer().vscroll(), 1);
    }

    #[test]
    fn test_render_shows_active_buffer() {
        let mut state = editor();
        let file = file_with(b"contents here");
        state.load_file(file.path()).unwrap();
        state.set_window_size((40, 6));
        let frame = state.render(Instant::now()).unwrap();
        let text = String::from_utf8_lossy(&frame);
        assert!(text.contains("contents here"));
        assert!(text.contains(" - 1 lines"));
    }
}
