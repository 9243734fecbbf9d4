// Chunk: docs/chunks/editor_loop - Frame loop: key to action to operation to apply
//!
//! Integration tests for the key pipeline.
//!
//! These drive `EditorState` with the same key events the terminal shim
//! produces and check the active buffer afterwards. No terminal is
//! involved; the frame loop's terminal calls are the only part not covered.

use std::io::Write;
use std::time::Instant;

use pagedit::{EditorConfig, EditorState, Handled};
use pagedit_buffer::{Geometry, Point};
use pagedit_input::{Key, KeyEvent};

fn editor_with(contents: &[u8]) -> (EditorState, tempfile::NamedTempFile) {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents).unwrap();

    let config = EditorConfig {
        arena_reserve: 8 << 20,
        // Tiny storage so page splits and span spills happen while typing
        geometry: Geometry::new(4, 3),
        ..EditorConfig::default()
    };
    let mut editor = EditorState::new(config).unwrap();
    editor.load_file(file.path()).unwrap();
    editor.set_window_size((40, 10));
    (editor, file)
}

fn press(editor: &mut EditorState, key: Key, times: usize) {
    for _ in 0..times {
        assert_eq!(editor.handle_key(&KeyEvent::plain(key)), Handled::Continue);
        editor.validate();
        editor.update_scroll();
    }
}

fn type_str(editor: &mut EditorState, text: &str) {
    for ch in text.chars() {
        let event = match ch {
            '\n' => KeyEvent::plain(Key::Return),
            '\t' => KeyEvent::plain(Key::Tab),
            ch => KeyEvent::char(ch),
        };
        editor.handle_key(&event);
        editor.validate();
        editor.update_scroll();
    }
}

fn contents(editor: &EditorState) -> String {
    String::from_utf8(editor.active_buffer().contents()).unwrap()
}

#[test]
fn test_type_paragraph_and_fix_typo() {
    let (mut editor, _file) = editor_with(b"");

    type_str(&mut editor, "The quick brwn fox\njumps over\nthe lazy dog");
    assert_eq!(editor.active_buffer().line_count(), 3);

    // Back to line 0, then to just after "br"
    press(&mut editor, Key::Up, 2);
    press(&mut editor, Key::Home, 1);
    press(&mut editor, Key::Right, 12);
    type_str(&mut editor, "o");

    assert_eq!(contents(&editor), "The quick brown fox\njumps over\nthe lazy dog");
    assert_eq!(editor.active_buffer().cursor(), Point::new(13, 0));
}

#[test]
fn test_backspace_at_line_start_joins() {
    let (mut editor, _file) = editor_with(b"first\nsecond");
    press(&mut editor, Key::Down, 1);
    press(&mut editor, Key::Backspace, 1);

    assert_eq!(contents(&editor), "firstsecond");
    assert_eq!(editor.active_buffer().cursor(), Point::new(5, 0));
}

#[test]
fn test_delete_at_line_end_joins() {
    let (mut editor, _file) = editor_with(b"first\nsecond");
    press(&mut editor, Key::End, 1);
    press(&mut editor, Key::Delete, 1);

    assert_eq!(contents(&editor), "firstsecond");
    assert_eq!(editor.active_buffer().cursor(), Point::new(5, 0));
}

#[test]
fn test_ctrl_h_deletes_forward() {
    let (mut editor, _file) = editor_with(b"abc");
    editor.handle_key(&KeyEvent::ctrl('h'));
    assert_eq!(contents(&editor), "bc");
}

#[test]
fn test_right_arrow_wraps_to_next_line() {
    let (mut editor, _file) = editor_with(b"ab\ncd");
    press(&mut editor, Key::Right, 3);
    assert_eq!(editor.active_buffer().cursor(), Point::new(0, 1));
    press(&mut editor, Key::Left, 1);
    assert_eq!(editor.active_buffer().cursor(), Point::new(2, 0));
}

#[test]
fn test_enter_many_lines_scrolls_window() {
    let (mut editor, _file) = editor_with(b"");
    for i in 0..30 {
        type_str(&mut editor, &format!("line {i}\n"));
    }
    let buffer = editor.active_buffer();
    assert_eq!(buffer.line_count(), 31);
    assert_eq!(buffer.cursor(), Point::new(0, 30));
    // 10 rows minus the status bar and message leaves 8 text rows
    assert_eq!(buffer.vscroll(), 23);
}

#[test]
fn test_backspace_everything() {
    let (mut editor, _file) = editor_with(b"one\ntwo\nthree");
    press(&mut editor, Key::PageDown, 1);
    press(&mut editor, Key::End, 1);
    let len = editor.active_buffer().contents().len();
    press(&mut editor, Key::Backspace, len + 3);

    assert_eq!(contents(&editor), "");
    assert_eq!(editor.active_buffer().line_count(), 1);
    assert_eq!(editor.active_buffer().page_count(), 1);
}

#[test]
fn test_tab_renders_expanded() {
    let (mut editor, _file) = editor_with(b"");
    type_str(&mut editor, "\tx");
    assert_eq!(editor.active_buffer().line_bytes(0), b"\tx");

    let frame = editor.render(Instant::now()).unwrap();
    assert!(String::from_utf8_lossy(&frame).contains("    x"));
}

#[test]
fn test_non_ascii_and_escape_change_nothing() {
    let (mut editor, _file) = editor_with(b"abc");
    editor.handle_key(&KeyEvent::char('ü'));
    editor.handle_key(&KeyEvent::plain(Key::Escape));
    editor.handle_key(&KeyEvent::ctrl('l'));
    assert_eq!(contents(&editor), "abc");
    assert_eq!(editor.active_buffer().cursor(), Point::new(0, 0));
}
