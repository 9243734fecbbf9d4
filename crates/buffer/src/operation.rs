// Chunk: docs/chunks/text_operations - Key intent to delete/insert/cursor effect

//! The two-stage edit representation.
//!
//! A [`TextAction`] is what a key asks for: a cursor delta, whether the
//! bytes crossed by that delta are deleted, and an optional byte to type.
//! A [`TextOperation`] is what that means for a particular buffer: a range
//! to delete, text to insert, and where the cursor lands. Every edit the
//! editor performs, from typing to backspace, goes through the same
//! delete-then-insert shape.

use pagedit_arena::Arena;

use crate::buffer::Buffer;
use crate::types::{Delta, Point, TextRange};

/// Edit intent produced from one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextAction {
    pub delta: Delta,
    /// Delete the bytes between the cursor and the delta's target.
    pub delete: bool,
    /// Byte to insert after the deletion.
    pub character: Option<u8>,
}

impl TextAction {
    /// Pure cursor movement.
    pub fn movement(delta: Delta) -> Self {
        Self {
            delta,
            ..Self::default()
        }
    }

    /// Deletes toward `delta`'s target.
    pub fn deletion(delta: Delta) -> Self {
        Self {
            delta,
            delete: true,
            character: None,
        }
    }

    /// Types one byte at the cursor.
    pub fn insertion(character: u8) -> Self {
        Self {
            character: Some(character),
            ..Self::default()
        }
    }
}

/// Resolved effect of a [`TextAction`] on one buffer.
///
/// `replace_text` borrows the arena the operation was built in, so the
/// operation cannot outlive the frame that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextOperation<'a> {
    pub delete_range: TextRange,
    pub replace_text: &'a [u8],
    pub new_cursor: Point,
}

impl Buffer {
    /// Resolves `action` against the current cursor.
    ///
    /// The cursor target is the clamped delta. A deleting action removes the
    /// bytes between the cursor and that target and leaves the cursor at the
    /// start of the removed range. The typed byte, if any, is copied into
    /// `frame`.
    pub fn operation_from_action<'a>(
        &self,
        action: &TextAction,
        viewport_rows: usize,
        frame: &'a mut Arena,
    ) -> TextOperation<'a> {
        let cursor = self.cursor();
        let mut new_cursor = self.clamp_delta(cursor, action.delta, viewport_rows);

        let delete_range = if action.delete {
            let range = TextRange::new(cursor, new_cursor);
            new_cursor = range.start;
            range
        } else {
            TextRange::empty(new_cursor)
        };

        let replace_text: &'a [u8] = match action.character {
            Some(byte) => {
                let region = frame.push_bytes(&[byte]);
                let frame: &'a Arena = frame;
                frame.bytes(region)
            }
            None => &[],
        };

        TextOperation {
            delete_range,
            replace_text,
            new_cursor,
        }
    }

    /// Applies `op`: move the cursor, delete the range, insert the text at
    /// the cursor, and leave the cursor after the inserted text. Returns the
    /// final cursor.
    ///
    /// Read-only buffers only take the cursor movement.
    pub fn apply_operation(&mut self, op: &TextOperation<'_>) -> Point {
        self.set_cursor(op.new_cursor);
        if self.is_read_only() {
            return self.cursor();
        }

        self.remove_range(op.delete_range);
        let cursor = self.insert_text_at_point(self.cursor(), op.replace_text);
        self.set_cursor(cursor);
        cursor
    }
}

#[cfg(test)]
mod tests {
    use pagedit_arena::{Arena, ArenaConfig};

    use super::*;
    use crate::BufferConfig;

    fn frame() -> Arena {
        Arena::new(ArenaConfig::with_reserve(1 << 16)).unwrap()
    }

    fn run(buffer: &mut Buffer, action: TextAction) -> Point {
        let mut frame = frame();
        let op = buffer.operation_from_action(&action, 20, &mut frame);
        buffer.apply_operation(&op)
    }

    #[test]
    fn test_insertion_operation() {
        let buffer = Buffer::from_bytes(BufferConfig::default(), b"ac").unwrap();
        let mut frame = frame();
        let op = buffer.operation_from_action(&TextAction::insertion(b'b'), 20, &mut frame);
        assert!(op.delete_range.is_empty());
        assert_eq!(op.replace_text, b"b");
        assert_eq!(op.new_cursor, Point::new(0, 0));
    }

    #[test]
    fn test_backspace_operation_range() {
        let mut buffer = Buffer::from_bytes(BufferConfig::default(), b"abc").unwrap();
        buffer.set_cursor(Point::new(2, 0));
        let mut frame = frame();
        let action = TextAction::deletion(Delta::horizontal(-1).crossing_lines());
        let op = buffer.operation_from_action(&action, 20, &mut frame);
        assert_eq!(op.delete_range, TextRange::new(Point::new(1, 0), Point::new(2, 0)));
        assert_eq!(op.new_cursor, Point::new(1, 0));
        assert!(op.replace_text.is_empty());
    }

    #[test]
    fn test_type_then_backspace() {
        let mut buffer = Buffer::new(BufferConfig::default()).unwrap();
        for &b in b"hi" {
            run(&mut buffer, TextAction::insertion(b));
        }
        assert_eq!(buffer.contents(), b"hi");
        assert_eq!(buffer.cursor(), Point::new(2, 0));

        run(&mut buffer, TextAction::deletion(Delta::horizontal(-1).crossing_lines()));
        assert_eq!(buffer.contents(), b"h");
        assert_eq!(buffer.cursor(), Point::new(1, 0));
    }

    #[test]
    fn test_delete_forward_joins_lines() {
        let mut buffer = Buffer::from_bytes(BufferConfig::default(), b"ab\ncd").unwrap();
        buffer.set_cursor(Point::new(2, 0));
        run(&mut buffer, TextAction::deletion(Delta::horizontal(1).crossing_lines()));
        assert_eq!(buffer.contents(), b"abcd");
        assert_eq!(buffer.cursor(), Point::new(2, 0));
    }

    #[test]
    fn test_newline_insertion_moves_to_next_line() {
        let mut buffer = Buffer::from_bytes(BufferConfig::default(), b"abcd").unwrap();
        buffer.set_cursor(Point::new(2, 0));
        let cursor = run(&mut buffer, TextAction::insertion(b'\n'));
        assert_eq!(cursor, Point::new(0, 1));
        assert_eq!(buffer.contents(), b"ab\ncd");
    }

    #[test]
    fn test_backspace_at_buffer_start_is_noop() {
        let mut buffer = Buffer::from_bytes(BufferConfig::default(), b"abc").unwrap();
        run(&mut buffer, TextAction::deletion(Delta::horizontal(-1).crossing_lines()));
        assert_eq!(buffer.contents(), b"abc");
        assert_eq!(buffer.cursor(), Point::new(0, 0));
    }

    #[test]
    fn test_read_only_buffer_only_moves() {
        let mut buffer = Buffer::from_bytes(BufferConfig::default(), b"abc").unwrap();
        buffer.set_read_only(true);

        run(&mut buffer, TextAction::insertion(b'x'));
        run(&mut buffer, TextAction::movement(Delta::horizontal(1).crossing_lines()));
        run(&mut buffer, TextAction::deletion(Delta::horizontal(1).crossing_lines()));

        assert_eq!(buffer.contents(), b"abc");
        assert_eq!(buffer.cursor(), Point::new(1, 0));
    }
}
