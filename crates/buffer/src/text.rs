// Chunk: docs/chunks/line_enumeration - Reading lines and ranges back out of the storage

use crate::buffer::Buffer;
use crate::storage::{Line, PageId};
use crate::types::TextRange;

impl Buffer {
    // ==================== Line content ====================

    /// Bytes of line `y`, without the line break.
    ///
    /// # Panics
    ///
    /// Panics if `y >= line_count`.
    pub fn line_bytes(&self, y: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.line_len(y));
        self.write_line(y, &mut out);
        out
    }

    /// Appends the bytes of line `y` to `out`.
    pub fn write_line(&self, y: usize, out: &mut Vec<u8>) {
        let line = self.line_at(self.line_from_absolute(y));
        self.write_line_spans(line, out);
    }

    fn write_line_spans(&self, line: Line, out: &mut Vec<u8>) {
        for id in self.line_spans(line) {
            out.extend_from_slice(self.span_bytes(id));
        }
    }

    /// The bytes covered by `range`, with `\n` between lines.
    pub fn text_in_range(&self, range: TextRange) -> Vec<u8> {
        let TextRange { start, end } = range;
        debug_assert!(start <= end, "inverted range {start:?}..{end:?}");

        let mut out = Vec::new();
        let mut scratch = Vec::new();
        for view in self.lines_from(start.y).take(end.y - start.y + 1) {
            scratch.clear();
            view.write_to(&mut scratch);
            let from = if view.y() == start.y { start.x } else { 0 };
            let to = if view.y() == end.y { end.x } else { scratch.len() };
            if view.y() != start.y {
                out.push(b'\n');
            }
            out.extend_from_slice(&scratch[from..to]);
        }
        out
    }

    /// Whole content, lines joined by `\n`.
    pub fn contents(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for (i, view) in self.lines_from(0).enumerate() {
            if i > 0 {
                out.push(b'\n');
            }
            view.write_to(&mut out);
        }
        out
    }

    /// Iterates lines from absolute line `y` to the end of the buffer,
    /// walking the page list once.
    ///
    /// Starting at `line_count` yields nothing.
    pub fn lines_from(&self, y: usize) -> LinesFrom<'_> {
        let position = if y < self.line_count {
            Some(self.line_from_absolute(y))
        } else {
            None
        };
        LinesFrom {
            buffer: self,
            position,
            y,
        }
    }
}

/// Iterator returned by [`Buffer::lines_from`].
pub struct LinesFrom<'a> {
    buffer: &'a Buffer,
    position: Option<(PageId, usize)>,
    y: usize,
}

impl<'a> Iterator for LinesFrom<'a> {
    type Item = LineView<'a>;

    fn next(&mut self) -> Option<LineView<'a>> {
        let (page, index) = self.position?;
        let record = &self.buffer.pages[page];
        let view = LineView {
            buffer: self.buffer,
            line: record.lines[index],
            y: self.y,
        };

        self.position = if index + 1 < record.lines.len() {
            Some((page, index + 1))
        } else {
            record.next.map(|next| (next, 0))
        };
        self.y += 1;
        Some(view)
    }
}

/// Read access to one line.
#[derive(Clone, Copy)]
pub struct LineView<'a> {
    buffer: &'a Buffer,
    line: Line,
    y: usize,
}

impl<'a> LineView<'a> {
    /// Absolute line number.
    pub fn y(&self) -> usize {
        self.y
    }

    pub fn len(&self) -> usize {
        self.buffer.line_span_len(self.line)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The line's bytes, one slice per span.
    pub fn chunks(&self) -> impl Iterator<Item = &'a [u8]> + 'a {
        let buffer = self.buffer;
        buffer.line_spans(self.line).map(move |id| buffer.span_bytes(id))
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        self.buffer.write_line_spans(self.line, out);
    }

    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_to(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use pagedit_arena::ArenaConfig;

    use crate::{Buffer, BufferConfig, Geometry, Point, TextRange};

    fn tiny(bytes: &[u8]) -> Buffer {
        Buffer::from_bytes(
            BufferConfig {
                geometry: Geometry::new(4, 2),
                arena: ArenaConfig::with_reserve(1 << 20),
            },
            bytes,
        )
        .unwrap()
    }

    #[test]
    fn test_lines_from_crosses_pages() {
        let buffer = tiny(b"zero\none\ntwo\nthree\nfour");
        let lines: Vec<_> = buffer.lines_from(1).map(|view| (view.y(), view.to_vec())).collect();
        assert_eq!(
            lines,
            vec![
                (1, b"one".to_vec()),
                (2, b"two".to_vec()),
                (3, b"three".to_vec()),
                (4, b"four".to_vec()),
            ]
        );
    }

    #[test]
    fn test_lines_from_end_is_empty() {
        let buffer = tiny(b"a\nb");
        assert_eq!(buffer.lines_from(2).count(), 0);
    }

    #[test]
    fn test_line_view_chunks_follow_spans() {
        let buffer = tiny(b"abcdefghij");
        let view = buffer.lines_from(0).next().unwrap();
        let chunks: Vec<&[u8]> = view.chunks().collect();
        assert_eq!(chunks, vec![&b"abcd"[..], &b"efgh"[..], &b"ij"[..]]);
        assert_eq!(view.len(), 10);
    }

    #[test]
    fn test_text_in_range_single_line() {
        let buffer = tiny(b"hello world");
        let text = buffer.text_in_range(TextRange::new(Point::new(6, 0), Point::new(11, 0)));
        assert_eq!(text, b"world");
    }

    #[test]
    fn test_text_in_range_multi_line() {
        let buffer = tiny(b"aaa\nbbb\nccc");
        let text = buffer.text_in_range(TextRange::new(Point::new(1, 0), Point::new(2, 2)));
        assert_eq!(text, b"aa\nbbb\ncc");
    }

    #[test]
    fn test_text_in_range_line_break_only() {
        let buffer = tiny(b"ab\ncd");
        let text = buffer.text_in_range(TextRange::new(Point::new(2, 0), Point::new(0, 1)));
        assert_eq!(text, b"\n");
    }
}
