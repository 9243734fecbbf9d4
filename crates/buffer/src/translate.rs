// Chunk: docs/chunks/address_translation - Absolute line and column lookup over pages and spans

//! Address translation.
//!
//! Both lookups are linear walks: over pages to find a line, and over a
//! line's spans to find a column. Pages and spans are small fixed chunks,
//! so the cost is bounded by the page count and the spans in one line.

use crate::buffer::Buffer;
use crate::storage::{Line, LineSlot, SpanId};

impl Buffer {
    /// Finds the page holding absolute line `y` and the line's index in it.
    ///
    /// # Panics
    ///
    /// Panics if `y >= line_count`.
    pub(crate) fn line_from_absolute(&self, y: usize) -> LineSlot {
        assert!(
            y < self.line_count,
            "line {y} out of range ({} lines)",
            self.line_count
        );

        let mut remaining = y;
        let mut page = Some(self.first_page);
        while let Some(id) = page {
            let count = self.pages[id].lines.len();
            if remaining < count {
                return (id, remaining);
            }
            remaining -= count;
            page = self.pages[id].next;
        }
        panic!("line {y} not reachable from the page list");
    }

    /// Finds the span holding column `x` of `line` and the offset within it.
    ///
    /// A column equal to a span's length resolves to that span rather than
    /// the next one, so the end of a line (and the single position of an
    /// empty line) always resolves.
    ///
    /// # Panics
    ///
    /// Panics if `x` is past the end of the line.
    pub(crate) fn span_from_column(&self, line: Line, x: usize) -> (SpanId, usize) {
        let mut remaining = x;
        let mut span = Some(line.first);
        while let Some(id) = span {
            let len = self.spans[id].len;
            if remaining < len + 1 {
                return (id, remaining);
            }
            remaining -= len;
            span = if id == line.last {
                None
            } else {
                self.spans[id].next
            };
        }
        panic!("column {x} past the end of the line");
    }

    /// Byte length of line `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= line_count`.
    pub fn line_len(&self, y: usize) -> usize {
        let line = self.line_at(self.line_from_absolute(y));
        self.line_span_len(line)
    }

    pub(crate) fn line_span_len(&self, line: Line) -> usize {
        self.line_spans(line).map(|id| self.spans[id].len).sum()
    }

    /// Span ids of a line, first to last.
    pub(crate) fn line_spans(&self, line: Line) -> LineSpans<'_> {
        LineSpans {
            buffer: self,
            next: Some(line.first),
            last: line.last,
        }
    }

    /// The slot after `slot`, following the page list.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is the last line of the buffer.
    pub(crate) fn next_slot(&self, (page, index): LineSlot) -> LineSlot {
        if index + 1 < self.pages[page].lines.len() {
            return (page, index + 1);
        }
        match self.pages[page].next {
            Some(next) => (next, 0),
            None => panic!("no line after the last line"),
        }
    }
}

pub(crate) struct LineSpans<'a> {
    buffer: &'a Buffer,
    next: Option<SpanId>,
    last: SpanId,
}

impl Iterator for LineSpans<'_> {
    type Item = SpanId;

    fn next(&mut self) -> Option<SpanId> {
        let id = self.next?;
        self.next = if id == self.last {
            None
        } else {
            self.buffer.spans[id].next
        };
        Some(id)
    }
}
