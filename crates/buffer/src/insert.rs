// Chunk: docs/chunks/insert_text - Point insertion with line splitting across pages

use pagedit_arena::with_scratch;

use crate::buffer::Buffer;
use crate::storage::{Line, LineSlot, PageId, SpanId};
use crate::types::Point;

impl Buffer {
    /// Inserts `text` at `point` and returns the position just past it.
    ///
    /// Line breaks in `text` split the target line: the bytes after `point`
    /// move to the end of the last inserted line. With no line break the
    /// returned `x` is `point.x + text.len()`; otherwise it is the length of
    /// the text after the last break, on line `point.y + breaks`.
    ///
    /// # Panics
    ///
    /// Panics if `point` is not a valid position in the buffer.
    pub fn insert_text_at_point(&mut self, point: Point, text: &[u8]) -> Point {
        debug_assert!(self.point_exists(point), "insert at {point:?} outside buffer");
        if text.is_empty() {
            return point;
        }

        let slot = self.line_from_absolute(point.y);
        let line = self.line_at(slot);
        let (span, offset) = self.span_from_column(line, point.x);
        let newline_count = text.iter().filter(|&&b| b == b'\n').count();

        // Spans after the cursor span belong after the inserted text. Within
        // one line they stay linked; across a split they move with the tail.
        let carried = if newline_count > 0 {
            self.detach_spans_after(slot, span)
        } else {
            None
        };
        if newline_count > 0 {
            self.open_lines_after(slot, newline_count);
        }

        let arena_id = self.arena.id();
        with_scratch(&[arena_id], |scratch| {
            let tail = {
                let record = &self.spans[span];
                let bytes = &self.arena.bytes(record.region)[offset..record.len];
                scratch.push_bytes(bytes)
            };
            self.spans[span].len = offset;

            let mut slot = slot;
            let mut current = span;
            for (i, chunk) in text.split(|&b| b == b'\n').enumerate() {
                if i > 0 {
                    slot = self.next_slot(slot);
                    current = self.line_at(slot).first;
                }
                current = self.append_without_newlines(slot, current, chunk);
            }
            current = self.append_without_newlines(slot, current, scratch.bytes(tail));

            if let Some((first, last)) = carried {
                self.spans[current].next = Some(first);
                self.spans[first].prev = Some(current);
                self.line_at_mut(slot).last = last;
            }
        });

        if newline_count == 0 {
            Point::new(point.x + text.len(), point.y)
        } else {
            let last_chunk = text.len() - text.iter().rposition(|&b| b == b'\n').map_or(0, |i| i + 1);
            Point::new(last_chunk, point.y + newline_count)
        }
    }

    /// Cuts the spans following `span` off the line at `slot`, returning the
    /// ends of the detached chain.
    fn detach_spans_after(&mut self, slot: LineSlot, span: SpanId) -> Option<(SpanId, SpanId)> {
        let first = self.spans[span].next?;
        let last = self.line_at(slot).last;
        self.spans[span].next = None;
        self.spans[first].prev = None;
        self.line_at_mut(slot).last = span;
        Some((first, last))
    }

    /// Opens `count` empty lines right after `slot`.
    ///
    /// Lines after the slot shift down; when a page overflows, the overflow
    /// continues in pages linked in after it. Earlier lines never move.
    fn open_lines_after(&mut self, (page, index): LineSlot, count: usize) {
        let shifted = self.pages[page].lines.split_off(index + 1);
        let pages_before = self.pages.len();

        let mut current = page;
        for _ in 0..count {
            let line = self.alloc_empty_line();
            current = self.push_line_spilling(current, line);
        }
        for line in shifted {
            current = self.push_line_spilling(current, line);
        }
        self.line_count += count;

        let pages_added = self.pages.len() - pages_before;
        if pages_added > 0 {
            tracing::debug!(pages_added, opened = count, "page split");
        }
    }

    /// Appends `line` to `page`, or to a page linked in after it when `page`
    /// is full. Returns the page that received the line.
    pub(crate) fn push_line_spilling(&mut self, page: PageId, line: Line) -> PageId {
        let mut page = page;
        if self.pages[page].lines.len() == self.geometry.page_capacity {
            let new = self.alloc_page();
            self.link_page_after(page, new);
            page = new;
        }
        self.pages[page].lines.push(line);
        page
    }
}
