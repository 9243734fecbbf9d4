// Chunk: docs/chunks/remove_range - Range deletion with page retirement and boundary join

use crate::buffer::Buffer;
use crate::storage::{LineSlot, PageId};
use crate::types::TextRange;

impl Buffer {
    /// Deletes the bytes in `range`, joining its first and last lines.
    ///
    /// Whole lines strictly inside the range are removed first (the tail of
    /// the start page, the head of the end page, then every page in
    /// between), after which the remaining prefix of the start line and
    /// suffix of the end line are joined. An empty range changes nothing.
    ///
    /// # Panics
    ///
    /// Panics if either endpoint is not a valid position, and in debug
    /// builds if `range.end < range.start`.
    pub fn remove_range(&mut self, range: TextRange) {
        let TextRange { start, end } = range;
        debug_assert!(start <= end, "inverted range {start:?}..{end:?}");
        debug_assert!(self.point_exists(start), "range start {start:?} outside buffer");
        debug_assert!(self.point_exists(end), "range end {end:?} outside buffer");
        if start == end {
            return;
        }

        let mut end_y = end.y;
        let (start_page, start_index) = self.line_from_absolute(start.y);

        // Tail of the start page.
        if end_y > start.y + 1 {
            let after = self.pages[start_page].lines.len() - (start_index + 1);
            let count = after.min(end_y - start.y - 1);
            self.delete_lines(start_page, start_index + 1, count);
            end_y -= count;
        }

        // Head of the end page.
        if end_y > start.y + 1 {
            let (end_page, end_index) = self.line_from_absolute(end_y);
            let count = end_index.min(end_y - start.y - 1);
            self.delete_lines(end_page, end_index - count, count);
            end_y -= count;
        }

        // Whole pages in between.
        if end_y > start.y + 1 {
            end_y -= self.delete_pages_after(start_page, end_y - start.y - 1);
        }
        debug_assert!(end_y <= start.y + 1);

        self.join_boundary((start_page, start_index), start.x, end_y > start.y, end.x);
    }

    /// Deletes `count` lines of `page` starting at `index`, recycling their
    /// spans. The page keeps at least the lines outside that window.
    fn delete_lines(&mut self, page: PageId, index: usize, count: usize) {
        if count == 0 {
            return;
        }
        let removed: Vec<_> = self.pages[page].lines.drain(index..index + count).collect();
        for line in removed {
            self.free_line_spans(line);
        }
        self.line_count -= count;
    }

    /// Unlinks whole pages following `page` until `budget` lines have been
    /// removed, recycling every span they hold. Returns the lines removed.
    fn delete_pages_after(&mut self, page: PageId, budget: usize) -> usize {
        let mut removed = 0;
        while let Some(next) = self.pages[page].next {
            let count = self.pages[next].lines.len();
            if removed + count > budget {
                break;
            }
            let lines = std::mem::take(&mut self.pages[next].lines);
            for line in &lines {
                self.free_line_spans(*line);
            }
            // Hand the line array back so the recycled page keeps its capacity.
            self.pages[next].lines = lines;
            self.pages[next].lines.clear();
            self.retire_page(next);
            self.line_count -= count;
            removed += count;
        }
        removed
    }

    /// Joins the start line's prefix `[0, x0)` with the end line's suffix
    /// from `x1`. `two_lines` says whether the end line is the line after
    /// `start_slot` or the start line itself.
    fn join_boundary(&mut self, start_slot: LineSlot, x0: usize, two_lines: bool, x1: usize) {
        let start_line = self.line_at(start_slot);
        let (start_span, start_offset) = self.span_from_column(start_line, x0);

        let end_slot = if two_lines {
            self.next_slot(start_slot)
        } else {
            start_slot
        };
        let end_line = self.line_at(end_slot);
        let (end_span, end_offset) = self.span_from_column(end_line, x1);

        if start_span == end_span {
            let (region, len) = {
                let span = &self.spans[start_span];
                (span.region, span.len)
            };
            self.arena
                .bytes_mut(region)
                .copy_within(end_offset..len, start_offset);
            self.spans[start_span].len = len - (end_offset - start_offset);
            self.drop_span_if_empty(start_slot, start_span);
            return;
        }

        if two_lines {
            // Concatenate the chains, then drop the end line's slot.
            self.spans[start_line.last].next = Some(end_line.first);
            self.spans[end_line.first].prev = Some(start_line.last);
            self.line_at_mut(start_slot).last = end_line.last;

            let (end_page, end_index) = end_slot;
            self.pages[end_page].lines.remove(end_index);
            self.line_count -= 1;
            if self.pages[end_page].lines.is_empty() {
                self.retire_page(end_page);
            }
        }

        let mut between = self.spans[start_span].next;
        while let Some(id) = between {
            if id == end_span {
                break;
            }
            between = self.spans[id].next;
            self.free_span(id);
        }
        self.spans[start_span].next = Some(end_span);
        self.spans[end_span].prev = Some(start_span);

        self.spans[start_span].len = start_offset;

        let (region, len) = {
            let span = &self.spans[end_span];
            (span.region, span.len)
        };
        self.arena.bytes_mut(region).copy_within(end_offset..len, 0);
        self.spans[end_span].len = len - end_offset;

        self.drop_span_if_empty(start_slot, start_span);
        self.drop_span_if_empty(start_slot, end_span);
    }
}
