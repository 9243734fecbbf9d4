// Chunk: docs/chunks/paged_storage - Pages of lines, lines of spans, over a buffer arena
// Chunk: docs/chunks/record_recycling - Generation-checked slabs with LIFO free stacks

//! Storage records and the primitives that allocate, recycle and link them.
//!
//! A buffer is a doubly linked list of [`Page`]s. Each page holds up to
//! `page_capacity` [`Line`]s, and each line is a doubly linked chain of
//! [`Span`]s holding up to `span_capacity` bytes apiece. Every line owns at
//! least one span; an empty line is a single span of length zero.

use pagedit_arena::{ArenaConfig, Region};

use crate::buffer::Buffer;
use crate::slab::Handle;

/// Default number of bytes per span.
pub const DEFAULT_SPAN_CAPACITY: usize = 64;
/// Default number of lines per page.
pub const DEFAULT_PAGE_CAPACITY: usize = 128;

pub type PageId = Handle<Page>;
pub type SpanId = Handle<Span>;

/// Fixed chunk sizes of the storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub span_capacity: usize,
    pub page_capacity: usize,
}

impl Geometry {
    pub fn new(span_capacity: usize, page_capacity: usize) -> Self {
        assert!(span_capacity > 0, "span capacity must be positive");
        assert!(page_capacity > 0, "page capacity must be positive");
        Self {
            span_capacity,
            page_capacity,
        }
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            span_capacity: DEFAULT_SPAN_CAPACITY,
            page_capacity: DEFAULT_PAGE_CAPACITY,
        }
    }
}

/// Storage tuning for a [`Buffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BufferConfig {
    pub geometry: Geometry,
    pub arena: ArenaConfig,
}

/// Fixed-capacity chunk of a line's bytes.
#[derive(Debug, Clone)]
pub struct Span {
    /// `span_capacity` bytes in the buffer's arena.
    pub(crate) region: Region,
    pub(crate) len: usize,
    pub(crate) prev: Option<SpanId>,
    pub(crate) next: Option<SpanId>,
}

/// One line: the ends of its span chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    pub(crate) first: SpanId,
    pub(crate) last: SpanId,
}

/// Fixed-capacity array of lines.
#[derive(Debug)]
pub struct Page {
    /// `len()` is the page's line count; capacity is reserved up front.
    pub(crate) lines: Vec<Line>,
    pub(crate) prev: Option<PageId>,
    pub(crate) next: Option<PageId>,
}

/// Location of a line: its page and index within that page.
pub(crate) type LineSlot = (PageId, usize);

impl Buffer {
    // ==================== Allocation ====================

    /// Returns an empty, unlinked span, recycled from the free stack when
    /// possible.
    pub(crate) fn alloc_span(&mut self) -> SpanId {
        if let Some(id) = self.spans.pop_free() {
            let span = &mut self.spans[id];
            span.len = 0;
            span.prev = None;
            span.next = None;
            let region = span.region;
            self.arena.bytes_mut(region).fill(0);
            return id;
        }

        let region = self.arena.push(self.geometry.span_capacity, 8);
        self.spans.push(Span {
            region,
            len: 0,
            prev: None,
            next: None,
        })
    }

    /// Returns an empty, unlinked page, recycled from the free stack when
    /// possible.
    pub(crate) fn alloc_page(&mut self) -> PageId {
        if let Some(id) = self.pages.pop_free() {
            let page = &mut self.pages[id];
            page.lines.clear();
            page.prev = None;
            page.next = None;
            return id;
        }

        self.pages.push(Page {
            lines: Vec::with_capacity(self.geometry.page_capacity),
            prev: None,
            next: None,
        })
    }

    /// A fresh line made of one empty span.
    pub(crate) fn alloc_empty_line(&mut self) -> Line {
        let span = self.alloc_span();
        Line {
            first: span,
            last: span,
        }
    }

    pub(crate) fn free_span(&mut self, id: SpanId) {
        self.spans.retire(id);
    }

    /// Recycles every span of a line.
    pub(crate) fn free_line_spans(&mut self, line: Line) {
        let mut cursor = Some(line.first);
        while let Some(id) = cursor {
            cursor = if id == line.last {
                None
            } else {
                self.spans[id].next
            };
            self.free_span(id);
        }
    }

    /// Unlinks an empty page from the page list and recycles it.
    ///
    /// The buffer always keeps one page, so this never retires the only page.
    pub(crate) fn retire_page(&mut self, id: PageId) {
        debug_assert!(self.pages[id].lines.is_empty(), "retiring a page that still holds lines");
        debug_assert!(self.first_page != self.last_page, "retiring the only page");

        let (prev, next) = {
            let page = &self.pages[id];
            (page.prev, page.next)
        };
        match prev {
            Some(prev) => self.pages[prev].next = next,
            None => {
                if let Some(next) = next {
                    self.first_page = next;
                }
            }
        }
        match next {
            Some(next) => self.pages[next].prev = prev,
            None => {
                if let Some(prev) = prev {
                    self.last_page = prev;
                }
            }
        }
        self.pages.retire(id);
        tracing::debug!(page = ?id, "page retired");
    }

    // ==================== Linking ====================

    pub(crate) fn line_at(&self, (page, index): LineSlot) -> Line {
        self.pages[page].lines[index]
    }

    pub(crate) fn line_at_mut(&mut self, (page, index): LineSlot) -> &mut Line {
        &mut self.pages[page].lines[index]
    }

    /// Links `new` into the page list right after `after`.
    pub(crate) fn link_page_after(&mut self, after: PageId, new: PageId) {
        let next = self.pages[after].next;
        {
            let page = &mut self.pages[new];
            page.prev = Some(after);
            page.next = next;
        }
        self.pages[after].next = Some(new);
        match next {
            Some(next) => self.pages[next].prev = Some(new),
            None => self.last_page = new,
        }
    }

    /// Links an unlinked span into the line at `slot`, right after `after`.
    pub(crate) fn link_span_after(&mut self, slot: LineSlot, after: SpanId, new: SpanId) {
        let next = self.spans[after].next;
        {
            let span = &mut self.spans[new];
            span.prev = Some(after);
            span.next = next;
        }
        self.spans[after].next = Some(new);
        match next {
            Some(next) => self.spans[next].prev = Some(new),
            None => self.line_at_mut(slot).last = new,
        }
    }

    /// Unlinks an empty span from a line with more than one span and
    /// recycles it. Spans that hold bytes, or a line's only span, are kept.
    pub(crate) fn drop_span_if_empty(&mut self, slot: LineSlot, id: SpanId) {
        let line = self.line_at(slot);
        if self.spans[id].len != 0 || line.first == line.last {
            return;
        }

        let (prev, next) = {
            let span = &self.spans[id];
            (span.prev, span.next)
        };
        match prev {
            Some(prev) => self.spans[prev].next = next,
            None => {
                if let Some(next) = next {
                    self.line_at_mut(slot).first = next;
                }
            }
        }
        match next {
            Some(next) => self.spans[next].prev = prev,
            None => {
                if let Some(prev) = prev {
                    self.line_at_mut(slot).last = prev;
                }
            }
        }
        self.free_span(id);
    }

    // ==================== Span bytes ====================

    pub(crate) fn span_bytes(&self, id: SpanId) -> &[u8] {
        let span = &self.spans[id];
        &self.arena.bytes(span.region)[..span.len]
    }

    /// Appends bytes containing no line breaks after position `span.len`,
    /// continuing into freshly linked spans once `span` is full. Returns
    /// the span that received the last byte (or `span` itself when `bytes`
    /// is empty).
    pub(crate) fn append_without_newlines(
        &mut self,
        slot: LineSlot,
        span: SpanId,
        bytes: &[u8],
    ) -> SpanId {
        debug_assert!(!bytes.contains(&b'\n'), "line break inside a single-line append");

        let capacity = self.geometry.span_capacity;
        let mut current = span;
        let mut rest = bytes;
        loop {
            let (region, len) = {
                let span = &self.spans[current];
                (span.region, span.len)
            };
            let take = (capacity - len).min(rest.len());
            if take > 0 {
                self.arena.bytes_mut(region)[len..len + take].copy_from_slice(&rest[..take]);
                self.spans[current].len += take;
                rest = &rest[take..];
            }
            if rest.is_empty() {
                return current;
            }

            let new = self.alloc_span();
            self.link_span_after(slot, current, new);
            current = new;
        }
    }
}
