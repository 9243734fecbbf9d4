// Chunk: docs/chunks/invariant_checks - Full structural consistency check

use std::collections::HashSet;

use crate::buffer::Buffer;
use crate::storage::{PageId, SpanId};

/// A broken structural invariant found by [`Buffer::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("buffer has no lines")]
    EmptyBuffer,

    #[error("page {page} holds no lines")]
    EmptyPage { page: usize },

    #[error("page {page} holds {lines} lines, capacity is {capacity}")]
    PageOverCapacity {
        page: usize,
        lines: usize,
        capacity: usize,
    },

    #[error("page list is broken at page {page}")]
    BrokenPageLink { page: usize },

    #[error("span chain of line {line} is broken")]
    BrokenSpanLink { line: usize },

    #[error("span in line {line} holds {len} bytes, capacity is {capacity}")]
    SpanOverCapacity {
        line: usize,
        len: usize,
        capacity: usize,
    },

    #[error("line {line} reaches a retired or shared span")]
    RetiredSpan { line: usize },

    #[error("pages hold {counted} lines but the buffer records {recorded}")]
    LineCountMismatch { counted: usize, recorded: usize },

    #[error("{reachable} {kind} reachable but {live} live")]
    Leak {
        kind: &'static str,
        reachable: usize,
        live: usize,
    },
}

impl Buffer {
    /// Walks the whole structure and checks every invariant: the buffer has
    /// at least one line, pages are non-empty and within capacity, page and
    /// span links agree in both directions, every line owns its own span
    /// chain, the per-page counts add up to `line_count`, and every live
    /// record is reachable.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        if self.line_count == 0 {
            return Err(InvariantViolation::EmptyBuffer);
        }

        let mut counted = 0usize;
        let mut page_index = 0usize;
        let mut seen_spans: HashSet<SpanId> = HashSet::new();
        let mut prev: Option<PageId> = None;
        let mut current = Some(self.first_page);

        while let Some(id) = current {
            if !self.pages.contains(id) || self.pages[id].prev != prev {
                return Err(InvariantViolation::BrokenPageLink { page: page_index });
            }
            let page = &self.pages[id];
            if page.lines.is_empty() {
                return Err(InvariantViolation::EmptyPage { page: page_index });
            }
            if page.lines.len() > self.geometry.page_capacity {
                return Err(InvariantViolation::PageOverCapacity {
                    page: page_index,
                    lines: page.lines.len(),
                    capacity: self.geometry.page_capacity,
                });
            }

            for line in &page.lines {
                let y = counted;
                counted += 1;
                self.validate_line(y, line.first, line.last, &mut seen_spans)?;
            }

            prev = Some(id);
            current = page.next;
            page_index += 1;
            if page_index > self.pages.len() {
                return Err(InvariantViolation::BrokenPageLink { page: page_index });
            }
        }

        if prev != Some(self.last_page) {
            return Err(InvariantViolation::BrokenPageLink { page: page_index });
        }
        if counted != self.line_count {
            return Err(InvariantViolation::LineCountMismatch {
                counted,
                recorded: self.line_count,
            });
        }
        if page_index != self.pages.len() {
            return Err(InvariantViolation::Leak {
                kind: "pages",
                reachable: page_index,
                live: self.pages.len(),
            });
        }
        if seen_spans.len() != self.spans.len() {
            return Err(InvariantViolation::Leak {
                kind: "spans",
                reachable: seen_spans.len(),
                live: self.spans.len(),
            });
        }
        Ok(())
    }

    fn validate_line(
        &self,
        y: usize,
        first: SpanId,
        last: SpanId,
        seen: &mut HashSet<SpanId>,
    ) -> Result<(), InvariantViolation> {
        let mut prev: Option<SpanId> = None;
        let mut current = Some(first);
        while let Some(id) = current {
            if !self.spans.contains(id) || !seen.insert(id) {
                return Err(InvariantViolation::RetiredSpan { line: y });
            }
            let span = &self.spans[id];
            if span.prev != prev {
                return Err(InvariantViolation::BrokenSpanLink { line: y });
            }
            if span.len > self.geometry.span_capacity {
                return Err(InvariantViolation::SpanOverCapacity {
                    line: y,
                    len: span.len,
                    capacity: self.geometry.span_capacity,
                });
            }
            if id == last {
                return if span.next.is_none() {
                    Ok(())
                } else {
                    Err(InvariantViolation::BrokenSpanLink { line: y })
                };
            }
            prev = Some(id);
            current = span.next;
        }
        Err(InvariantViolation::BrokenSpanLink { line: y })
    }
}
