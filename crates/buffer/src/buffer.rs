// Chunk: docs/chunks/paged_storage - Pages of lines, lines of spans, over a buffer arena

use std::path::{Path, PathBuf};

use pagedit_arena::{Arena, ArenaConfig, ArenaError, ArenaId};

use crate::slab::Slab;
use crate::storage::{BufferConfig, Geometry, Page, PageId, Span};
use crate::types::Point;

/// Display name of the read-only placeholder buffer.
pub const PLACEHOLDER_NAME: &str = "*null*";
const PLACEHOLDER_RESERVE: usize = 64 * 1024;

/// A text buffer stored as pages of lines of fixed-size spans.
///
/// The buffer always holds at least one page with at least one line. Span
/// bytes live in the buffer's own arena; retired pages and spans are kept on
/// per-buffer free stacks and reused before the arena grows.
pub struct Buffer {
    pub(crate) arena: Arena,
    pub(crate) geometry: Geometry,
    pub(crate) pages: Slab<Page>,
    pub(crate) spans: Slab<Span>,
    pub(crate) first_page: PageId,
    pub(crate) last_page: PageId,
    pub(crate) line_count: usize,
    cursor: Point,
    vscroll: usize,
    hscroll: usize,
    name: String,
    file_name: Option<PathBuf>,
    read_only: bool,
}

impl Buffer {
    /// Creates an empty editable buffer: one page holding one empty line.
    pub fn new(config: BufferConfig) -> Result<Self, ArenaError> {
        let arena = Arena::new(config.arena)?;
        let mut pages = Slab::new();
        let first_page = pages.push(Page {
            lines: Vec::with_capacity(config.geometry.page_capacity),
            prev: None,
            next: None,
        });

        let mut buffer = Self {
            arena,
            geometry: config.geometry,
            pages,
            spans: Slab::new(),
            first_page,
            last_page: first_page,
            line_count: 0,
            cursor: Point::default(),
            vscroll: 0,
            hscroll: 0,
            name: String::new(),
            file_name: None,
            read_only: false,
        };
        let line = buffer.alloc_empty_line();
        buffer.pages[first_page].lines.push(line);
        buffer.line_count = 1;
        Ok(buffer)
    }

    /// Creates an editable buffer holding `bytes`.
    pub fn from_bytes(config: BufferConfig, bytes: &[u8]) -> Result<Self, ArenaError> {
        let mut buffer = Self::new(config)?;
        buffer.init_contents(bytes);
        Ok(buffer)
    }

    /// The read-only buffer shown when no file is loaded: one line, `~`.
    pub fn placeholder() -> Result<Self, ArenaError> {
        let config = BufferConfig {
            geometry: Geometry::default(),
            arena: ArenaConfig::with_reserve(PLACEHOLDER_RESERVE),
        };
        let mut buffer = Self::from_bytes(config, b"~")?;
        buffer.name = PLACEHOLDER_NAME.to_string();
        buffer.read_only = true;
        Ok(buffer)
    }

    /// Drops all content, resetting the arena and both free stacks. The
    /// buffer is left with one page holding one empty line.
    pub(crate) fn reset_storage(&mut self) {
        self.pages = Slab::new();
        self.spans = Slab::new();
        self.arena.reset();

        let page = self.pages.push(Page {
            lines: Vec::with_capacity(self.geometry.page_capacity),
            prev: None,
            next: None,
        });
        self.first_page = page;
        self.last_page = page;
        let line = self.alloc_empty_line();
        self.pages[page].lines.push(line);
        self.line_count = 1;
        self.cursor = Point::default();
        self.vscroll = 0;
        self.hscroll = 0;
    }

    // ==================== Accessors ====================

    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Moves the cursor.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `point` is not a valid position.
    pub fn set_cursor(&mut self, point: Point) {
        debug_assert!(self.point_exists(point), "cursor {point:?} outside buffer");
        self.cursor = point;
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Path of the file the buffer was loaded from.
    pub fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    pub(crate) fn set_file_name(&mut self, path: &Path) {
        self.file_name = Some(path.to_path_buf());
        self.name = path.display().to_string();
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// First visible line.
    pub fn vscroll(&self) -> usize {
        self.vscroll
    }

    /// First visible rendered column.
    pub fn hscroll(&self) -> usize {
        self.hscroll
    }

    pub fn set_scroll(&mut self, vscroll: usize, hscroll: usize) {
        self.vscroll = vscroll;
        self.hscroll = hscroll;
    }

    pub fn arena_id(&self) -> ArenaId {
        self.arena.id()
    }

    /// The buffer's arena, for memory statistics.
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Whether `point` addresses a byte position in the buffer, including
    /// the end-of-line position.
    pub fn point_exists(&self, point: Point) -> bool {
        point.y < self.line_count && point.x <= self.line_len(point.y)
    }

    // ==================== Storage counters ====================

    /// Pages currently linked into the buffer.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Spans currently owned by lines.
    pub fn span_count(&self) -> usize {
        self.spans.len()
    }

    /// Retired pages waiting for reuse.
    pub fn free_page_count(&self) -> usize {
        self.pages.free_len()
    }

    /// Retired spans waiting for reuse.
    pub fn free_span_count(&self) -> usize {
        self.spans.free_len()
    }

    /// Pages ever created since the last reset.
    pub fn allocated_page_count(&self) -> usize {
        self.pages.allocated()
    }

    /// Spans ever created since the last reset.
    pub fn allocated_span_count(&self) -> usize {
        self.spans.allocated()
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("name", &self.name)
            .field("line_count", &self.line_count)
            .field("cursor", &self.cursor)
            .field("pages", &self.pages.len())
            .field("spans", &self.spans.len())
            .field("read_only", &self.read_only)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_has_one_empty_line() {
        let buffer = Buffer::new(BufferConfig::default()).unwrap();
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.page_count(), 1);
        assert_eq!(buffer.span_count(), 1);
        assert_eq!(buffer.line_len(0), 0);
        assert_eq!(buffer.cursor(), Point::new(0, 0));
        assert!(!buffer.is_read_only());
    }

    #[test]
    fn test_placeholder_is_read_only_tilde() {
        let buffer = Buffer::placeholder().unwrap();
        assert!(buffer.is_read_only());
        assert_eq!(buffer.name(), PLACEHOLDER_NAME);
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.line_bytes(0), b"~");
    }

    #[test]
    fn test_point_exists_includes_end_of_line() {
        let buffer = Buffer::from_bytes(BufferConfig::default(), b"abc\nde").unwrap();
        assert!(buffer.point_exists(Point::new(3, 0)));
        assert!(!buffer.point_exists(Point::new(4, 0)));
        assert!(buffer.point_exists(Point::new(2, 1)));
        assert!(!buffer.point_exists(Point::new(0, 2)));
    }
}
