// Chunk: docs/chunks/viewport_scroll - Keeping the cursor on screen
//!
//! The window's text area and the scroll arithmetic that keeps the cursor
//! inside it.
//!
//! The bottom two rows belong to the status bar and the status message, so
//! the text area is `height - 2` rows. Scrolling moves only as far as needed
//! to bring the cursor back into view. Horizontal scrolling works on the
//! rendered column (tabs expanded), not the stored one.

use pagedit_buffer::{render_x_from_stored_x, Buffer};

/// Rows reserved below the text area.
pub const STATUS_ROWS: usize = 2;

/// Terminal window dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Rows available for buffer text. Never zero, so a tiny window still
    /// scrolls sensibly.
    pub fn text_rows(&self) -> usize {
        self.height.saturating_sub(STATUS_ROWS).max(1)
    }

    /// Adjusts `buffer`'s scroll offsets so its cursor is visible.
    pub fn update_scroll(&self, buffer: &mut Buffer, tab_width: usize) {
        let cursor = buffer.cursor();
        let rows = self.text_rows();
        let cols = self.width.max(1);

        let mut vscroll = buffer.vscroll();
        if cursor.y < vscroll {
            vscroll = cursor.y;
        }
        if cursor.y >= vscroll + rows {
            vscroll = cursor.y + 1 - rows;
        }

        let line = buffer.line_bytes(cursor.y);
        let render_x = render_x_from_stored_x(&line, cursor.x, tab_width);
        let mut hscroll = buffer.hscroll();
        if render_x < hscroll {
            hscroll = render_x;
        }
        if render_x >= hscroll + cols {
            hscroll = render_x + 1 - cols;
        }

        buffer.set_scroll(vscroll, hscroll);
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(80, 24)
    }
}
