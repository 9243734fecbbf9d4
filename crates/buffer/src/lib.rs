// Chunk: docs/chunks/paged_storage - Pages of lines, lines of spans, over a buffer arena
// Chunk: docs/chunks/text_operations - Key intent to delete/insert/cursor effect

//! pagedit-buffer: the text engine of the pagedit editor.
//!
//! # Overview
//!
//! A [`Buffer`] stores text as a linked list of pages, each page a
//! fixed-capacity array of lines, each line a linked chain of fixed-capacity
//! byte spans. Span bytes come from the buffer's own
//! [`Arena`](pagedit_arena::Arena); retired pages and spans are recycled
//! through per-buffer free stacks before the arena grows.
//!
//! The engine works on raw bytes. `\n` is the only line separator and tabs
//! are ordinary bytes that only widen when rendered.
//!
//! The buffer provides:
//! - Point insertion ([`Buffer::insert_text_at_point`]) that splits lines
//!   and spills across pages as needed
//! - Range deletion ([`Buffer::remove_range`]) that retires whole lines and
//!   pages and joins the boundary lines
//! - Delta-based cursor clamping ([`Buffer::clamp_delta`])
//! - The key intent → edit effect pipeline ([`TextAction`],
//!   [`TextOperation`])
//! - Line enumeration for rendering ([`Buffer::lines_from`]) and a full
//!   structural check ([`Buffer::validate`])
//!
//! # Example
//!
//! ```
//! use pagedit_buffer::{Buffer, BufferConfig, Point, TextRange};
//!
//! let mut buffer = Buffer::new(BufferConfig::default()).unwrap();
//!
//! let cursor = buffer.insert_text_at_point(Point::new(0, 0), b"ab\ncd");
//! assert_eq!(cursor, Point::new(2, 1));
//! assert_eq!(buffer.line_count(), 2);
//!
//! buffer.remove_range(TextRange::new(Point::new(1, 0), Point::new(1, 1)));
//! assert_eq!(buffer.contents(), b"ad");
//! ```

mod buffer;
mod cursor;
mod insert;
mod load;
mod operation;
mod remove;
mod render;
mod slab;
mod storage;
mod text;
mod translate;
mod types;
mod validate;

pub use buffer::{Buffer, PLACEHOLDER_NAME};
pub use load::LoadError;
pub use operation::{TextAction, TextOperation};
pub use render::{expand_tabs, expand_tabs_into, render_x_from_stored_x, DEFAULT_TAB_WIDTH};
pub use storage::{BufferConfig, Geometry, DEFAULT_PAGE_CAPACITY, DEFAULT_SPAN_CAPACITY};
pub use text::{LineView, LinesFrom};
pub use types::{Axis, Delta, Point, TextRange};
pub use validate::InvariantViolation;
