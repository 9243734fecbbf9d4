// Chunk: docs/chunks/frame_renderer - Whole-frame terminal output
//!
//! Builds one complete frame as a byte string.
//!
//! The frame is a fixed sequence: hide the cursor, clear, draw the text
//! area (buffer lines, then `~` filler rows), the inverted status bar, the
//! status message, then place and show the cursor. The result is written to
//! the terminal in one call so a frame is never seen half drawn.

use std::io::{self, Write};

use crossterm::style::{Attribute, SetAttribute};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, queue};
use pagedit_buffer::{expand_tabs_into, render_x_from_stored_x, Buffer};

use crate::viewport::Viewport;

/// Version shown on the welcome banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// What the renderer needs besides the buffer.
#[derive(Debug, Clone, Copy)]
pub struct FrameInfo<'a> {
    pub viewport: Viewport,
    pub tab_width: usize,
    /// Draws the welcome banner and the "No buffer selected" status bar.
    pub is_placeholder: bool,
    /// Status message, if it is still fresh.
    pub status_message: Option<&'a str>,
}

fn to_cell(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

/// Renders `buffer` into a new frame.
pub fn render_frame(buffer: &Buffer, info: &FrameInfo<'_>) -> io::Result<Vec<u8>> {
    let Viewport { width, height } = info.viewport;
    let mut out = Vec::with_capacity(width * height + 2 * height + 64);

    queue!(out, cursor::Hide, Clear(ClearType::All), cursor::MoveTo(0, 0))?;

    let text_rows = height.saturating_sub(crate::viewport::STATUS_ROWS);
    let hscroll = buffer.hscroll();
    let mut lines = buffer.lines_from(buffer.vscroll());
    let mut stored = Vec::new();
    let mut rendered = Vec::new();

    for row in 0..text_rows {
        if let Some(line) = lines.next() {
            stored.clear();
            rendered.clear();
            line.write_to(&mut stored);
            expand_tabs_into(&stored, info.tab_width, &mut rendered);
            let start = hscroll.min(rendered.len());
            let end = rendered.len().min(start + width);
            out.write_all(&rendered[start..end])?;
        } else if info.is_placeholder && row == height / 3 {
            write_banner(&mut out, width)?;
        } else {
            out.write_all(b"~")?;
        }
        out.write_all(b"\r\n")?;
    }

    write_status_bar(&mut out, buffer, info)?;

    out.write_all(b"\r\n")?;
    if let Some(message) = info.status_message {
        let bytes = message.as_bytes();
        out.write_all(&bytes[..bytes.len().min(width)])?;
    }

    let cursor = buffer.cursor();
    let render_x = render_x_from_stored_x(&buffer.line_bytes(cursor.y), cursor.x, info.tab_width);
    queue!(
        out,
        cursor::MoveTo(
            to_cell(render_x.saturating_sub(hscroll)),
            to_cell(cursor.y.saturating_sub(buffer.vscroll())),
        ),
        cursor::Show
    )?;

    Ok(out)
}

/// `~`, padding to center, then the banner text.
fn write_banner(out: &mut Vec<u8>, width: usize) -> io::Result<()> {
    let welcome = format!("pagedit -- version {VERSION}");
    let shown = welcome.len().min(width);
    let mut padding = (width - shown) / 2;
    if padding > 0 {
        out.write_all(b"~")?;
        padding -= 1;
    }
    out.extend(std::iter::repeat(b' ').take(padding));
    out.write_all(&welcome.as_bytes()[..shown])
}

fn write_status_bar(out: &mut Vec<u8>, buffer: &Buffer, info: &FrameInfo<'_>) -> io::Result<()> {
    let width = info.viewport.width;
    let status = if info.is_placeholder {
        "No buffer selected".to_string()
    } else {
        format!("{} - {} lines", buffer.name(), buffer.line_count())
    };
    let bytes = &status.as_bytes()[..status.len().min(width)];

    queue!(out, SetAttribute(Attribute::Reverse))?;
    out.write_all(bytes)?;
    out.extend(std::iter::repeat(b' ').take(width - bytes.len()));
    queue!(out, SetAttribute(Attribute::Reset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagedit_buffer::{BufferConfig, Point};

    fn info(width: usize, height: usize) -> FrameInfo<'static> {
        FrameInfo {
            viewport: Viewport::new(width, height),
            tab_width: 4,
            is_placeholder: false,
            status_message: None,
        }
    }

    fn text(frame: &[u8]) -> String {
        String::from_utf8_lossy(frame).into_owned()
    }

    /// Rows of the text area, escape sequences stripped from the first.
    fn rows(frame: &[u8]) -> Vec<String> {
        let s = text(frame);
        let body = &s[s.find("\x1b[1;1H").map_or(0, |i| i + "\x1b[1;1H".len())..];
        body.split("\r\n").map(str::to_string).collect()
    }

    #[test]
    fn test_lines_then_filler() {
        let mut buffer = Buffer::from_bytes(BufferConfig::default(), b"one\ntwo").unwrap();
        buffer.set_name("notes.txt");
        let frame = render_frame(&buffer, &info(20, 6)).unwrap();
        let rows = rows(&frame);
        assert_eq!(rows[0], "one");
        assert_eq!(rows[1], "two");
        assert_eq!(rows[2], "~");
        assert_eq!(rows[3], "~");
        assert!(text(&frame).contains("notes.txt - 2 lines"));
    }

    #[test]
    fn test_tabs_expanded_and_scrolled() {
        let mut buffer = Buffer::from_bytes(BufferConfig::default(), b"\tabcdef").unwrap();
        buffer.set_scroll(0, 2);
        let frame = render_frame(&buffer, &info(5, 4)).unwrap();
        assert_eq!(rows(&frame)[0], "  abc");
    }

    #[test]
    fn test_placeholder_banner_and_status() {
        let buffer = Buffer::placeholder().unwrap();
        let mut info = info(40, 12);
        info.is_placeholder = true;
        let frame = render_frame(&buffer, &info).unwrap();
        let rows = rows(&frame);

        assert_eq!(rows[0], "~");
        let banner = format!("pagedit -- version {VERSION}");
        assert!(rows[4].starts_with('~'));
        assert!(rows[4].ends_with(&banner));
        assert_eq!(rows[4].len(), (40 - banner.len()) / 2 + banner.len());
        assert!(text(&frame).contains("No buffer selected"));
    }

    #[test]
    fn test_status_message_clipped_to_width() {
        let buffer = Buffer::from_bytes(BufferConfig::default(), b"x").unwrap();
        let mut info = info(8, 4);
        info.status_message = Some("Ctrl-Q to quit");
        let frame = render_frame(&buffer, &info).unwrap();
        let s = text(&frame);
        assert!(s.contains("Ctrl-Q t"));
        assert!(!s.contains("Ctrl-Q to"));
    }

    #[test]
    fn test_cursor_placed_at_rendered_column() {
        let mut buffer = Buffer::from_bytes(BufferConfig::default(), b"a\n\tb").unwrap();
        buffer.set_cursor(Point::new(1, 1));
        let frame = render_frame(&buffer, &info(20, 6)).unwrap();
        // Row 2, column 5 (1-based)
        assert!(text(&frame).ends_with("\x1b[2;5H\x1b[?25h"));
    }
}
