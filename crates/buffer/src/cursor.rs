// Chunk: docs/chunks/cursor_delta - Points, ranges and relative cursor movement

use crate::buffer::Buffer;
use crate::types::{Axis, Delta, Point};

impl Buffer {
    /// Applies `delta` to `point` and clamps the result into the buffer.
    ///
    /// Horizontal moves that leave the line either wrap to the neighbouring
    /// line (`cross_lines`) or stop at the line's ends. Vertical moves clamp
    /// the line into `[0, line_count)`, optionally capping the distance at
    /// `viewport_rows` (`clamp_by_window`), then clamp the column to the new
    /// line's length.
    ///
    /// The result always satisfies [`point_exists`](Self::point_exists).
    pub fn clamp_delta(&self, point: Point, delta: Delta, viewport_rows: usize) -> Point {
        debug_assert!(self.point_exists(point), "delta from {point:?} outside buffer");
        let last_line = self.line_count - 1;

        match delta.axis {
            Axis::Horizontal => {
                let x = point.x as i64 + delta.amount;
                let len = self.line_len(point.y) as i64;
                if x < 0 {
                    if delta.cross_lines && point.y > 0 {
                        let y = point.y - 1;
                        Point::new(self.line_len(y), y)
                    } else {
                        Point::new(0, point.y)
                    }
                } else if x > len {
                    if delta.cross_lines && point.y < last_line {
                        Point::new(0, point.y + 1)
                    } else {
                        Point::new(len as usize, point.y)
                    }
                } else {
                    Point::new(x as usize, point.y)
                }
            }
            Axis::Vertical => {
                let mut amount = delta.amount;
                if delta.clamp_by_window {
                    let rows = viewport_rows.max(1) as i64;
                    amount = amount.clamp(-rows, rows);
                }
                let y = (point.y as i64 + amount).clamp(0, last_line as i64) as usize;
                Point::new(point.x.min(self.line_len(y)), y)
            }
        }
    }
}
