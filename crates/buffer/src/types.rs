// Chunk: docs/chunks/cursor_delta - Points, ranges and relative cursor movement

use std::cmp::Ordering;

/// Position in the buffer: `y` is the absolute line, `x` the byte offset
/// within that line. Both are 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        // Compare by line first, then by column
        match self.y.cmp(&other.y) {
            Ordering::Equal => self.x.cmp(&other.x),
            ord => ord,
        }
    }
}

/// Half-open span of text between two points, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRange {
    pub start: Point,
    pub end: Point,
}

impl TextRange {
    /// Builds a range from two points in either order.
    pub fn new(a: Point, b: Point) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// The empty range at `point`.
    pub fn empty(point: Point) -> Self {
        Self {
            start: point,
            end: point,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Direction a [`Delta`] moves in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    #[default]
    Horizontal,
    Vertical,
}

/// A relative cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Delta {
    /// Signed distance in bytes (horizontal) or lines (vertical).
    pub amount: i64,
    pub axis: Axis,
    /// Horizontal moves past either end of a line continue on the
    /// neighbouring line.
    pub cross_lines: bool,
    /// Vertical moves are capped at one viewport of rows.
    pub clamp_by_window: bool,
}

impl Delta {
    /// No movement.
    pub const NONE: Delta = Delta {
        amount: 0,
        axis: Axis::Horizontal,
        cross_lines: false,
        clamp_by_window: false,
    };

    pub fn horizontal(amount: i64) -> Self {
        Self {
            amount,
            axis: Axis::Horizontal,
            ..Self::NONE
        }
    }

    pub fn vertical(amount: i64) -> Self {
        Self {
            amount,
            axis: Axis::Vertical,
            ..Self::NONE
        }
    }

    pub fn crossing_lines(self) -> Self {
        Self {
            cross_lines: true,
            ..self
        }
    }

    pub fn clamped_by_window(self) -> Self {
        Self {
            clamp_by_window: true,
            ..self
        }
    }
}
