// Chunk: docs/chunks/paged_storage - Pages of lines, lines of spans, over a buffer arena

//! Performance sanity checks for the buffer.
//!
//! These are not formal benchmarks. They guard against accidental
//! quadratic behavior in the hot edit paths; bounds are loose enough for
//! unoptimized test builds.

use pagedit_buffer::{Buffer, BufferConfig, Point, TextRange};
use std::time::{Duration, Instant};

#[test]
fn type_10k_chars_on_one_line_under_1s() {
    let mut buffer = Buffer::new(BufferConfig::default()).unwrap();
    let start = Instant::now();

    let mut cursor = Point::new(0, 0);
    for _ in 0..10_000 {
        cursor = buffer.insert_text_at_point(cursor, b"x");
    }

    let elapsed = start.elapsed();
    assert!(
        elapsed < Duration::from_secs(1),
        "Typing 10K characters took {:?}, expected < 1s",
        elapsed
    );
    assert_eq!(buffer.line_len(0), 10_000);
    assert_eq!(buffer.line_count(), 1);
}

#[test]
fn type_100k_chars_with_newlines_under_2s() {
    let mut buffer = Buffer::new(BufferConfig::default()).unwrap();
    let start = Instant::now();

    let mut cursor = Point::new(0, 0);
    for i in 0..100_000 {
        let byte: &[u8] = if i % 80 == 79 { b"\n" } else { b"x" };
        cursor = buffer.insert_text_at_point(cursor, byte);
    }

    let elapsed = start.elapsed();
    assert!(
        elapsed < Duration::from_secs(2),
        "Typing 100K characters with newlines took {:?}, expected < 2s",
        elapsed
    );

    // Roughly 100000/80 = 1250 lines
    assert!(buffer.line_count() > 1000);
}

#[test]
fn load_and_delete_large_range() {
    let text = b"a line of moderate length for the load test\n".repeat(20_000);
    let start = Instant::now();

    let mut buffer = Buffer::from_bytes(BufferConfig::default(), &text).unwrap();
    let last = buffer.line_count() - 1;
    buffer.remove_range(TextRange::new(Point::new(3, 10), Point::new(0, last - 10)));

    let elapsed = start.elapsed();
    assert!(
        elapsed < Duration::from_secs(2),
        "Loading 20K lines and deleting most took {:?}, expected < 2s",
        elapsed
    );
    assert_eq!(buffer.line_count(), 21);
    buffer.validate().unwrap();
}
