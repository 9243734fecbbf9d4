// Chunk: docs/chunks/tab_rendering - Fixed-width tab expansion for display

//! Display helpers. Stored bytes are never changed by rendering; a tab is
//! drawn as `tab_width` spaces wherever it appears (no tab stops).

/// Default rendered width of a tab.
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Appends `stored` to `out` with each tab replaced by `tab_width` spaces.
pub fn expand_tabs_into(stored: &[u8], tab_width: usize, out: &mut Vec<u8>) {
    let tabs = stored.iter().filter(|&&b| b == b'\t').count();
    out.reserve(stored.len() + tabs * tab_width.saturating_sub(1));
    for &byte in stored {
        if byte == b'\t' {
            out.extend(std::iter::repeat(b' ').take(tab_width));
        } else {
            out.push(byte);
        }
    }
}

/// `stored` with each tab replaced by `tab_width` spaces.
pub fn expand_tabs(stored: &[u8], tab_width: usize) -> Vec<u8> {
    let mut out = Vec::new();
    expand_tabs_into(stored, tab_width, &mut out);
    out
}

/// Rendered column of stored column `x`.
///
/// # Panics
///
/// Panics if `x > stored.len()`.
pub fn render_x_from_stored_x(stored: &[u8], x: usize, tab_width: usize) -> usize {
    let tabs = stored[..x].iter().filter(|&&b| b == b'\t').count();
    x - tabs + tabs * tab_width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tabs_fixed_width() {
        assert_eq!(expand_tabs(b"\tab\tc", 4), b"    ab    c");
        assert_eq!(expand_tabs(b"a\tb", 2), b"a  b");
    }

    #[test]
    fn test_expand_tabs_without_tabs_is_identity() {
        assert_eq!(expand_tabs(b"plain", 4), b"plain");
        assert_eq!(expand_tabs(b"", 4), b"");
    }

    #[test]
    fn test_render_x_counts_tabs_before_x() {
        let stored = b"\ta\tb";
        assert_eq!(render_x_from_stored_x(stored, 0, 4), 0);
        assert_eq!(render_x_from_stored_x(stored, 1, 4), 4);
        assert_eq!(render_x_from_stored_x(stored, 2, 4), 5);
        assert_eq!(render_x_from_stored_x(stored, 4, 4), 10);
    }

    #[test]
    fn test_render_x_matches_expanded_prefix() {
        let stored = b"x\t\tyz\t";
        for x in 0..=stored.len() {
            let prefix = expand_tabs(&stored[..x], 4);
            assert_eq!(render_x_from_stored_x(stored, x, 4), prefix.len());
        }
    }
}
