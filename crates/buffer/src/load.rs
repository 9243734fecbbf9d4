// Chunk: docs/chunks/file_loading - Building storage from bytes and files

use std::io;
use std::path::{Path, PathBuf};

use crate::buffer::Buffer;

/// Failure to load a file into a buffer.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
}

impl Buffer {
    /// Replaces the buffer's content with `bytes`.
    ///
    /// The arena is reset (not re-reserved) and both free stacks are
    /// dropped, so every previously issued page and span is gone. `\n` is
    /// the only line separator: `n` separators give `n + 1` lines. Cursor
    /// and scroll go back to the origin.
    pub fn init_contents(&mut self, bytes: &[u8]) {
        self.reset_storage();

        let mut page = self.first_page;
        let mut slot = (page, 0);
        for (i, chunk) in bytes.split(|&b| b == b'\n').enumerate() {
            if i > 0 {
                let line = self.alloc_empty_line();
                page = self.push_line_spilling(page, line);
                slot = (page, self.pages[page].lines.len() - 1);
                self.line_count += 1;
            }
            let first = self.line_at(slot).first;
            self.append_without_newlines(slot, first, chunk);
        }
    }

    /// Loads a file, replacing the buffer's content and naming the buffer
    /// after the path. On failure the buffer is left untouched.
    pub fn load_file(&mut self, path: &Path) -> Result<(), LoadError> {
        let bytes = std::fs::read(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        self.init_contents(&bytes);
        self.set_file_name(path);
        tracing::debug!(
            path = %path.display(),
            bytes = bytes.len(),
            lines = self.line_count,
            pages = self.page_count(),
            "file loaded"
        );
        Ok(())
    }
}
