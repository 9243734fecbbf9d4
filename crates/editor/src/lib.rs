// Chunk: docs/chunks/editor_loop - Frame loop: key to action to operation to apply
//!
//! pagedit: a terminal text editor over arena-backed paged line storage.
//!
//! The library half holds everything the binary's frame loop drives, so it
//! can be tested without a terminal:
//!
//! - [`buffer_target`]: key event to command to text action
//! - [`editor_state`]: the active buffer, status message and frame arena
//! - [`viewport`]: scroll arithmetic
//! - [`renderer`]: one frame as bytes
//! - [`terminal`]: the crossterm shim (raw mode, size, keys, output)
//! - [`config`] and [`logging`]: startup

pub mod buffer_target;
pub mod config;
pub mod editor_state;
pub mod logging;
pub mod renderer;
pub mod terminal;
pub mod viewport;

pub use config::{Cli, ConfigError, EditorConfig};
pub use editor_state::{EditorError, EditorState, Handled};
pub use viewport::Viewport;
