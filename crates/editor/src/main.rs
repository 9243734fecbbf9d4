// Chunk: docs/chunks/editor_loop - Frame loop: key to action to operation to apply
//!
//! pagedit entry point.
//!
//! One frame per key:
//!
//! 1. Validate the active buffer and scroll its cursor into view
//! 2. Render the frame and write it in one call
//! 3. Re-query the window size
//! 4. Wait for a key and run it through the edit pipeline
//!
//! Waiting times out periodically so an expired status message disappears
//! without a key press.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use pagedit::terminal::{self, TerminalSession};
use pagedit::{logging, Cli, EditorConfig, EditorState, Handled};

const KEY_WAIT: Duration = Duration::from_secs(1);

fn main() -> Result<()> {
    let config = EditorConfig::try_from(Cli::parse()).context("Invalid configuration")?;
    logging::init(config.log_file.as_deref())?;
    tracing::info!(version = pagedit::renderer::VERSION, "pagedit starting");

    let file = config.file.clone();
    let mut editor = EditorState::new(config).context("Failed to reserve editor memory")?;
    if let Some(path) = file {
        if let Err(err) = editor.load_file(&path) {
            tracing::warn!(%err, "starting without a file");
        }
    }

    let session = TerminalSession::enter().context("Failed to enter raw terminal mode")?;
    editor.set_window_size(terminal::window_size());

    loop {
        editor.validate();
        editor.update_scroll();

        let frame = editor.render(Instant::now()).context("Failed to build frame")?;
        terminal::write_console(&frame).context("Failed to write to the terminal")?;

        editor.set_window_size(terminal::window_size());

        let key = terminal::wait_for_key(KEY_WAIT).context("Failed to read terminal input")?;
        if let Some(key) = key {
            if editor.handle_key(&key) == Handled::Quit {
                break;
            }
        }
    }

    drop(session);
    tracing::info!("pagedit exiting");
    Ok(())
}
