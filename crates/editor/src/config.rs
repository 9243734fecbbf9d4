// Chunk: docs/chunks/editor_config - CLI and environment configuration
//!
//! Command line parsing and the validated editor configuration.
//!
//! Every option can also come from a `PAGEDIT_*` environment variable; the
//! flag wins when both are present. Storage tuning flags are hidden because
//! they only matter for testing the paging paths.

use std::path::PathBuf;

use clap::Parser;
use pagedit_arena::ArenaConfig;
use pagedit_buffer::{BufferConfig, Geometry, DEFAULT_PAGE_CAPACITY, DEFAULT_SPAN_CAPACITY};

const MIB: usize = 1024 * 1024;

/// Default buffer arena reservation, in MiB.
pub const DEFAULT_ARENA_RESERVE_MIB: usize = 1024;

/// Frame arena reservation. One frame holds at most a typed byte.
const FRAME_ARENA_RESERVE: usize = 64 * 1024;

/// pagedit: a small terminal text editor.
#[derive(Debug, Parser)]
#[command(name = "pagedit", version, about)]
pub struct Cli {
    /// File to open
    pub file: Option<PathBuf>,

    /// Rendered width of a tab character
    #[arg(long, env = "PAGEDIT_TAB_WIDTH", default_value_t = pagedit_buffer::DEFAULT_TAB_WIDTH)]
    pub tab_width: usize,

    /// Write logs to this file (logging is off without it)
    #[arg(long, env = "PAGEDIT_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Virtual address space reserved for the buffer arena, in MiB
    #[arg(long, env = "PAGEDIT_ARENA_RESERVE_MIB", default_value_t = DEFAULT_ARENA_RESERVE_MIB)]
    pub arena_reserve_mib: usize,

    /// Bytes per span
    #[arg(long, hide = true, default_value_t = DEFAULT_SPAN_CAPACITY)]
    pub span_capacity: usize,

    /// Lines per page
    #[arg(long, hide = true, default_value_t = DEFAULT_PAGE_CAPACITY)]
    pub page_capacity: usize,
}

/// A configuration value that failed validation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be at least 1")]
    Zero { name: &'static str },
    #[error("arena reservation of {mib} MiB is too large")]
    ReserveTooLarge { mib: usize },
}

/// Validated editor configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    pub file: Option<PathBuf>,
    pub tab_width: usize,
    pub log_file: Option<PathBuf>,
    pub arena_reserve: usize,
    pub geometry: Geometry,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            file: None,
            tab_width: pagedit_buffer::DEFAULT_TAB_WIDTH,
            log_file: None,
            arena_reserve: DEFAULT_ARENA_RESERVE_MIB * MIB,
            geometry: Geometry::default(),
        }
    }
}

impl EditorConfig {
    /// Storage configuration for the editable buffer.
    pub fn buffer_config(&self) -> BufferConfig {
        BufferConfig {
            geometry: self.geometry,
            arena: ArenaConfig::with_reserve(self.arena_reserve),
        }
    }

    /// Configuration for the per-frame arena.
    pub fn frame_arena_config(&self) -> ArenaConfig {
        ArenaConfig::with_reserve(FRAME_ARENA_RESERVE)
    }
}

impl TryFrom<Cli> for EditorConfig {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let nonzero = |value: usize, name: &'static str| {
            if value == 0 {
                Err(ConfigError::Zero { name })
            } else {
                Ok(value)
            }
        };

        let tab_width = nonzero(cli.tab_width, "--tab-width")?;
        let span_capacity = nonzero(cli.span_capacity, "--span-capacity")?;
        let page_capacity = nonzero(cli.page_capacity, "--page-capacity")?;
        let mib = nonzero(cli.arena_reserve_mib, "--arena-reserve-mib")?;
        let arena_reserve = mib
            .checked_mul(MIB)
            .ok_or(ConfigError::ReserveTooLarge { mib })?;

        Ok(Self {
            file: cli.file,
            tab_width,
            log_file: cli.log_file,
            arena_reserve,
            geometry: Geometry::new(span_capacity, page_capacity),
        })
    }
}
