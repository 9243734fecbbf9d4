// Chunk: docs/chunks/arena_allocator - Reserve/commit/decommit bump allocator
// Chunk: docs/chunks/scratch_arenas - Per-thread scratch arenas with conflict avoidance

//! pagedit-arena: the memory layer underneath the pagedit buffer.
//!
//! # Overview
//!
//! [`Arena`] is a bump allocator over one large virtual-memory reservation.
//! Memory is committed in granules as the position grows and decommitted
//! again once the position falls far enough behind the committed mark.
//! Allocations are [`Region`] handles; their bytes are reached through
//! [`Arena::bytes`] and [`Arena::bytes_mut`].
//!
//! [`ScratchPool`] keeps a small number of arenas for temporary work. A
//! caller that already holds an arena passes its [`ArenaId`] as a conflict
//! so the scratch space it receives is never the same memory.
//!
//! # Example
//!
//! ```
//! use pagedit_arena::{Arena, ArenaConfig};
//!
//! let mut arena = Arena::new(ArenaConfig::with_reserve(1 << 20)).unwrap();
//! let hello = arena.push_bytes(b"hello");
//! assert_eq!(arena.bytes(hello), b"hello");
//!
//! {
//!     let mut temp = arena.begin_temp();
//!     temp.push(4096, 8);
//! }
//! assert_eq!(arena.pos(), 5);
//! ```

mod arena;
mod os;
mod scratch;

use std::io;

pub use arena::{
    Arena, ArenaConfig, ArenaId, Region, TempRegion, DEFAULT_COMMIT_GRANULARITY,
    DEFAULT_DECOMMIT_THRESHOLD, DEFAULT_RESERVE_SIZE, SCRATCH_RESERVE_SIZE,
};
pub use scratch::{with_scratch, Scratch, ScratchPool, SCRATCH_ARENA_COUNT};

/// Failures reported by arena operations.
#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    #[error("failed to reserve {size} bytes of address space: {source}")]
    Reserve { size: usize, source: io::Error },

    #[error("failed to commit {size} bytes: {source}")]
    Commit { size: usize, source: io::Error },

    #[error("arena out of memory: requested {requested} bytes, reservation is {reserved} bytes")]
    OutOfMemory { requested: usize, reserved: usize },
}
