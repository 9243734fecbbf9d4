// Chunk: docs/chunks/scratch_arenas - Per-thread scratch arenas with conflict avoidance

//! A small fixed pool of arenas for transient allocations.
//!
//! Each lent-out [`Scratch`] is a checkpoint on one pool arena; dropping it
//! rewinds that arena. Callers name the arenas they are already writing to
//! as conflicts, so nested helpers never rewind memory their caller still
//! uses.

use std::cell::{RefCell, RefMut};
use std::ops::{Deref, DerefMut};

use crate::{Arena, ArenaConfig, ArenaError, ArenaId};

/// Number of arenas in a scratch pool.
pub const SCRATCH_ARENA_COUNT: usize = 2;

/// Fixed set of scratch arenas.
pub struct ScratchPool {
    ids: Vec<ArenaId>,
    arenas: Vec<RefCell<Arena>>,
}

impl ScratchPool {
    /// Creates a pool of [`SCRATCH_ARENA_COUNT`] arenas sharing one configuration.
    pub fn new(config: ArenaConfig) -> Result<Self, ArenaError> {
        let mut ids = Vec::with_capacity(SCRATCH_ARENA_COUNT);
        let mut arenas = Vec::with_capacity(SCRATCH_ARENA_COUNT);
        for _ in 0..SCRATCH_ARENA_COUNT {
            let arena = Arena::new(config)?;
            ids.push(arena.id());
            arenas.push(RefCell::new(arena));
        }
        Ok(Self { ids, arenas })
    }

    /// Ids of the pool's arenas, in pick order.
    pub fn ids(&self) -> &[ArenaId] {
        &self.ids
    }

    /// Lends out the first arena that is neither listed in `conflicts` nor
    /// already lent. Returns `None` when every arena is taken.
    pub fn begin(&self, conflicts: &[ArenaId]) -> Option<Scratch<'_>> {
        self.ids
            .iter()
            .zip(&self.arenas)
            .filter(|(id, _)| !conflicts.contains(*id))
            .find_map(|(_, cell)| cell.try_borrow_mut().ok())
            .map(|arena| {
                let restore = arena.pos();
                Scratch { arena, restore }
            })
    }
}

/// A checkpoint on a lent-out scratch arena.
pub struct Scratch<'a> {
    arena: RefMut<'a, Arena>,
    restore: usize,
}

impl Scratch<'_> {
    /// Ends the scratch region explicitly.
    pub fn end(self) {}
}

impl Deref for Scratch<'_> {
    type Target = Arena;

    fn deref(&self) -> &Arena {
        &self.arena
    }
}

impl DerefMut for Scratch<'_> {
    fn deref_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }
}

impl Drop for Scratch<'_> {
    fn drop(&mut self) {
        self.arena.pop_to(self.restore);
    }
}

thread_local! {
    static THREAD_SCRATCH: ScratchPool = match ScratchPool::new(ArenaConfig::scratch()) {
        Ok(pool) => pool,
        Err(err) => panic!("cannot create scratch arenas: {err}"),
    };
}

/// Runs `f` with a scratch region from this thread's pool.
///
/// # Panics
///
/// Panics if every pool arena is either listed in `conflicts` or already
/// lent out further up the stack.
pub fn with_scratch<R>(conflicts: &[ArenaId], f: impl FnOnce(&mut Scratch<'_>) -> R) -> R {
    THREAD_SCRATCH.with(|pool| {
        let Some(mut scratch) = pool.begin(conflicts) else {
            panic!("no scratch arena available outside {} conflicts", conflicts.len());
        };
        f(&mut scratch)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> ScratchPool {
        ScratchPool::new(ArenaConfig::with_reserve(1 << 20)).unwrap()
    }

    #[test]
    fn test_begin_picks_first_free_arena() {
        let pool = pool();
        let scratch = pool.begin(&[]).unwrap();
        assert_eq!(scratch.id(), pool.ids()[0]);
    }

    #[test]
    fn test_begin_skips_conflicts() {
        let pool = pool();
        let first = pool.ids()[0];
        let scratch = pool.begin(&[first]).unwrap();
        assert_eq!(scratch.id(), pool.ids()[1]);
    }

    #[test]
    fn test_nested_scratch_uses_other_arena() {
        let pool = pool();
        let outer = pool.begin(&[]).unwrap();
        let inner = pool.begin(&[outer.id()]).unwrap();
        assert_ne!(outer.id(), inner.id());
        assert!(pool.begin(&[]).is_none());
    }

    #[test]
    fn test_scratch_restores_position_on_drop() {
        let pool = pool();
        {
            let mut scratch = pool.begin(&[]).unwrap();
            scratch.push_bytes(b"transient");
            assert_eq!(scratch.pos(), 9);
        }
        let scratch = pool.begin(&[]).unwrap();
        assert_eq!(scratch.pos(), 0);
    }

    #[test]
    fn test_scratch_nests_inside_outstanding_allocation() {
        let pool = pool();
        let mut outer = pool.begin(&[]).unwrap();
        let kept = outer.push_bytes(b"keep");
        {
            let mut inner = pool.begin(&[outer.id()]).unwrap();
            inner.push(128, 8);
        }
        assert_eq!(outer.bytes(kept), b"keep");
        assert_eq!(outer.pos(), 4);
    }

    #[test]
    fn test_with_scratch_rewinds_thread_pool() {
        let first = with_scratch(&[], |scratch| {
            scratch.push_bytes(b"abc");
            scratch.pos()
        });
        let second = with_scratch(&[], |scratch| scratch.pos());
        assert!(first >= 3);
        assert_eq!(second, first - 3);
    }

    #[test]
    fn test_with_scratch_avoids_caller_arena() {
        with_scratch(&[], |outer| {
            let outer_id = outer.id();
            with_scratch(&[outer_id], |inner| assert_ne!(inner.id(), outer_id));
        });
    }
}
