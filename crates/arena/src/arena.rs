// Chunk: docs/chunks/arena_allocator - Reserve/commit/decommit bump allocator

//! Bump allocator over a single virtual-memory reservation.
//!
//! The arena reserves a large address range once and commits it lazily in
//! fixed granules as the bump position advances. Popping only ever moves the
//! position backwards; once the committed high-water mark runs far enough
//! ahead of the position, the excess is decommitted. Regions below the
//! position stay addressable garbage until they are pushed again.
//!
//! Allocations are handed out as [`Region`]s (offset + length) rather than
//! pointers, so every access goes through the arena and is bounds checked
//! against the committed window.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::os;
use crate::ArenaError;

const KIB: usize = 1024;
const MIB: usize = 1024 * KIB;
const GIB: usize = 1024 * MIB;

/// Default virtual reservation for a buffer arena.
pub const DEFAULT_RESERVE_SIZE: usize = GIB;
/// Commits happen in multiples of this many bytes (rounded up to the OS page size).
pub const DEFAULT_COMMIT_GRANULARITY: usize = 4 * KIB;
/// Committed memory this far beyond the position is handed back on pop.
pub const DEFAULT_DECOMMIT_THRESHOLD: usize = 64 * MIB;
/// Reservation used by each scratch arena.
pub const SCRATCH_RESERVE_SIZE: usize = 64 * MIB;

static NEXT_ARENA_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an arena, used for scratch conflict sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArenaId(u64);

impl ArenaId {
    fn next() -> Self {
        Self(NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Sizing knobs for an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Bytes of address space reserved up front. Never grows.
    pub reserve_size: usize,
    /// Commit step in bytes.
    pub commit_granularity: usize,
    /// Distance between the position and the committed mark that triggers a decommit.
    pub decommit_threshold: usize,
}

impl ArenaConfig {
    /// Default configuration with a different reservation size.
    pub fn with_reserve(reserve_size: usize) -> Self {
        Self {
            reserve_size,
            ..Self::default()
        }
    }

    /// Configuration for the arenas of a scratch pool.
    pub fn scratch() -> Self {
        Self::with_reserve(SCRATCH_RESERVE_SIZE)
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            reserve_size: DEFAULT_RESERVE_SIZE,
            commit_granularity: DEFAULT_COMMIT_GRANULARITY,
            decommit_threshold: DEFAULT_DECOMMIT_THRESHOLD,
        }
    }
}

/// A contiguous allocation inside an arena, as an offset from its base.
///
/// A region carries no lifetime: it stays meaningful until the arena pops
/// below its offset, after which it refers to garbage (or to a newer
/// allocation). Access through [`Arena::bytes`] is always memory safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Region {
    offset: usize,
    len: usize,
}

impl Region {
    /// The empty region at offset 0.
    pub const EMPTY: Region = Region { offset: 0, len: 0 };

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// First byte past the region.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Sub-region `[start, end)` relative to this region.
    ///
    /// # Panics
    ///
    /// Panics if the range does not fit inside the region.
    pub fn slice(&self, start: usize, end: usize) -> Region {
        assert!(
            start <= end && end <= self.len,
            "sub-range {start}..{end} outside region of {} bytes",
            self.len
        );
        Region {
            offset: self.offset + start,
            len: end - start,
        }
    }
}

/// Reserve/commit/decommit bump allocator.
///
/// Invariant: `pos <= committed <= reserved`.
pub struct Arena {
    base: NonNull<u8>,
    reserved: usize,
    pos: usize,
    committed: usize,
    peak: usize,
    commit_granularity: usize,
    decommit_threshold: usize,
    id: ArenaId,
}

// SAFETY: the arena exclusively owns its reservation; all access to the
// memory goes through `&self` / `&mut self`.
unsafe impl Send for Arena {}

impl Arena {
    /// Reserves address space for a new arena. Nothing is committed yet.
    pub fn new(config: ArenaConfig) -> Result<Self, ArenaError> {
        let page = os::page_size();
        let commit_granularity = align_forward(config.commit_granularity.max(1), page);
        let reserved = align_forward(config.reserve_size.max(1), commit_granularity);

        let base = os::reserve(reserved).map_err(|source| ArenaError::Reserve {
            size: reserved,
            source,
        })?;

        tracing::trace!(reserved, commit_granularity, "arena reserved");

        Ok(Self {
            base,
            reserved,
            pos: 0,
            committed: 0,
            peak: 0,
            commit_granularity,
            decommit_threshold: config.decommit_threshold,
            id: ArenaId::next(),
        })
    }

    // ==================== Accessors ====================

    pub fn id(&self) -> ArenaId {
        self.id
    }

    /// Current bump position.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Bytes currently committed (the high-water mark of the commit window).
    pub fn committed(&self) -> usize {
        self.committed
    }

    /// Size of the address space reservation.
    pub fn reserved(&self) -> usize {
        self.reserved
    }

    /// Highest position ever reached.
    pub fn peak(&self) -> usize {
        self.peak
    }

    pub fn commit_granularity(&self) -> usize {
        self.commit_granularity
    }

    // ==================== Push ====================

    /// Bump-allocates `size` zeroed bytes aligned to `align`.
    ///
    /// # Panics
    ///
    /// Panics if the reservation is exhausted or the OS refuses to commit.
    /// There is no growth path.
    pub fn push(&mut self, size: usize, align: usize) -> Region {
        match self.try_push(size, align) {
            Ok(region) => region,
            Err(err) => panic!("{err}"),
        }
    }

    /// Like [`push`](Self::push) but reports exhaustion instead of panicking.
    pub fn try_push(&mut self, size: usize, align: usize) -> Result<Region, ArenaError> {
        let region = self.try_push_nozero(size, align)?;
        self.bytes_mut(region).fill(0);
        Ok(region)
    }

    /// Bump-allocates without clearing; the bytes may hold stale data from
    /// earlier allocations.
    ///
    /// # Panics
    ///
    /// Panics if the reservation is exhausted.
    pub fn push_nozero(&mut self, size: usize, align: usize) -> Region {
        match self.try_push_nozero(size, align) {
            Ok(region) => region,
            Err(err) => panic!("{err}"),
        }
    }

    /// Non-panicking form of [`push_nozero`](Self::push_nozero).
    pub fn try_push_nozero(&mut self, size: usize, align: usize) -> Result<Region, ArenaError> {
        assert!(align.is_power_of_two(), "alignment {align} is not a power of two");

        if size == 0 {
            return Ok(Region {
                offset: self.pos,
                len: 0,
            });
        }

        let start = align_forward(self.pos, align);

        let end = start
            .checked_add(size)
            .filter(|&end| end <= self.reserved)
            .ok_or(ArenaError::OutOfMemory {
                requested: size,
                reserved: self.reserved,
            })?;

        if end > self.committed {
            let new_committed = align_forward(end, self.commit_granularity).min(self.reserved);
            // SAFETY: committed..new_committed lies inside the reservation and
            // both bounds are multiples of the commit granularity.
            unsafe { os::commit(self.base, self.committed, new_committed - self.committed) }
                .map_err(|source| ArenaError::Commit {
                    size: new_committed - self.committed,
                    source,
                })?;
            self.committed = new_committed;
        }

        self.pos = end;
        self.peak = self.peak.max(end);
        Ok(Region { offset: start, len: size })
    }

    /// Copies `bytes` into a fresh byte-aligned region.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> Region {
        let region = self.push_nozero(bytes.len(), 1);
        self.bytes_mut(region).copy_from_slice(bytes);
        region
    }

    // ==================== Pop ====================

    /// Rewinds the position to `pos`. Never moves forward.
    ///
    /// Once the committed window extends at least `decommit_threshold` bytes
    /// past the (granule-aligned) position, the excess is decommitted.
    pub fn pop_to(&mut self, pos: usize) {
        self.pos = pos.min(self.pos);

        let keep = align_forward(self.pos, self.commit_granularity).min(self.reserved);
        if keep < self.committed && keep + self.decommit_threshold <= self.committed {
            let excess = self.committed - keep;
            // SAFETY: keep..committed lies inside the reservation, both bounds
            // are granule aligned, and `&mut self` guarantees no outstanding
            // borrows of arena memory.
            match unsafe { os::decommit(self.base, keep, excess) } {
                Ok(()) => {
                    tracing::debug!(decommitted = excess, pos = self.pos, "arena decommit");
                    self.committed = keep;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "arena decommit failed; keeping pages committed");
                }
            }
        }
    }

    /// Rewinds by `amount` bytes, stopping at 0.
    pub fn pop(&mut self, amount: usize) {
        let amount = amount.min(self.pos);
        self.pop_to(self.pos - amount);
    }

    /// Rewinds to the start of the arena.
    pub fn reset(&mut self) {
        self.pop_to(0);
    }

    // ==================== Temp regions ====================

    /// Saves the current position; the returned guard restores it on drop.
    pub fn begin_temp(&mut self) -> TempRegion<'_> {
        let restore = self.pos;
        TempRegion {
            arena: self,
            restore,
        }
    }

    // ==================== Access ====================

    /// Borrows the bytes of a region.
    ///
    /// # Panics
    ///
    /// Panics if the region reaches past the committed window.
    pub fn bytes(&self, region: Region) -> &[u8] {
        self.check_committed(region);
        // SAFETY: the region lies inside committed, readable memory owned by
        // this arena, and the returned borrow is tied to `&self`.
        unsafe { std::slice::from_raw_parts(self.base.as_ptr().add(region.offset), region.len) }
    }

    /// Mutably borrows the bytes of a region.
    ///
    /// # Panics
    ///
    /// Panics if the region reaches past the committed window.
    pub fn bytes_mut(&mut self, region: Region) -> &mut [u8] {
        self.check_committed(region);
        // SAFETY: as in `bytes`, and `&mut self` rules out aliasing borrows.
        unsafe {
            std::slice::from_raw_parts_mut(self.base.as_ptr().add(region.offset), region.len)
        }
    }

    fn check_committed(&self, region: Region) {
        assert!(
            region.end() <= self.committed,
            "region {:?} reaches past committed memory ({} bytes)",
            region,
            self.committed
        );
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        // SAFETY: base/reserved came from os::reserve and the arena is gone.
        unsafe { os::release(self.base, self.reserved) }
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("id", &self.id)
            .field("pos", &self.pos)
            .field("committed", &self.committed)
            .field("reserved", &self.reserved)
            .field("peak", &self.peak)
            .finish()
    }
}

/// Scoped checkpoint on an arena. Dereferences to the arena so allocations
/// can continue inside the scope; dropping it pops back to the checkpoint.
pub struct TempRegion<'a> {
    arena: &'a mut Arena,
    restore: usize,
}

impl TempRegion<'_> {
    /// Position that will be restored.
    pub fn restore_pos(&self) -> usize {
        self.restore
    }

    /// Ends the region explicitly.
    pub fn end(self) {}
}

impl Deref for TempRegion<'_> {
    type Target = Arena;

    fn deref(&self) -> &Arena {
        self.arena
    }
}

impl DerefMut for TempRegion<'_> {
    fn deref_mut(&mut self) -> &mut Arena {
        self.arena
    }
}

impl Drop for TempRegion<'_> {
    fn drop(&mut self) {
        self.arena.pop_to(self.restore);
    }
}

fn align_forward(value: usize, align: usize) -> usize {
    value.div_ceil(align) * align
}
