// Chunk: docs/chunks/record_recycling - Generation-checked slabs with LIFO free stacks

//! Slot storage for pages and spans.
//!
//! Records are addressed by [`Handle`]s carrying the slot index and the
//! slot's generation at the time the handle was issued. Retiring a record
//! bumps the generation and pushes the slot onto a LIFO free stack; the
//! record itself stays in place so its resources (a span's arena region, a
//! page's line array) can be reused when the slot is revived. Looking up a
//! stale handle panics instead of aliasing the revived record.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Typed, generation-checked index into a [`Slab`].
pub struct Handle<T> {
    index: u32,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    fn new(index: u32, generation: u32) -> Self {
        Self {
            index,
            generation,
            _marker: PhantomData,
        }
    }

    pub fn index(&self) -> usize {
        self.index as usize
    }
}

// Manual impls: derives would require `T: Copy` etc.
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

struct Slot<T> {
    generation: u32,
    live: bool,
    value: T,
}

pub struct Slab<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
}

impl<T> Slab<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Adds a new record in a fresh slot.
    pub fn push(&mut self, value: T) -> Handle<T> {
        let index = u32::try_from(self.slots.len()).unwrap_or_else(|_| panic!("slab index overflow"));
        self.slots.push(Slot {
            generation: 0,
            live: true,
            value,
        });
        Handle::new(index, 0)
    }

    /// Revives the most recently retired slot, if any. The record keeps
    /// whatever state it had when it was retired.
    pub fn pop_free(&mut self) -> Option<Handle<T>> {
        let index = self.free.pop()?;
        let slot = &mut self.slots[index as usize];
        slot.live = true;
        Some(Handle::new(index, slot.generation))
    }

    /// Retires a live record, invalidating every handle to it.
    ///
    /// # Panics
    ///
    /// Panics if `handle` is stale.
    pub fn retire(&mut self, handle: Handle<T>) {
        let slot = self.slot_mut(handle);
        slot.live = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
    }

    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.slots
            .get(handle.index())
            .is_some_and(|slot| slot.live && slot.generation == handle.generation)
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of retired records waiting on the free stack.
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    /// Number of slots ever created (live + retired).
    pub fn allocated(&self) -> usize {
        self.slots.len()
    }

    fn slot(&self, handle: Handle<T>) -> &Slot<T> {
        match self.slots.get(handle.index()) {
            Some(slot) if slot.live && slot.generation == handle.generation => slot,
            _ => panic!("stale handle {handle:?}"),
        }
    }

    fn slot_mut(&mut self, handle: Handle<T>) -> &mut Slot<T> {
        match self.slots.get_mut(handle.index()) {
            Some(slot) if slot.live && slot.generation == handle.generation => slot,
            _ => panic!("stale handle {handle:?}"),
        }
    }
}

impl<T> Default for Slab<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<Handle<T>> for Slab<T> {
    type Output = T;

    fn index(&self, handle: Handle<T>) -> &T {
        &self.slot(handle).value
    }
}

impl<T> IndexMut<Handle<T>> for Slab<T> {
    fn index_mut(&mut self, handle: Handle<T>) -> &mut T {
        &mut self.slot_mut(handle).value
    }
}
