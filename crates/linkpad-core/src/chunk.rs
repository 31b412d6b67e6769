//! Chunk nodes and the arena that owns them.
//!
//! The document is a doubly-linked chain of fixed-capacity byte chunks. The
//! chain lives in a [`ChunkArena`]: chunks are addressed by [`ChunkId`]s
//! (slot index + generation) and link to their neighbours by id, so cursors
//! can hold cheap `Copy` references that survive growth of the arena's
//! backing store.
//!
//! # Stale ids
//!
//! Removing a chunk bumps its slot's generation. Any id minted before the
//! removal no longer resolves, which is how a location that outlived its
//! chunk is caught instead of silently reading a recycled slot.

use std::fmt;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// ChunkId
// ---------------------------------------------------------------------------

/// Stable handle to a chunk in the arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkId {
    index: u32,
    generation: u32,
}

impl ChunkId {
    /// Slot index inside the arena. Only meaningful for diagnostics.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }
}

impl fmt::Debug for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

// ---------------------------------------------------------------------------
// Chunk
// ---------------------------------------------------------------------------

/// A link in the document chain.
///
/// Owns `capacity` bytes of inline storage of which `bytes[..len]` are
/// meaningful. The capacity is fixed at allocation.
pub struct Chunk {
    bytes: Box<[u8]>,
    len: usize,
    prev: Option<ChunkId>,
    next: Option<ChunkId>,
}

impl Chunk {
    /// Allocate an empty, unlinked chunk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] if the byte storage cannot be allocated.
    pub(crate) fn try_new(capacity: usize) -> Result<Self> {
        debug_assert!(capacity > 0, "chunk capacity must be at least 1");
        let mut bytes = Vec::new();
        bytes.try_reserve_exact(capacity)?;
        bytes.resize(capacity, 0);
        Ok(Self {
            bytes: bytes.into_boxed_slice(),
            len: 0,
            prev: None,
            next: None,
        })
    }

    /// Maximum number of bytes this chunk can hold.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Number of occupied bytes.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len == self.bytes.len()
    }

    /// The occupied bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Byte at `offset`, if occupied.
    #[inline]
    #[must_use]
    pub fn get(&self, offset: usize) -> Option<u8> {
        self.as_bytes().get(offset).copied()
    }

    #[inline]
    #[must_use]
    pub const fn prev(&self) -> Option<ChunkId> {
        self.prev
    }

    #[inline]
    #[must_use]
    pub const fn next(&self) -> Option<ChunkId> {
        self.next
    }

    pub(crate) const fn set_prev(&mut self, prev: Option<ChunkId>) {
        self.prev = prev;
    }

    pub(crate) const fn set_next(&mut self, next: Option<ChunkId>) {
        self.next = next;
    }

    /// Shift `bytes[at..len]` right by one and write `byte` at `at`.
    pub(crate) fn insert_byte(&mut self, at: usize, byte: u8) {
        debug_assert!(!self.is_full(), "insert into a full chunk");
        debug_assert!(at <= self.len);
        self.bytes.copy_within(at..self.len, at + 1);
        self.bytes[at] = byte;
        self.len += 1;
    }

    /// Shift `bytes[at + 1..len]` left by one, dropping the byte at `at`.
    pub(crate) fn remove_byte(&mut self, at: usize) -> u8 {
        debug_assert!(at < self.len);
        let removed = self.bytes[at];
        self.bytes.copy_within(at + 1..self.len, at);
        self.len -= 1;
        removed
    }

    /// Move `bytes[at..len]` into the front of `tail` and truncate to `at`.
    ///
    /// `tail` must be empty and at least as large as the moved run.
    pub(crate) fn split_off_into(&mut self, at: usize, tail: &mut Self) {
        debug_assert!(tail.is_empty());
        let moved = self.len - at;
        tail.bytes[..moved].copy_from_slice(&self.bytes[at..self.len]);
        tail.len = moved;
        self.len = at;
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("bytes", &String::from_utf8_lossy(self.as_bytes()))
            .field("capacity", &self.capacity())
            .field("prev", &self.prev)
            .field("next", &self.next)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// ChunkArena
// ---------------------------------------------------------------------------

enum Slot {
    Occupied { generation: u32, chunk: Chunk },
    Vacant { generation: u32, next_free: Option<u32> },
}

/// Generational slot storage for chunks.
///
/// Vacant slots form an intrusive free list, so freeing never allocates.
/// Inserting may need one new slot; callers reserve it with
/// [`reserve`](Self::reserve) before touching any other state so that an
/// allocation failure leaves everything untouched.
#[derive(Default)]
pub struct ChunkArena {
    slots: Vec<Slot>,
    free_head: Option<u32>,
    live: usize,
}

impl ChunkArena {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            live: 0,
        }
    }

    /// Number of live chunks.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.live
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Make sure the next [`insert`](Self::insert) cannot fail.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] if a new slot cannot be reserved or the
    /// slot index space is used up.
    pub fn reserve(&mut self) -> Result<()> {
        if self.free_head.is_none() {
            slot_index(self.slots.len())?;
            if self.slots.len() == self.slots.capacity() {
                self.slots.try_reserve(1)?;
            }
        }
        Ok(())
    }

    /// Store a chunk and return its id. Reuses a vacant slot when one exists.
    ///
    /// Call [`reserve`](Self::reserve) first on any path that must not fail
    /// halfway through.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] if no vacant slot exists and the slot
    /// index space is used up.
    pub fn insert(&mut self, chunk: Chunk) -> Result<ChunkId> {
        if let Some(index) = self.free_head {
            let slot = &mut self.slots[index as usize];
            let Slot::Vacant { generation, next_free } = *slot else {
                unreachable!("free list points at an occupied slot");
            };
            self.free_head = next_free;
            *slot = Slot::Occupied { generation, chunk };
            self.live += 1;
            return Ok(ChunkId { index, generation });
        }

        let index = slot_index(self.slots.len())?;
        self.slots.push(Slot::Occupied {
            generation: 0,
            chunk,
        });
        self.live += 1;
        Ok(ChunkId {
            index,
            generation: 0,
        })
    }

    /// Remove a chunk, invalidating every id that points at it.
    pub fn remove(&mut self, id: ChunkId) -> Option<Chunk> {
        let slot = self.slots.get_mut(id.index as usize)?;
        match slot {
            Slot::Occupied { generation, .. } if *generation == id.generation => {}
            _ => return None,
        }
        let vacant = Slot::Vacant {
            generation: id.generation.wrapping_add(1),
            next_free: self.free_head,
        };
        let Slot::Occupied { chunk, .. } = std::mem::replace(slot, vacant) else {
            return None;
        };
        self.free_head = Some(id.index);
        self.live -= 1;
        Some(chunk)
    }

    /// Resolve an id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLocation`] if the chunk has been removed.
    pub fn get(&self, id: ChunkId) -> Result<&Chunk> {
        match self.slots.get(id.index as usize) {
            Some(Slot::Occupied { generation, chunk }) if *generation == id.generation => {
                Ok(chunk)
            }
            _ => Err(Error::InvalidLocation),
        }
    }

    /// Resolve an id mutably.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLocation`] if the chunk has been removed.
    pub fn get_mut(&mut self, id: ChunkId) -> Result<&mut Chunk> {
        match self.slots.get_mut(id.index as usize) {
            Some(Slot::Occupied { generation, chunk }) if *generation == id.generation => {
                Ok(chunk)
            }
            _ => Err(Error::InvalidLocation),
        }
    }
}

impl fmt::Debug for ChunkArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkArena")
            .field("slots", &self.slots.len())
            .field("live", &self.live)
            .finish_non_exhaustive()
    }
}

/// Index for a slot appended at position `len`. Ids carry a `u32` index, so
/// an arena with `u32::MAX + 1` slots is as full as allocation failure.
fn slot_index(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::OutOfMemory)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
