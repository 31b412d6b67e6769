//! Text buffer — the document as a chain of fixed-capacity byte chunks.
//!
//! A `Buffer` owns a doubly-linked chain of [`Chunk`]s stored in a
//! [`ChunkArena`]. The chain always holds at least one chunk; an empty
//! document is a single chunk of length 0. Cursors are [`Location`]s into
//! the chain.
//!
//! # Design choices
//!
//! - **Bytes, not chars.** The buffer stores raw bytes and every offset is a
//!   byte offset. No grapheme or UTF-8 awareness.
//!
//! - **Edits are local.** Insert and delete shift bytes inside one chunk.
//!   Inserting into a full chunk splits it: the tail after the cursor moves
//!   into a freshly linked chunk. Cost is O(chunk capacity) per edit.
//!
//! - **Emptied chunks linger** until [`compact`](Self::compact) runs. Edits
//!   never free chunks, so a cursor stays valid across any number of edits.
//!
//! - **Fallible allocation.** Chunk storage and arena slots are reserved
//!   before the chain is touched, so an allocation failure returns
//!   [`Error::OutOfMemory`] with the buffer and cursor unchanged.

use std::fmt;
use std::io::{Read, Write};

use tracing::debug;

use crate::chunk::{Chunk, ChunkArena, ChunkId};
use crate::error::{Error, Result};
use crate::location::Location;
use crate::options::DEFAULT_CHUNK_CAPACITY;

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

/// A byte document stored as a chain of chunks.
pub struct Buffer {
    pub(crate) chunks: ChunkArena,
    pub(crate) head: ChunkId,
    pub(crate) tail: ChunkId,
    chunk_capacity: usize,
}

impl Buffer {
    // -- Construction -------------------------------------------------------

    /// Create an empty buffer with the default chunk capacity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] if the head chunk cannot be allocated.
    pub fn new() -> Result<Self> {
        Self::with_chunk_capacity(DEFAULT_CHUNK_CAPACITY)
    }

    /// Create an empty buffer whose chunks hold `capacity` bytes each.
    ///
    /// A capacity of 0 is treated as 1.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] if the head chunk cannot be allocated,
    /// which includes capacities beyond the address space.
    pub fn with_chunk_capacity(capacity: usize) -> Result<Self> {
        let capacity = capacity.max(1);
        let head_chunk = Chunk::try_new(capacity)?;
        let mut chunks = ChunkArena::new();
        chunks.reserve()?;
        let head = chunks.insert(head_chunk)?;
        Ok(Self {
            chunks,
            head,
            tail: head,
            chunk_capacity: capacity,
        })
    }

    /// Build a buffer by inserting `bytes` at an advancing start-of-document
    /// cursor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] if a chunk cannot be allocated.
    pub fn from_bytes(bytes: &[u8], capacity: usize) -> Result<Self> {
        let mut buffer = Self::with_chunk_capacity(capacity)?;
        let mut cursor = buffer.start();
        buffer.insert_bytes_before_cursor(&mut cursor, bytes.iter().copied())?;
        debug!(
            bytes = bytes.len(),
            chunks = buffer.chunk_count(),
            "loaded buffer"
        );
        Ok(buffer)
    }

    /// Load a buffer from a byte stream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if reading fails, or [`Error::OutOfMemory`] if a
    /// chunk cannot be allocated.
    pub fn read_from(mut reader: impl Read, capacity: usize) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes, capacity)
    }

    // -- Whole-document access ----------------------------------------------

    /// Capacity given to every chunk this buffer allocates.
    #[inline]
    #[must_use]
    pub const fn chunk_capacity(&self) -> usize {
        self.chunk_capacity
    }

    /// Number of chunks in the chain (at least 1).
    #[inline]
    #[must_use]
    pub const fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// The first chunk of the chain.
    #[inline]
    #[must_use]
    pub const fn head(&self) -> ChunkId {
        self.head
    }

    /// The last chunk of the chain.
    #[inline]
    #[must_use]
    pub const fn tail(&self) -> ChunkId {
        self.tail
    }

    /// Look up a chunk by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLocation`] if the chunk has been removed.
    pub fn chunk(&self, id: ChunkId) -> Result<&Chunk> {
        self.chunks.get(id)
    }

    /// Iterate over the chain head → tail.
    #[must_use]
    pub fn chunks(&self) -> Chunks<'_> {
        Chunks {
            arena: &self.chunks,
            next: Some(self.head),
        }
    }

    /// Total byte length. Walks the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks().map(|(_, chunk)| chunk.len()).sum()
    }

    /// True when the document holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks().all(|(_, chunk)| chunk.is_empty())
    }

    /// Concatenate every chunk's bytes head → tail.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        for (_, chunk) in self.chunks() {
            out.extend_from_slice(chunk.as_bytes());
        }
        out
    }

    /// Write the document to a byte stream. The output is exactly the
    /// document bytes, with no header or framing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the writer fails.
    pub fn write_to(&self, mut writer: impl Write) -> Result<()> {
        let mut written = 0;
        for (_, chunk) in self.chunks() {
            writer.write_all(chunk.as_bytes())?;
            written += chunk.len();
        }
        writer.flush()?;
        debug!(bytes = written, "saved buffer");
        Ok(())
    }

    // -- Locations ----------------------------------------------------------

    /// Document start: the head chunk at offset 0.
    #[inline]
    #[must_use]
    pub const fn start(&self) -> Location {
        Location::new(self.head, 0)
    }

    /// Document end: the tail chunk at its length.
    #[must_use]
    pub fn end(&self) -> Location {
        let len = self.chunks.get(self.tail).map_or(0, Chunk::len);
        Location::new(self.tail, len)
    }

    /// Check that `loc` names a live chunk and an in-bounds offset.
    fn resolve(&self, loc: Location) -> Result<&Chunk> {
        let chunk = self.chunks.get(loc.chunk)?;
        if loc.offset > chunk.len() {
            return Err(Error::InvalidLocation);
        }
        Ok(chunk)
    }

    /// True when no byte follows `loc` anywhere in the document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLocation`] for a stale location.
    pub fn is_at_end(&self, loc: Location) -> Result<bool> {
        let mut at = loc;
        self.snap_right(&mut at)?;
        let chunk = self.resolve(at)?;
        Ok(chunk.next().is_none() && at.offset == chunk.len())
    }

    /// True when no byte precedes `loc` anywhere in the document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLocation`] for a stale location.
    pub fn is_at_start(&self, loc: Location) -> Result<bool> {
        let mut at = loc;
        self.snap_left(&mut at)?;
        Ok(at.offset == 0)
    }

    /// The byte immediately after `loc`, or `None` at document end.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLocation`] for a stale location.
    pub fn byte_at(&self, loc: Location) -> Result<Option<u8>> {
        let mut at = loc;
        self.snap_right(&mut at)?;
        Ok(self.resolve(at)?.get(at.offset))
    }

    /// Absolute byte offset of `loc` from the document start.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLocation`] if `loc` is stale or its chunk is
    /// not reachable from the head.
    pub fn offset_of(&self, loc: Location) -> Result<usize> {
        self.resolve(loc)?;
        let mut before = 0;
        for (id, chunk) in self.chunks() {
            if id == loc.chunk {
                return Ok(before + loc.offset);
            }
            before += chunk.len();
        }
        Err(Error::InvalidLocation)
    }

    /// The right-snapped location at absolute byte `offset`, or `None` if
    /// `offset` is past the document end.
    #[must_use]
    pub fn location_at(&self, offset: usize) -> Option<Location> {
        let mut before = 0;
        for (id, chunk) in self.chunks() {
            if offset < before + chunk.len() {
                return Some(Location::new(id, offset - before));
            }
            before += chunk.len();
        }
        (offset == before).then(|| self.end())
    }

    // -- Normalization ------------------------------------------------------

    /// Push `loc` left across chunk boundaries.
    ///
    /// While the chunk is empty or the offset is 0, and a previous chunk
    /// exists, move to the end of the previous chunk. Lands at the document
    /// start or just past the last byte of the nearest non-empty
    /// predecessor. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLocation`] for a stale location. `loc` is left
    /// unchanged on error.
    pub fn snap_left(&self, loc: &mut Location) -> Result<()> {
        let mut at = *loc;
        let mut chunk = self.resolve(at)?;
        while let Some(prev) = chunk.prev() {
            if !(chunk.is_empty() || at.offset == 0) {
                break;
            }
            chunk = self.chunks.get(prev)?;
            at = Location::new(prev, chunk.len());
        }
        *loc = at;
        Ok(())
    }

    /// Push `loc` right across chunk boundaries.
    ///
    /// While the chunk is empty or the offset equals its length, and a next
    /// chunk exists, move to offset 0 of the next chunk. Lands at the
    /// document end or on the first byte of the nearest non-empty successor.
    /// Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLocation`] for a stale location. `loc` is left
    /// unchanged on error.
    pub fn snap_right(&self, loc: &mut Location) -> Result<()> {
        let mut at = *loc;
        let mut chunk = self.resolve(at)?;
        while let Some(next) = chunk.next() {
            if !(chunk.is_empty() || at.offset == chunk.len()) {
                break;
            }
            chunk = self.chunks.get(next)?;
            at = Location::new(next, 0);
        }
        *loc = at;
        Ok(())
    }

    /// Step one byte left. A no-op at the document start.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLocation`] for a stale location.
    pub fn move_left(&self, loc: &mut Location) -> Result<()> {
        self.snap_left(loc)?;
        if loc.offset > 0 {
            loc.offset -= 1;
        }
        Ok(())
    }

    /// Step one byte right. A no-op at the document end.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLocation`] for a stale location.
    pub fn move_right(&self, loc: &mut Location) -> Result<()> {
        self.snap_right(loc)?;
        if loc.offset < self.resolve(*loc)?.len() {
            loc.offset += 1;
        }
        Ok(())
    }

    // -- Editing ------------------------------------------------------------

    /// Insert `byte` before the cursor and advance the cursor past it.
    ///
    /// The cursor is snapped left first. If its chunk is full, the bytes
    /// after the cursor move into a new chunk linked right after it; when the
    /// cursor sits at the very end of the full chunk, the new chunk starts
    /// empty and the cursor moves into it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] if the split chunk cannot be allocated,
    /// or [`Error::InvalidLocation`] for a stale cursor. Buffer and cursor
    /// are unchanged on error.
    pub fn insert_before_cursor(&mut self, loc: &mut Location, byte: u8) -> Result<()> {
        let mut at = *loc;
        self.snap_left(&mut at)?;
        if self.chunks.get(at.chunk)?.is_full() {
            at = self.split_full(at)?;
        }
        self.chunks.get_mut(at.chunk)?.insert_byte(at.offset, byte);
        at.offset += 1;
        *loc = at;
        Ok(())
    }

    /// Insert every byte of `bytes` before the cursor, in order, leaving the
    /// cursor after the last one.
    ///
    /// All or nothing: if any insert fails, the bytes already inserted are
    /// deleted again and the cursor is left where it was. A chunk split along
    /// the way may remain as extra chain structure until compaction.
    ///
    /// # Errors
    ///
    /// Same as [`insert_before_cursor`](Self::insert_before_cursor).
    pub fn insert_bytes_before_cursor(
        &mut self,
        loc: &mut Location,
        bytes: impl IntoIterator<Item = u8>,
    ) -> Result<()> {
        let mut at = *loc;
        let mut inserted = 0usize;
        for byte in bytes {
            if let Err(err) = self.insert_before_cursor(&mut at, byte) {
                for _ in 0..inserted {
                    self.delete_before_cursor(&mut at)?;
                }
                return Err(err);
            }
            inserted += 1;
        }
        *loc = at;
        Ok(())
    }

    /// Delete the byte before the cursor ("backspace").
    ///
    /// Returns the removed byte, or `None` at the document start.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLocation`] for a stale cursor.
    pub fn delete_before_cursor(&mut self, loc: &mut Location) -> Result<Option<u8>> {
        self.snap_left(loc)?;
        if loc.offset == 0 {
            return Ok(None);
        }
        let removed = self.chunks.get_mut(loc.chunk)?.remove_byte(loc.offset - 1);
        loc.offset -= 1;
        Ok(Some(removed))
    }

    /// Delete the byte after the cursor ("delete forward"). The cursor
    /// offset does not change.
    ///
    /// Returns the removed byte, or `None` at the document end.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLocation`] for a stale cursor.
    pub fn delete_after_cursor(&mut self, loc: &mut Location) -> Result<Option<u8>> {
        self.snap_right(loc)?;
        let chunk = self.chunks.get_mut(loc.chunk)?;
        if loc.offset == chunk.len() {
            return Ok(None);
        }
        Ok(Some(chunk.remove_byte(loc.offset)))
    }

    /// Split the full chunk under `at`, returning where the insert goes.
    fn split_full(&mut self, at: Location) -> Result<Location> {
        // Allocate everything up front; nothing below can fail.
        let mut fresh = Chunk::try_new(self.chunk_capacity)?;
        self.chunks.reserve()?;

        let current = self.chunks.get_mut(at.chunk)?;
        let next = current.next();
        let moves_tail = at.offset < current.len();
        if moves_tail {
            current.split_off_into(at.offset, &mut fresh);
        }
        fresh.set_prev(Some(at.chunk));
        fresh.set_next(next);
        let moved = fresh.len();

        let fresh_id = self.chunks.insert(fresh)?;
        self.chunks.get_mut(at.chunk)?.set_next(Some(fresh_id));
        match next {
            Some(next) => self.chunks.get_mut(next)?.set_prev(Some(fresh_id)),
            None => self.tail = fresh_id,
        }
        debug!(
            chunk = ?at.chunk,
            fresh = ?fresh_id,
            moved,
            "split full chunk"
        );

        Ok(if moves_tail {
            at
        } else {
            Location::new(fresh_id, 0)
        })
    }

    // -- Consistency --------------------------------------------------------

    /// Panic if the chain violates its structural invariants: exactly one
    /// head and one tail, symmetric links, `len <= capacity`, and every live
    /// chunk reachable from the head.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let mut prev = None;
        let mut count = 0;
        for (id, chunk) in self.chunks() {
            assert_eq!(chunk.prev(), prev, "broken back-link at {id:?}");
            assert!(chunk.len() <= chunk.capacity());
            prev = Some(id);
            count += 1;
        }
        assert_eq!(prev, Some(self.tail), "tail is not the last chunk");
        assert_eq!(count, self.chunk_count(), "unreachable chunks in arena");
        assert!(self.chunks.get(self.head).unwrap().prev().is_none());
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("bytes", &self.len())
            .field("chunks", &self.chunk_count())
            .field("chunk_capacity", &self.chunk_capacity)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Chunks iterator
// ---------------------------------------------------------------------------

/// Iterator over the chain, head → tail. Created by [`Buffer::chunks`].
pub struct Chunks<'a> {
    arena: &'a ChunkArena,
    next: Option<ChunkId>,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = (ChunkId, &'a Chunk);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let chunk = self.arena.get(id).ok()?;
        self.next = chunk.next();
        Some((id, chunk))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
