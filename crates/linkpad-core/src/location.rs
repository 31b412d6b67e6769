//! Location and range types.
//!
//! A [`Location`] is a `(chunk, offset)` pair with `0 <= offset <= len`.
//! Locations are **not** normalized by construction: an offset equal to the
//! chunk's length could mean "end of this chunk" or "start of the next one".
//! The snap operations on [`Buffer`](crate::Buffer) resolve that ambiguity
//! before anything reads or mutates through a location.
//!
//! Two locations compare equal only when they name the same chunk and the
//! same offset. Compare locations that were snapped in the same direction.

use std::fmt;

use crate::chunk::ChunkId;

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// A cursor position inside the chunk chain.
///
/// Cheap `Copy` value holding a non-owning chunk handle. It stays valid until
/// the chunk it names is removed by compaction; pass it to
/// [`Buffer::compact`](crate::Buffer::compact) to have it repaired.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub(crate) chunk: ChunkId,
    pub(crate) offset: usize,
}

impl Location {
    #[inline]
    #[must_use]
    pub(crate) const fn new(chunk: ChunkId, offset: usize) -> Self {
        Self { chunk, offset }
    }

    /// The chunk this location points into.
    #[inline]
    #[must_use]
    pub const fn chunk(self) -> ChunkId {
        self.chunk
    }

    /// Byte offset inside the chunk.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> usize {
        self.offset
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Loc({:?}+{})", self.chunk, self.offset)
    }
}

// ---------------------------------------------------------------------------
// TextRange
// ---------------------------------------------------------------------------

/// A half-open range `[start, end)` between two locations.
///
/// Used for the cursor-pair view and for scanner results. Scanner ranges
/// have both ends snapped right, so adjacent matches share a boundary
/// location exactly: one match's `end` equals the next match's `start`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRange {
    pub start: Location,
    pub end: Location,
}

impl TextRange {
    #[inline]
    #[must_use]
    pub const fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    /// True when both ends are the same location.
    ///
    /// Only exact for ranges whose ends were snapped the same way.
    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }
}

impl fmt::Debug for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Range({:?} .. {:?})", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Buffer;

    #[test]
    fn location_accessors() {
        let buf = Buffer::new().unwrap();
        let loc = buf.start();
        assert_eq!(loc.offset(), 0);
        assert_eq!(loc.chunk(), buf.head());
    }

    #[test]
    fn zero_width_range_is_empty() {
        let buf = Buffer::new().unwrap();
        let r = TextRange::new(buf.start(), buf.start());
        assert!(r.is_empty());
        assert_eq!(r.start, r.end);
    }

    #[test]
    fn range_with_distinct_ends_is_not_empty() {
        let buf = Buffer::from_bytes(b"abc", 8).unwrap();
        let r = TextRange::new(buf.start(), buf.end());
        assert!(!r.is_empty());
    }

    #[test]
    fn debug_format_names_chunk_and_offset() {
        let buf = Buffer::from_bytes(b"ab", 4).unwrap();
        let text = format!("{:?}", buf.end());
        assert!(text.starts_with("Loc(#"), "{text}");
        assert!(text.ends_with("+2)"), "{text}");
    }
}
