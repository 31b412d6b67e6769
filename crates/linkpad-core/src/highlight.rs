//! Highlight spans — pair scanner matches with the document bytes.
//!
//! The render side wants flat byte ranges tagged "plain" or "keyword N",
//! covering the document with no gaps. [`spans`] produces them in one walk
//! over the chain, comparing the walking cursor against match boundaries
//! instead of resolving each match to an offset separately.

use crate::buffer::Buffer;
use crate::error::Result;
use crate::scan::KeywordMatch;

/// A run of bytes rendered the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Absolute byte offset of the first byte.
    pub start: usize,
    /// Absolute byte offset one past the last byte.
    pub end: usize,
    /// Keyword index for a matched run, `None` for plain text.
    pub keyword: Option<usize>,
}

impl Span {
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Split the document into plain and keyword spans.
///
/// `matches` must come from scanning this buffer, in document order, with
/// no edits in between. Every match becomes its own span, so two adjacent
/// occurrences of the same keyword stay distinct. Spans are non-empty,
/// ordered, and cover `0..buffer.len()` exactly.
///
/// # Errors
///
/// [`Error::InvalidLocation`](crate::Error::InvalidLocation) if the chain
/// is inconsistent with the buffer's own head.
pub fn spans(buffer: &Buffer, matches: &[KeywordMatch]) -> Result<Vec<Span>> {
    let mut out = Vec::new();
    let mut cur = buffer.start();
    buffer.snap_right(&mut cur)?;

    let mut offset = 0;
    let mut run_start = 0;
    // Index into `matches` of the run being built, `None` while plain.
    let mut run: Option<usize> = None;
    let mut active: Option<usize> = None;
    let mut pending = 0;

    loop {
        if let Some(a) = active {
            if matches[a].range.end == cur {
                active = None;
            }
        }
        if active.is_none() && pending < matches.len() && matches[pending].range.start == cur {
            active = Some(pending);
            pending += 1;
        }

        if buffer.is_at_end(cur)? {
            break;
        }

        if active != run {
            if offset > run_start {
                out.push(Span {
                    start: run_start,
                    end: offset,
                    keyword: run.map(|m| matches[m].keyword),
                });
            }
            run_start = offset;
            run = active;
        }

        buffer.move_right(&mut cur)?;
        buffer.snap_right(&mut cur)?;
        offset += 1;
    }

    if offset > run_start {
        out.push(Span {
            start: run_start,
            end: offset,
            keyword: run.map(|m| matches[m].keyword),
        });
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
