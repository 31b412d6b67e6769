//! Chunk compaction — drop emptied chunks and repair cursors.
//!
//! Edits leave empty chunks behind on purpose (a cursor may still be parked
//! in one). Once a batch of edits is done, the host runs [`Buffer::compact`]
//! with every cursor it intends to keep using. A single forward pass unlinks
//! each empty chunk and re-points the cursors that referenced it:
//!
//! | Removed chunk      | Cursors move to                      |
//! |--------------------|--------------------------------------|
//! | head               | new head, offset 0                   |
//! | interior or tail   | previous chunk, at its end offset    |
//!
//! An empty chunk that is the only chunk in the chain stays. Cursors not
//! handed to `compact` that pointed into a removed chunk go stale and are
//! reported as [`Error::InvalidLocation`](crate::Error::InvalidLocation) by
//! every later operation.

use tracing::debug;

use crate::buffer::Buffer;
use crate::chunk::ChunkId;
use crate::location::Location;

impl Buffer {
    /// Remove every empty chunk except a sole remaining one, repairing the
    /// given cursors. Returns the number of chunks removed.
    ///
    /// Afterwards no chunk is empty unless it is the only chunk, and every
    /// cursor in `cursors` denotes an in-bounds location.
    pub fn compact(&mut self, cursors: &mut [Location]) -> usize {
        let mut removed = 0;
        let mut node = Some(self.head);

        while let Some(id) = node {
            let Ok(chunk) = self.chunks.get(id) else {
                break;
            };
            let (prev, next) = (chunk.prev(), chunk.next());
            if !chunk.is_empty() {
                node = next;
                continue;
            }

            match (prev, next) {
                // Sole chunk: the document is legitimately empty.
                (None, None) => break,
                (None, Some(new_head)) => {
                    if let Ok(chunk) = self.chunks.get_mut(new_head) {
                        chunk.set_prev(None);
                    }
                    self.head = new_head;
                    relink(cursors, id, Location::new(new_head, 0));
                }
                (Some(prev), next) => {
                    let mut prev_len = 0;
                    if let Ok(chunk) = self.chunks.get_mut(prev) {
                        chunk.set_next(next);
                        prev_len = chunk.len();
                    }
                    match next {
                        Some(next) => {
                            if let Ok(chunk) = self.chunks.get_mut(next) {
                                chunk.set_prev(Some(prev));
                            }
                        }
                        None => self.tail = prev,
                    }
                    relink(cursors, id, Location::new(prev, prev_len));
                }
            }

            self.chunks.remove(id);
            removed += 1;
            node = next;
        }

        if removed > 0 {
            debug!(removed, chunks = self.chunk_count(), "compacted chunk chain");
        }
        removed
    }
}

/// Point every cursor inside `gone` at `to`.
fn relink(cursors: &mut [Location], gone: ChunkId, to: Location) {
    for cursor in cursors.iter_mut().filter(|c| c.chunk == gone) {
        *cursor = to;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
