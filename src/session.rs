// SPDX-License-Identifier: MIT
//
// Edit session — one buffer, one primary cursor, and the active options.
//
// Input events are applied one at a time; after each batch the chain is
// compacted with the primary cursor handed in for repair, so the cursor
// never outlives the chunk it points into.

use linkpad_core::{Buffer, Location, Options};

// ─── Events ─────────────────────────────────────────────────────────────────

/// One logical input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Insert a byte before the cursor.
    Insert(u8),
    /// Insert `\n`.
    Newline,
    /// Insert `tabstop` spaces, or `\t` with `noexpandtab`. All spaces
    /// land or none do.
    Tab,
    /// Delete the byte before the cursor.
    Backspace,
    /// Delete the byte after the cursor.
    Delete,
    Left,
    Right,
}

// ─── Session ────────────────────────────────────────────────────────────────

pub struct Session {
    buffer: Buffer,
    cursor: Location,
    options: Options,
}

impl Session {
    /// Start editing `buffer` with the cursor at the document start.
    pub fn new(buffer: Buffer, options: Options) -> Self {
        let cursor = buffer.start();
        Self {
            buffer,
            cursor,
            options,
        }
    }

    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub const fn cursor(&self) -> Location {
        self.cursor
    }

    /// Apply one event. Boundary moves and deletes at the document edges
    /// are no-ops.
    pub fn apply(&mut self, event: Event) -> linkpad_core::Result<()> {
        let buf = &mut self.buffer;
        let cur = &mut self.cursor;
        match event {
            Event::Insert(byte) => buf.insert_before_cursor(cur, byte)?,
            Event::Newline => buf.insert_before_cursor(cur, b'\n')?,
            Event::Tab if self.options.expandtab => buf.insert_bytes_before_cursor(
                cur,
                std::iter::repeat_n(b' ', self.options.tabstop),
            )?,
            Event::Tab => buf.insert_before_cursor(cur, b'\t')?,
            Event::Backspace => {
                buf.delete_before_cursor(cur)?;
            }
            Event::Delete => {
                buf.delete_after_cursor(cur)?;
            }
            Event::Left => buf.move_left(cur)?,
            Event::Right => buf.move_right(cur)?,
        }
        Ok(())
    }

    /// Apply a batch of events, then compact. Returns the number of chunks
    /// compaction removed.
    ///
    /// On error the events before the failing one stay applied and the
    /// chain is still compacted.
    pub fn apply_batch(&mut self, events: &[Event]) -> linkpad_core::Result<usize> {
        let result = events.iter().try_for_each(|&event| self.apply(event));
        let removed = self
            .buffer
            .compact(std::slice::from_mut(&mut self.cursor));
        result.map(|()| removed)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn session(text: &str, cap: usize) -> Session {
        let mut options = Options::default();
        options.chunk_capacity = cap;
        Session::new(Buffer::from_bytes(text.as_bytes(), cap).unwrap(), options)
    }

    fn text(s: &Session) -> String {
        String::from_utf8(s.buffer().to_bytes()).unwrap()
    }

    fn offset(s: &Session) -> usize {
        s.buffer().offset_of(s.cursor()).unwrap()
    }

    // ── Typing ────────────────────────────────────────────────────────────

    #[test]
    fn typing_into_empty_document() {
        let mut s = session("", 2);
        let events: Vec<Event> = b"hi".iter().map(|&b| Event::Insert(b)).collect();
        s.apply_batch(&events).unwrap();
        s.apply_batch(&[Event::Newline]).unwrap();
        assert_eq!(text(&s), "hi\n");
        assert_eq!(offset(&s), 3);
    }

    #[test]
    fn tab_expands_to_tabstop_spaces() {
        let mut s = session("x", 4);
        s.apply_batch(&[Event::Tab]).unwrap();
        assert_eq!(text(&s), "    x");
        assert_eq!(offset(&s), 4);
    }

    #[test]
    fn tab_is_literal_without_expandtab() {
        let mut s = session("x", 4);
        s.options.apply_all("noet").unwrap();
        s.apply_batch(&[Event::Tab]).unwrap();
        assert_eq!(text(&s), "\tx");
    }

    #[test]
    fn tab_spans_chunk_splits() {
        let mut s = session("ab", 1);
        s.apply_batch(&[Event::Right, Event::Tab]).unwrap();
        assert_eq!(text(&s), "a    b");
        assert_eq!(offset(&s), 5);
    }

    #[test]
    fn tab_width_follows_tabstop() {
        let mut s = session("", 64);
        s.options.apply_all("ts=2").unwrap();
        s.apply_batch(&[Event::Tab]).unwrap();
        assert_eq!(text(&s), "  ");
    }

    // ── Deleting ──────────────────────────────────────────────────────────

    #[test]
    fn backspace_and_delete_around_cursor() {
        let mut s = session("abcd", 1);
        s.apply_batch(&[Event::Right, Event::Right]).unwrap();
        s.apply_batch(&[Event::Backspace, Event::Delete]).unwrap();
        assert_eq!(text(&s), "ad");
        assert_eq!(offset(&s), 1);
        assert_eq!(s.buffer().chunk_count(), 2);
    }

    #[test]
    fn edges_are_noops() {
        let mut s = session("ab", 2);
        s.apply_batch(&[Event::Backspace, Event::Left]).unwrap();
        assert_eq!(text(&s), "ab");
        assert_eq!(offset(&s), 0);
        s.apply_batch(&[Event::Right, Event::Right, Event::Right, Event::Delete])
            .unwrap();
        assert_eq!(text(&s), "ab");
        assert_eq!(offset(&s), 2);
    }

    #[test]
    fn clearing_everything_leaves_one_chunk() {
        let mut s = session("hello world", 3);
        let mut events = vec![Event::Right; 11];
        events.extend(vec![Event::Backspace; 11]);
        s.apply_batch(&events).unwrap();
        assert_eq!(text(&s), "");
        assert_eq!(s.buffer().chunk_count(), 1);
        assert_eq!(s.cursor(), s.buffer().start());
    }

    #[test]
    fn cursor_survives_compaction() {
        let mut s = session("abcdef", 2);
        // Empty the middle chunk while parked in it.
        s.apply_batch(&[Event::Right, Event::Right, Event::Delete, Event::Delete])
            .unwrap();
        assert_eq!(text(&s), "abef");
        assert_eq!(offset(&s), 2);
        s.apply_batch(&[Event::Insert(b'Z')]).unwrap();
        assert_eq!(text(&s), "abZef");
        assert_eq!(offset(&s), 3);
    }
}
