//! Multi-keyword occurrence scanner.
//!
//! One left-to-right pass over a `[start, end)` span of the buffer finds
//! non-overlapping occurrences of any keyword in a [`KeywordSet`].
//!
//! # Architecture
//!
//! Every keyword owns a run of slots in a single scratch buffer, one slot per
//! keyword byte. Slot `j` of a keyword holds the start location of a partial
//! match that has matched the keyword's first `j` bytes and ends at the
//! current scan position. For each scanned byte:
//!
//! 1. Slot 0 of every keyword is seeded with the current position.
//! 2. Slots are visited from the highest down to 0. An occupied slot whose
//!    keyword byte equals the scanned byte either completes the keyword (top
//!    slot) or shifts its start up one slot. The slot is then cleared.
//!    Walking downwards keeps a start that just moved from being advanced a
//!    second time on the same byte.
//! 3. If any keyword completed, the shortest one is reported and every slot
//!    is cleared, so no later match can begin inside the consumed bytes.
//!
//! Match ends are one byte past the completing byte, snapped right, which
//! makes back-to-back matches share their boundary location exactly.
//!
//! Scratch use is bounded: `total_len` slots plus one run offset per
//! keyword, allocated once per call and released on return.

use tracing::trace;

use crate::buffer::Buffer;
use crate::error::Result;
use crate::grow::GrowArray;
use crate::keywords::KeywordSet;
use crate::location::{Location, TextRange};

/// One reported occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordMatch {
    /// End-exclusive span of the occurrence, both ends snapped right.
    pub range: TextRange,
    /// Index of the matched keyword in its [`KeywordSet`].
    pub keyword: usize,
}

/// Per-call working set.
struct Scratch {
    /// Candidate start locations, one run per keyword.
    slots: Vec<Option<Location>>,
    /// First slot of each keyword's run.
    runs: Vec<usize>,
    /// Keywords completed on the current byte.
    completions: GrowArray<KeywordMatch>,
}

impl Scratch {
    fn for_keywords(keywords: &KeywordSet) -> Result<Self> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(keywords.total_len())?;
        slots.resize(keywords.total_len(), None);

        let mut runs = Vec::new();
        runs.try_reserve_exact(keywords.len())?;
        let mut next = 0;
        for word in keywords.iter() {
            runs.push(next);
            next += word.len();
        }

        Ok(Self {
            slots,
            runs,
            completions: GrowArray::with_capacity(keywords.len())?,
        })
    }

    fn clear(&mut self) {
        self.slots.fill(None);
    }
}

/// Scan the whole document.
///
/// # Errors
///
/// Only [`Error::OutOfMemory`](crate::Error::OutOfMemory).
pub fn scan_document(buffer: &Buffer, keywords: &KeywordSet) -> Result<Vec<KeywordMatch>> {
    scan(buffer, buffer.start(), None, keywords)
}

/// Scan from `start` up to `end` (the document end when `None`).
///
/// Both bounds are snapped right before scanning. Matches are returned in
/// document order and never overlap.
///
/// # Errors
///
/// - [`Error::InvalidLocation`](crate::Error::InvalidLocation) if either
///   bound names a removed chunk.
/// - [`Error::OutOfMemory`](crate::Error::OutOfMemory) if the scratch set or
///   the result list cannot grow.
pub fn scan(
    buffer: &Buffer,
    start: Location,
    end: Option<Location>,
    keywords: &KeywordSet,
) -> Result<Vec<KeywordMatch>> {
    let end = match end {
        Some(mut end) => {
            buffer.snap_right(&mut end)?;
            Some(end)
        }
        None => None,
    };
    let mut cur = start;
    buffer.snap_right(&mut cur)?;

    let mut scratch = Scratch::for_keywords(keywords)?;
    let mut found = GrowArray::new();
    let mut scanned = 0usize;

    while Some(cur) != end {
        let Some(ch) = buffer.byte_at(cur)? else {
            break;
        };
        scanned += 1;

        let mut after = cur;
        buffer.move_right(&mut after)?;
        buffer.snap_right(&mut after)?;

        scratch.completions.clear();
        for (keyword, word) in keywords.iter().enumerate() {
            let run = &mut scratch.slots[scratch.runs[keyword]..][..word.len()];
            run[0] = Some(cur);
            let top = word.len() - 1;
            for j in (0..=top).rev() {
                let Some(begin) = run[j].take() else {
                    continue;
                };
                if word[j] != ch {
                    continue;
                }
                if j == top {
                    scratch.completions.push(KeywordMatch {
                        range: TextRange::new(begin, after),
                        keyword,
                    })?;
                } else {
                    run[j + 1] = Some(begin);
                }
            }
        }

        // Shortest wins; among equal lengths the lower index wins.
        let best = scratch
            .completions
            .iter()
            .min_by_key(|m| keywords.get(m.keyword).map_or(usize::MAX, <[u8]>::len))
            .copied();
        if let Some(best) = best {
            found.push(best)?;
            scratch.clear();
        }

        cur = after;
    }

    trace!(
        scanned,
        matches = found.len(),
        keywords = keywords.len(),
        "keyword scan"
    );
    Ok(found.into_vec())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::Error;

    /// Matches as `(start, end, keyword)` byte offsets.
    fn offsets(buf: &Buffer, found: &[KeywordMatch]) -> Vec<(usize, usize, usize)> {
        found
            .iter()
            .map(|m| {
                (
                    buf.offset_of(m.range.start).unwrap(),
                    buf.offset_of(m.range.end).unwrap(),
                    m.keyword,
                )
            })
            .collect()
    }

    fn scan_text(text: &str, words: &[&str], cap: usize) -> Vec<(usize, usize, usize)> {
        let buf = Buffer::from_bytes(text.as_bytes(), cap).unwrap();
        let set = KeywordSet::new(words).unwrap();
        let found = scan_document(&buf, &set).unwrap();
        offsets(&buf, &found)
    }

    const CAPACITIES: [usize; 5] = [1, 2, 3, 7, 64];

    /// Deterministic xorshift so property runs are reproducible.
    struct Rng(u64);

    impl Rng {
        fn next(&mut self) -> u64 {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 7;
            self.0 ^= self.0 << 17;
            self.0
        }

        fn below(&mut self, n: usize) -> usize {
            (self.next() % n as u64) as usize
        }
    }

    /// Same policy on a flat byte slice: at each byte, among keywords ending
    /// here whose start is not inside an earlier match, the shortest wins.
    fn reference(text: &[u8], words: &[&[u8]]) -> Vec<(usize, usize, usize)> {
        let mut out = Vec::new();
        let mut floor = 0;
        for i in 0..text.len() {
            let best = words
                .iter()
                .enumerate()
                .filter(|(_, w)| {
                    w.len() <= i + 1 && i + 1 - w.len() >= floor && text[i + 1 - w.len()..=i] == ***w
                })
                .min_by_key(|(_, w)| w.len());
            if let Some((k, w)) = best {
                out.push((i + 1 - w.len(), i + 1, k));
                floor = i + 1;
            }
        }
        out
    }

    // -- Basic matching ---------------------------------------------------

    #[test]
    fn finds_single_keyword() {
        for cap in CAPACITIES {
            assert_eq!(scan_text("int x;", &["int"], cap), vec![(0, 3, 0)]);
        }
    }

    #[test]
    fn reports_keyword_index() {
        assert_eq!(
            scan_text("if x else y", &["else", "if"], 4),
            vec![(0, 2, 1), (5, 9, 0)]
        );
    }

    #[test]
    fn matches_inside_words() {
        assert_eq!(scan_text("diff", &["if"], 2), vec![(1, 3, 0)]);
    }

    #[test]
    fn longer_keyword_completes_when_prefix_diverges() {
        for cap in CAPACITIES {
            assert_eq!(
                scan_text("interface", &["if", "interface"], cap),
                vec![(0, 9, 1)]
            );
        }
    }

    #[test]
    fn back_to_back_matches_share_a_boundary() {
        for cap in CAPACITIES {
            let buf = Buffer::from_bytes(b"dodo", cap).unwrap();
            let set = KeywordSet::new(["do"]).unwrap();
            let found = scan_document(&buf, &set).unwrap();
            assert_eq!(found.len(), 2);
            assert_eq!(found[0].range.end, found[1].range.start, "capacity {cap}");
        }
    }

    #[test]
    fn overlapping_occurrences_do_not_double_count() {
        assert_eq!(scan_text("aaa", &["aa"], 2), vec![(0, 2, 0)]);
        assert_eq!(scan_text("aaaa", &["aa"], 3), vec![(0, 2, 0), (2, 4, 0)]);
    }

    // -- Tie-break --------------------------------------------------------

    #[test]
    fn shorter_keyword_ends_longer_partial() {
        for cap in CAPACITIES {
            assert_eq!(scan_text("double", &["do", "double"], cap), vec![(0, 2, 0)]);
        }
    }

    #[test]
    fn shortest_wins_when_both_complete_on_same_byte() {
        assert_eq!(scan_text("format", &["format", "at"], 3), vec![(4, 6, 1)]);
    }

    // -- Bounds -----------------------------------------------------------

    #[test]
    fn empty_document_has_no_matches() {
        let buf = Buffer::new().unwrap();
        let set = KeywordSet::c_language().unwrap();
        assert!(scan_document(&buf, &set).unwrap().is_empty());
    }

    #[test]
    fn bounded_scan_stops_at_end_location() {
        for cap in CAPACITIES {
            let buf = Buffer::from_bytes(b"for for for", cap).unwrap();
            let set = KeywordSet::new(["for"]).unwrap();
            let start = buf.location_at(2).unwrap();
            let end = buf.location_at(9).unwrap();
            let found = scan(&buf, start, Some(end), &set).unwrap();
            assert_eq!(offsets(&buf, &found), vec![(4, 7, 0)], "capacity {cap}");
        }
    }

    #[test]
    fn left_snapped_bounds_are_normalized() {
        let buf = Buffer::from_bytes(b"abdo", 2).unwrap();
        let set = KeywordSet::new(["do"]).unwrap();
        let mut start = buf.location_at(2).unwrap();
        buf.snap_left(&mut start).unwrap();
        let found = scan(&buf, start, None, &set).unwrap();
        assert_eq!(offsets(&buf, &found), vec![(2, 4, 0)]);
    }

    #[test]
    fn stale_start_is_rejected() {
        let mut buf = Buffer::from_bytes(b"abc", 1).unwrap();
        let mut cur = buf.location_at(1).unwrap();
        let stale = cur;
        buf.delete_after_cursor(&mut cur).unwrap();
        buf.compact(&mut [cur]);
        let set = KeywordSet::new(["a"]).unwrap();
        assert!(matches!(
            scan(&buf, stale, None, &set),
            Err(Error::InvalidLocation)
        ));
    }

    #[test]
    fn empty_chunks_are_transparent() {
        let mut buf = Buffer::from_bytes(b"ifif", 2).unwrap();
        let mut cur = buf.location_at(2).unwrap();
        buf.insert_before_cursor(&mut cur, b'X').unwrap();
        buf.delete_before_cursor(&mut cur).unwrap();
        let set = KeywordSet::new(["fi"]).unwrap();
        let found = scan_document(&buf, &set).unwrap();
        assert_eq!(offsets(&buf, &found), vec![(1, 3, 0)]);
    }

    // -- Properties -------------------------------------------------------

    #[test]
    fn agrees_with_flat_reference() {
        let words: [&[u8]; 5] = [b"ab", b"ba", b"aab", b"b", b"abc"];
        let set = KeywordSet::new(words).unwrap();
        let mut rng = Rng(0x2545_f491_4f6c_dd1d);

        for round in 0..200 {
            let len = rng.below(40);
            let text: Vec<u8> = (0..len).map(|_| b"abcd"[rng.below(4)]).collect();
            let cap = CAPACITIES[round % CAPACITIES.len()];
            let buf = Buffer::from_bytes(&text, cap).unwrap();

            let found = scan_document(&buf, &set).unwrap();
            assert_eq!(
                offsets(&buf, &found),
                reference(&text, &words),
                "text {:?} capacity {cap}",
                String::from_utf8_lossy(&text)
            );
        }
    }

    #[test]
    fn matches_never_overlap_and_spell_their_keyword() {
        let set = KeywordSet::c_language().unwrap();
        let mut rng = Rng(0x9e37_79b9_7f4a_7c15);
        let pieces: [&[u8]; 8] = [b"if", b"int", b"do", b"double", b"for", b" ", b"x", b"e"];

        for round in 0..100 {
            let mut text = Vec::new();
            for _ in 0..rng.below(30) {
                text.extend_from_slice(pieces[rng.below(pieces.len())]);
            }
            let cap = CAPACITIES[round % CAPACITIES.len()];
            let buf = Buffer::from_bytes(&text, cap).unwrap();

            let spans = offsets(&buf, &scan_document(&buf, &set).unwrap());
            for pair in spans.windows(2) {
                assert!(pair[0].1 <= pair[1].0, "{spans:?}");
            }
            for &(s, e, k) in &spans {
                assert_eq!(&text[s..e], set.get(k).unwrap());
            }
        }
    }
}
