// SPDX-License-Identifier: MIT
//
// Output formatting for the `scan` and `show` subcommands.

use std::io::{self, Write};

use linkpad_core::{Buffer, KeywordMatch, KeywordSet, Span};

/// Keyword color.
const KEYWORD_START: &[u8] = b"\x1b[34m";
const RESET: &[u8] = b"\x1b[0m";

/// One line per match: `start..end<TAB>keyword`.
pub fn write_matches(
    out: &mut impl Write,
    buffer: &Buffer,
    matches: &[KeywordMatch],
    keywords: &KeywordSet,
) -> anyhow::Result<()> {
    for m in matches {
        let start = buffer.offset_of(m.range.start)?;
        let end = buffer.offset_of(m.range.end)?;
        let word = keywords.get(m.keyword).unwrap_or_default();
        writeln!(out, "{start}..{end}\t{}", String::from_utf8_lossy(word))?;
    }
    Ok(())
}

/// The document bytes with keyword spans wrapped in color escapes.
pub fn write_highlighted(out: &mut impl Write, bytes: &[u8], spans: &[Span]) -> io::Result<()> {
    for span in spans {
        let text = &bytes[span.start..span.end];
        if span.keyword.is_some() {
            out.write_all(KEYWORD_START)?;
            out.write_all(text)?;
            out.write_all(RESET)?;
        } else {
            out.write_all(text)?;
        }
    }
    Ok(())
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use linkpad_core::{scan_document, spans};

    fn setup(text: &str, words: &[&str]) -> (Buffer, KeywordSet, Vec<KeywordMatch>) {
        let buf = Buffer::from_bytes(text.as_bytes(), 3).unwrap();
        let set = KeywordSet::new(words).unwrap();
        let found = scan_document(&buf, &set).unwrap();
        (buf, set, found)
    }

    #[test]
    fn match_lines() {
        let (buf, set, found) = setup("int x; return x;", &["return", "int"]);
        let mut out = Vec::new();
        write_matches(&mut out, &buf, &found, &set).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "0..3\tint\n7..13\treturn\n"
        );
    }

    #[test]
    fn highlighted_text_wraps_keywords() {
        let (buf, _, found) = setup("if x", &["if"]);
        let bytes = buf.to_bytes();
        let mut out = Vec::new();
        write_highlighted(&mut out, &bytes, &spans(&buf, &found).unwrap()).unwrap();
        assert_eq!(out, b"\x1b[34mif\x1b[0m x".to_vec());
    }

    #[test]
    fn plain_document_is_unchanged() {
        let (buf, _, found) = setup("xyz", &["if"]);
        let bytes = buf.to_bytes();
        let mut out = Vec::new();
        write_highlighted(&mut out, &bytes, &spans(&buf, &found).unwrap()).unwrap();
        assert_eq!(out, bytes);
    }
}
