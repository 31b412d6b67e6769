// SPDX-License-Identifier: MIT
//
// Key scripts — a textual stand-in for live keyboard input.
//
//   <Left> <Right>  cursor movement
//   <BS> <Del>      delete before / after the cursor
//   <CR> <Tab>      newline / tab
//   <lt>            a literal '<'
//
// Any other byte inserts itself. Names are case-insensitive. A '<' that
// does not start a known name is inserted literally.

use crate::session::Event;

/// Parse a key script into events.
pub fn parse_keys(script: &str) -> Vec<Event> {
    let bytes = script.as_bytes();
    let mut events = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'<' {
            if let Some((event, used)) = parse_named(&bytes[i..]) {
                events.push(event);
                i += used;
                continue;
            }
        }
        events.push(Event::Insert(bytes[i]));
        i += 1;
    }
    events
}

/// Match `<Name>` at the start of `bytes`, returning the event and the
/// number of bytes consumed.
fn parse_named(bytes: &[u8]) -> Option<(Event, usize)> {
    let close = bytes.iter().position(|&b| b == b'>')?;
    let name = std::str::from_utf8(&bytes[1..close]).ok()?;
    let event = match name.to_ascii_lowercase().as_str() {
        "left" => Event::Left,
        "right" => Event::Right,
        "bs" => Event::Backspace,
        "del" => Event::Delete,
        "cr" | "enter" => Event::Newline,
        "tab" => Event::Tab,
        "lt" => Event::Insert(b'<'),
        _ => return None,
    };
    Some((event, close + 1))
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn plain_bytes_insert_themselves() {
        assert_eq!(
            parse_keys("ab"),
            vec![Event::Insert(b'a'), Event::Insert(b'b')]
        );
    }

    #[test]
    fn named_keys() {
        assert_eq!(
            parse_keys("<Left><right><BS><Del><CR><Tab>"),
            vec![
                Event::Left,
                Event::Right,
                Event::Backspace,
                Event::Delete,
                Event::Newline,
                Event::Tab,
            ]
        );
    }

    #[test]
    fn lt_escapes_angle_bracket() {
        assert_eq!(
            parse_keys("<lt>CR>"),
            vec![
                Event::Insert(b'<'),
                Event::Insert(b'C'),
                Event::Insert(b'R'),
                Event::Insert(b'>'),
            ]
        );
    }

    #[test]
    fn unknown_names_are_literal() {
        assert_eq!(
            parse_keys("a<b"),
            vec![Event::Insert(b'a'), Event::Insert(b'<'), Event::Insert(b'b')]
        );
        assert_eq!(parse_keys("<x>").len(), 3);
    }

    #[test]
    fn non_ascii_bytes_pass_through() {
        assert_eq!(
            parse_keys("é"),
            vec![Event::Insert(0xc3), Event::Insert(0xa9)]
        );
    }

    #[test]
    fn empty_script_is_empty() {
        assert!(parse_keys("").is_empty());
    }
}
