//! Stripping line terminators from buffer lines.
//!
//! The recognised terminators are the ones ropey splits lines on, so a line
//! read from a `&str` slice and the same line read from a rope agree.

use ropey::RopeSlice;

#[inline]
pub const fn is_line_terminator(ch: char) -> bool {
  matches!(
    ch,
    '\n' | '\u{000B}' | '\u{000C}' | '\r' | '\u{0085}' | '\u{2028}' | '\u{2029}'
  )
}

/// Number of chars taken up by the terminator ending with `last`, given the
/// char before it. `\r\n` counts as one terminator.
#[inline]
fn terminator_chars(before_last: Option<char>, last: char) -> usize {
  match (before_last, last) {
    (Some('\r'), '\n') => 2,
    (_, last) if is_line_terminator(last) => 1,
    _ => 0,
  }
}

/// `line` without its trailing line ending.
pub fn trim_line_ending(line: &str) -> &str {
  let mut rev = line.char_indices().rev();
  let Some((last_at, last)) = rev.next() else {
    return line;
  };
  match terminator_chars(rev.next().map(|(_, ch)| ch), last) {
    2 => &line[..last_at - 1],
    1 => &line[..last_at],
    _ => line,
  }
}

/// Line `line_idx` of `slice`, sans any line ending.
pub fn line_without_line_ending(slice: RopeSlice<'_>, line_idx: usize) -> RopeSlice<'_> {
  let line = slice.line(line_idx);
  let len = line.len_chars();
  let trailing = match len {
    0 => 0,
    1 => terminator_chars(None, line.char(0)),
    _ => terminator_chars(Some(line.char(len - 2)), line.char(len - 1)),
  };
  line.slice(..len - trailing)
}
