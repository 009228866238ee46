//! Leading whitespace measured in indentation units.

/// Used whenever a buffer reports a tab width of zero.
pub const DEFAULT_TAB_WIDTH: u16 = 4;

#[inline]
fn effective_tab_width(tab_width: u16) -> usize {
  if tab_width == 0 {
    DEFAULT_TAB_WIDTH as usize
  } else {
    tab_width as usize
  }
}

/// Number of columns a tab occupies when it starts at `visual_x`.
#[inline]
pub fn tab_width_at(visual_x: usize, tab_width: u16) -> usize {
  let tab_width = effective_tab_width(tab_width);
  tab_width - (visual_x % tab_width)
}

/// Visual width of the leading run of spaces and tabs.
///
/// Tabs advance to the next tab stop. Any other character (including the end
/// of the line) terminates the run, so a blank line measures its whole
/// whitespace content.
pub fn indent_columns(line: &str, tab_width: u16) -> usize {
  let mut columns = 0;
  for ch in line.chars() {
    match ch {
      ' ' => columns += 1,
      '\t' => columns += tab_width_at(columns, tab_width),
      _ => break,
    }
  }
  columns
}

/// Indentation of `line` in whole units of `tab_width` columns (rounded down).
///
/// A `tab_width` of zero is treated as [`DEFAULT_TAB_WIDTH`].
#[inline]
pub fn indent_units(line: &str, tab_width: u16) -> usize {
  indent_columns(line, tab_width) / effective_tab_width(tab_width)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn spaces_are_counted_in_units() {
    assert_eq!(indent_units("def f():", 4), 0);
    assert_eq!(indent_units("    if x:", 4), 1);
    assert_eq!(indent_units("        return 1", 4), 2);
    assert_eq!(indent_units("  two", 2), 1);
  }

  #[test]
  fn partial_units_round_down() {
    assert_eq!(indent_units("   three", 4), 0);
    assert_eq!(indent_units("       seven", 4), 1);
  }

  #[test]
  fn tabs_advance_to_the_next_stop() {
    assert_eq!(indent_columns("\tx", 4), 4);
    assert_eq!(indent_columns("  \tx", 4), 4);
    assert_eq!(indent_columns("     \tx", 4), 8);
    assert_eq!(indent_units("\t\tx", 4), 2);
    assert_eq!(indent_units(" \t x", 8), 1);
  }

  #[test]
  fn blank_lines_measure_their_whitespace() {
    assert_eq!(indent_units("", 4), 0);
    assert_eq!(indent_units("        ", 4), 2);
    assert_eq!(indent_units("\t", 4), 1);
  }

  #[test]
  fn zero_tab_width_falls_back_to_default() {
    assert_eq!(indent_units("    x", 0), 1);
    assert_eq!(indent_units("\tx", 0), 1);
  }

  #[test]
  fn other_whitespace_stops_the_scan() {
    assert_eq!(indent_columns("\u{00A0}   x", 4), 0);
    assert_eq!(indent_columns("  \r\n", 4), 2);
  }

  quickcheck::quickcheck! {
      fn measuring_is_deterministic(line: String, tab_width: u16) -> bool {
          indent_units(&line, tab_width) == indent_units(&line, tab_width)
      }

      fn units_never_exceed_columns(line: String, tab_width: u16) -> bool {
          indent_units(&line, tab_width) <= indent_columns(&line, tab_width)
      }
  }
}
