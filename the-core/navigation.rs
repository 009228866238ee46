/// Line number referenced by a rendered breadcrumb row.
///
/// Expects the `"{number}:  {text}"` shape produced by
/// [`format_breadcrumbs`](crate::format::format_breadcrumbs). Anything else,
/// including the placeholder messages, yields `None`.
///
/// A negative prefix such as `"-4:"` is not a row we render, so it yields
/// `None` instead of being clamped to the first line.
pub fn parse_crumb_line(text: &str) -> Option<usize> {
  let text = text.trim();
  let (prefix, _) = text.split_once(':')?;
  prefix.trim().parse().ok()
}

/// 0-based row to place the caret on for a 1-based line number.
#[inline]
pub fn target_row(line_number: usize) -> usize {
  line_number.saturating_sub(1)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_rendered_rows() {
    assert_eq!(parse_crumb_line("12:  def foo():"), Some(12));
    assert_eq!(parse_crumb_line("     1:  def f():"), Some(1));
    assert_eq!(parse_crumb_line("  3:  a: b: c"), Some(3));
  }

  #[test]
  fn ignores_everything_else() {
    assert_eq!(parse_crumb_line("not a crumb line"), None);
    assert_eq!(parse_crumb_line(""), None);
    assert_eq!(parse_crumb_line("abc:  text"), None);
    assert_eq!(parse_crumb_line("No indent"), None);
    assert_eq!(parse_crumb_line("Multiple contexts"), None);
    assert_eq!(parse_crumb_line(":  text"), None);
    assert_eq!(parse_crumb_line("-4:  text"), None);
  }

  #[test]
  fn rows_are_zero_based() {
    assert_eq!(target_row(12), 11);
    assert_eq!(target_row(0), 0);
  }
}
