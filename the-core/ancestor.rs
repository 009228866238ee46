//! Resolution of the lines that opened the caret's indentation level.
//!
//! Walking upwards from the caret, every line with strictly less indentation
//! than the last accepted one is an ancestor. The walk never parses anything:
//! blank lines and lines made only of closing punctuation are skipped, and
//! the number of lines read is capped so huge files stay cheap.

use smallvec::SmallVec;

use crate::{
  chars::{
    is_blank,
    is_closer_only,
  },
  indent::{
    DEFAULT_TAB_WIDTH,
    indent_units,
  },
  lines::LineAccessor,
};

pub const DEFAULT_MAX_SCAN_LINES: usize = 5000;

/// One line of the source buffer as shown in the breadcrumbs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
  /// 1-based line number.
  pub number: usize,
  /// Line text with trailing whitespace removed.
  pub text:   String,
  pub indent: usize,
}

impl Line {
  pub fn new(number: usize, text: impl Into<String>, indent: usize) -> Self {
    Self {
      number,
      text: text.into(),
      indent,
    }
  }
}

/// Ancestors of a line, outermost first.
///
/// Indentation strictly increases from the first to the last entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AncestorChain {
  lines: SmallVec<[Line; 8]>,
}

impl AncestorChain {
  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  pub fn len(&self) -> usize {
    self.lines.len()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Line> {
    self.lines.iter()
  }

  /// The ancestor closest to the caret.
  pub fn nearest(&self) -> Option<&Line> {
    self.lines.last()
  }

  pub fn as_slice(&self) -> &[Line] {
    &self.lines
  }
}

impl<'a> IntoIterator for &'a AncestorChain {
  type Item = &'a Line;
  type IntoIter = std::slice::Iter<'a, Line>;

  fn into_iter(self) -> Self::IntoIter {
    self.lines.iter()
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
  pub tab_width:      u16,
  /// Upper bound on the number of lines read above the target line.
  pub max_scan_lines: usize,
  /// Trace every decision through `log::debug!`.
  pub debug:          bool,
}

impl Default for ResolveOptions {
  fn default() -> Self {
    Self {
      tab_width:      DEFAULT_TAB_WIDTH,
      max_scan_lines: DEFAULT_MAX_SCAN_LINES,
      debug:          false,
    }
  }
}

/// Resolve the ancestor chain of the 0-based `target_row`.
///
/// `target_row` is clamped into the buffer. A target without indentation has
/// no ancestors, and neither has an empty buffer.
///
/// Every line visited above the target consumes one unit of the scan budget,
/// blank lines included, so the walk never reads more than
/// `max_scan_lines` lines above the target (a budget of zero is raised to
/// one).
pub fn resolve<L>(target_row: usize, lines: &L, options: ResolveOptions) -> AncestorChain
where
  L: LineAccessor + ?Sized,
{
  let ResolveOptions {
    tab_width,
    max_scan_lines,
    debug,
  } = options;

  let len = lines.len_lines();
  if len == 0 {
    return AncestorChain::default();
  }
  let row = target_row.min(len - 1);

  let target = indent_units(&lines.line(row), tab_width);
  if debug {
    log::debug!("caret_row={} indent_units={}", row + 1, target);
  }
  if target == 0 {
    return AncestorChain::default();
  }

  let mut found = SmallVec::<[Line; 8]>::new();
  let mut threshold = target;
  let mut budget = max_scan_lines.max(1);

  for idx in (0..row).rev() {
    if threshold == 0 || budget == 0 {
      break;
    }
    budget -= 1;

    let text = lines.line(idx);
    if is_blank(&text) {
      continue;
    }

    let units = indent_units(&text, tab_width);
    if debug {
      log::debug!(
        "scan_up row={} units={} threshold={} text={:?}",
        idx + 1,
        units,
        threshold,
        text.trim_end()
      );
    }

    if units >= threshold || is_closer_only(&text) {
      continue;
    }

    found.push(Line::new(idx + 1, text.trim_end(), units));
    threshold = units;
  }

  found.reverse();
  if debug {
    log::debug!(
      "crumbs={:?}",
      found
        .iter()
        .map(|line| (line.number, line.indent))
        .collect::<Vec<_>>()
    );
  }
  AncestorChain { lines: found }
}
