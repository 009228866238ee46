use std::borrow::Cow;

use ropey::{
  Rope,
  RopeSlice,
};

use crate::line_ending::{
  line_without_line_ending,
  trim_line_ending,
};

/// Identity of a text buffer, stable for the buffer's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u64);

impl std::fmt::Display for BufferId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "buffer#{}", self.0)
  }
}

/// Random access to the lines of a buffer.
///
/// Implementations return line text without its terminator. Indices are
/// 0-based and callers keep them below [`LineAccessor::len_lines`].
pub trait LineAccessor {
  fn len_lines(&self) -> usize;

  fn line(&self, idx: usize) -> Cow<'_, str>;
}

impl<S: AsRef<str>> LineAccessor for [S] {
  fn len_lines(&self) -> usize {
    self.len()
  }

  fn line(&self, idx: usize) -> Cow<'_, str> {
    Cow::Borrowed(trim_line_ending(self[idx].as_ref()))
  }
}

impl<S: AsRef<str>> LineAccessor for Vec<S> {
  fn len_lines(&self) -> usize {
    self.as_slice().len_lines()
  }

  fn line(&self, idx: usize) -> Cow<'_, str> {
    self.as_slice().line(idx)
  }
}

impl LineAccessor for RopeSlice<'_> {
  fn len_lines(&self) -> usize {
    RopeSlice::len_lines(self)
  }

  fn line(&self, idx: usize) -> Cow<'_, str> {
    line_without_line_ending(*self, idx).into()
  }
}

impl LineAccessor for Rope {
  fn len_lines(&self) -> usize {
    Rope::len_lines(self)
  }

  fn line(&self, idx: usize) -> Cow<'_, str> {
    line_without_line_ending(self.slice(..), idx).into()
  }
}
