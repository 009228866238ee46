//! Cheap check deciding whether the caret context changed at all.

use hashbrown::HashMap;
use the_crumbs_core::{
  BufferId,
  indent_units,
};

use crate::host::SourceBuffer;

/// Fingerprint of the caret's situation in a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Context {
  pub buffer:   BufferId,
  /// Row of the first selection, `None` without selections.
  pub row:      Option<usize>,
  pub indent:   usize,
  pub revision: u64,
}

impl Context {
  pub fn of<B: SourceBuffer + ?Sized>(buffer: &B) -> Self {
    let row = buffer
      .selections()
      .first()
      .map(|range| buffer.row_of(range.from()));
    let indent = row
      .filter(|&row| row < buffer.len_lines())
      .map_or(0, |row| indent_units(&buffer.line(row), buffer.tab_width()));
    Self {
      buffer: buffer.id(),
      row,
      indent,
      revision: buffer.revision(),
    }
  }
}

/// True iff `previous` exists and matches `candidate` in every field.
pub fn should_skip(previous: Option<&Context>, candidate: &Context) -> bool {
  previous.is_some_and(|previous| {
    previous.buffer == candidate.buffer
      && previous.row == candidate.row
      && previous.indent == candidate.indent
      && previous.revision == candidate.revision
  })
}

/// Last context that produced panel output, per buffer.
#[derive(Debug, Default)]
pub struct ContextCache {
  by_buffer: HashMap<BufferId, Context>,
}

impl ContextCache {
  pub fn get(&self, buffer: BufferId) -> Option<&Context> {
    self.by_buffer.get(&buffer)
  }

  pub fn record(&mut self, context: Context) {
    self.by_buffer.insert(context.buffer, context);
  }

  pub fn len(&self) -> usize {
    self.by_buffer.len()
  }

  pub fn is_empty(&self) -> bool {
    self.by_buffer.is_empty()
  }

  pub fn clear(&mut self) {
    self.by_buffer.clear();
  }
}
