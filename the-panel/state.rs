use smallvec::SmallVec;
use the_crumbs_core::BufferId;

use crate::{
  gate::ContextCache,
  host::SourceBuffer,
};

/// Identifies what the panel currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderKey {
  pub buffer:     BufferId,
  pub row:        Option<usize>,
  pub revision:   u64,
  pub selections: SmallVec<[(usize, usize); 1]>,
}

impl RenderKey {
  pub fn of<B: SourceBuffer + ?Sized>(buffer: &B) -> Self {
    let selections: SmallVec<[(usize, usize); 1]> = buffer
      .selections()
      .iter()
      .map(|range| (range.anchor, range.head))
      .collect();
    let row = buffer
      .selections()
      .first()
      .map(|range| buffer.row_of(range.from()));
    Self {
      buffer: buffer.id(),
      row,
      revision: buffer.revision(),
      selections,
    }
  }
}

/// Per-window panel state. Created dormant, enabled while the panel is shown.
#[derive(Debug, Default)]
pub struct RenderState {
  pub enabled:       bool,
  pub last_rendered: Option<RenderKey>,
  pub contexts:      ContextCache,
}

impl RenderState {
  pub fn enable(&mut self) {
    self.enabled = true;
  }

  /// Back to the dormant state, forgetting everything rendered so far.
  pub fn reset(&mut self) {
    self.enabled = false;
    self.last_rendered = None;
    self.contexts.clear();
  }
}
