//! The slice of the host editor the panel depends on.

use the_crumbs_core::{
  BufferId,
  LineAccessor,
};

/// Name of the output panel, also used as the status annotation key.
pub const PANEL_NAME: &str = "breadcrumb_panel";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionRange {
  pub anchor: usize,
  pub head:   usize,
}

impl SelectionRange {
  pub fn new(anchor: usize, head: usize) -> Self {
    Self { anchor, head }
  }

  #[inline]
  pub fn point(head: usize) -> Self {
    Self::new(head, head)
  }

  /// Start of the range, regardless of direction.
  #[inline]
  pub fn from(&self) -> usize {
    self.anchor.min(self.head)
  }
}

/// Where an event was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
  /// A regular text view.
  Source,
  /// The breadcrumb panel itself.
  Panel,
  /// Any other widget (command palette, input fields, other panels).
  Widget,
}

/// A text buffer the breadcrumbs are computed for.
pub trait SourceBuffer: LineAccessor {
  fn id(&self) -> BufferId;

  fn selections(&self) -> &[SelectionRange];

  /// Bumped on every modification of the buffer.
  fn revision(&self) -> u64;

  /// 0-based row containing the char `offset`.
  fn row_of(&self, offset: usize) -> usize;

  fn tab_width(&self) -> u16;

  /// Per-view override of the `debug` setting.
  fn debug_override(&self) -> Option<bool> {
    None
  }
}

/// A host window owning the source views and the output panel.
pub trait Window: Send + 'static {
  type Buffer: SourceBuffer;

  /// The buffer of the active view in the active group, falling back to the
  /// first non-widget view. Never the panel itself.
  fn source_buffer(&self) -> Option<&Self::Buffer>;

  fn panel_visible(&self) -> bool;

  /// Create the panel if needed: no gutter, no line numbers, word wrap,
  /// read-only.
  fn create_panel(&mut self);

  fn show_panel(&mut self);

  fn hide_panel(&mut self);

  fn set_panel_read_only(&mut self, read_only: bool);

  /// Replace the entire panel content.
  fn replace_panel_text(&mut self, text: &str);

  /// Full text of the panel line holding the panel's caret.
  fn panel_caret_line(&self) -> Option<String>;

  fn set_status(&mut self, buffer: BufferId, key: &str, text: &str);

  /// Remove the `key` annotation from every view in the window.
  fn erase_status_everywhere(&mut self, key: &str);

  /// Transient message in the status bar.
  fn status_message(&mut self, text: &str);

  fn set_debug_override(&mut self, buffer: BufferId, debug: bool);

  /// Collapse the selection to the start of `row` and centre it.
  fn goto_line(&mut self, buffer: BufferId, row: usize);
}
