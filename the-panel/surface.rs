//! Programmatic writes to the panel and the state machine that lets event
//! handlers recognise the events those writes trigger.

use std::sync::atomic::{
  AtomicU8,
  Ordering,
};

use crate::host::Window;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WriteState {
  Idle = 0,
  /// The panel content is being replaced; events raised now are echoes of
  /// that write, not user input.
  ProgrammaticWrite = 1,
  /// The source caret is being moved for a click on the panel.
  Navigating = 2,
}

impl WriteState {
  const fn from_u8(value: u8) -> Self {
    match value {
      1 => Self::ProgrammaticWrite,
      2 => Self::Navigating,
      _ => Self::Idle,
    }
  }
}

/// Readable without taking any lock, so handlers invoked from inside a host
/// call made by the panel can bail out before touching the window.
#[derive(Debug, Default)]
pub struct WriteGate {
  state: AtomicU8,
}

impl WriteGate {
  pub fn state(&self) -> WriteState {
    WriteState::from_u8(self.state.load(Ordering::Acquire))
  }

  pub fn is_writing(&self) -> bool {
    self.state() == WriteState::ProgrammaticWrite
  }

  /// False while the panel itself is driving the host.
  pub fn is_idle(&self) -> bool {
    self.state() == WriteState::Idle
  }

  /// Enter [`WriteState::ProgrammaticWrite`] until the guard is dropped.
  pub fn begin(&self) -> WriteGuard<'_> {
    self.enter(WriteState::ProgrammaticWrite)
  }

  /// Enter [`WriteState::Navigating`] until the guard is dropped.
  pub fn begin_navigation(&self) -> WriteGuard<'_> {
    self.enter(WriteState::Navigating)
  }

  fn enter(&self, state: WriteState) -> WriteGuard<'_> {
    let previous = self.state.swap(state as u8, Ordering::AcqRel);
    WriteGuard {
      gate:     self,
      previous: WriteState::from_u8(previous),
    }
  }
}

#[must_use = "the write state ends when the guard is dropped"]
pub struct WriteGuard<'a> {
  gate:     &'a WriteGate,
  previous: WriteState,
}

impl Drop for WriteGuard<'_> {
  fn drop(&mut self) {
    self
      .gate
      .state
      .store(self.previous as u8, Ordering::Release);
  }
}

/// Replace the panel text. The panel is read-only again afterwards, even if
/// the host panics halfway through.
pub fn write_surface<W: Window + ?Sized>(window: &mut W, gate: &WriteGate, text: &str) {
  struct Relock<'w, W: Window + ?Sized>(&'w mut W);

  impl<W: Window + ?Sized> Drop for Relock<'_, W> {
    fn drop(&mut self) {
      self.0.set_panel_read_only(true);
    }
  }

  let _guard = gate.begin();
  let mut relock = Relock(window);
  relock.0.set_panel_read_only(false);
  relock.0.replace_panel_text(text);
}
