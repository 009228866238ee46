//! The breadcrumb panel controller.
//!
//! [`BreadcrumbPanel`] owns the host window adapter and all panel state. The
//! host forwards its events through [`BreadcrumbPanel::handle_event`] and its
//! commands through [`BreadcrumbPanel::run_command`]; everything else
//! (debouncing, skipping redundant work, repainting, navigation) happens
//! here.
//!
//! Lock order is always window, then state. Every host call the panel makes
//! while holding the window lock runs under a [`WriteGate`] guard, and event
//! handlers consult the gate before taking either lock, so events the host
//! raises from inside those calls are dropped instead of deadlocking.

use std::{
  str::FromStr,
  sync::Arc,
};

use parking_lot::{
  Mutex,
  RwLock,
};
use the_crumbs_core::{
  format::status_summary,
  format_breadcrumbs,
  navigation::target_row,
  parse_crumb_line,
  resolve,
};
use the_crumbs_event::{
  Token,
  UpdateScheduler,
};
use thiserror::Error;

use crate::{
  gate::{
    Context,
    should_skip,
  },
  host::{
    Origin,
    PANEL_NAME,
    SourceBuffer,
    Window,
  },
  settings::Settings,
  state::{
    RenderKey,
    RenderState,
  },
  surface::{
    WriteGate,
    WriteState,
    write_surface,
  },
};

/// Text command the host reports when the user clicks into a view.
pub const CLICK_COMMAND: &str = "drag_select";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
  Activated(Origin),
  SelectionModified(Origin),
  Modified(Origin),
  /// A text command is about to run in a view.
  TextCommand { origin: Origin, command: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
  TogglePanel,
  ToggleDebug,
}

impl Command {
  pub const fn name(self) -> &'static str {
    match self {
      Self::TogglePanel => "toggle_breadcrumb_panel",
      Self::ToggleDebug => "toggle_breadcrumb_panel_debug",
    }
  }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
  #[error("unknown command '{0}'")]
  Unknown(String),
}

impl FromStr for Command {
  type Err = CommandError;

  fn from_str(name: &str) -> Result<Self, Self::Err> {
    [Self::TogglePanel, Self::ToggleDebug]
      .into_iter()
      .find(|command| command.name() == name)
      .ok_or_else(|| CommandError::Unknown(name.to_string()))
  }
}

struct Shared<W> {
  window:    Mutex<W>,
  state:     Mutex<RenderState>,
  settings:  RwLock<Settings>,
  gate:      WriteGate,
  scheduler: UpdateScheduler,
}

/// Cheap to clone; clones drive the same panel.
pub struct BreadcrumbPanel<W: Window> {
  shared: Arc<Shared<W>>,
}

impl<W: Window> Clone for BreadcrumbPanel<W> {
  fn clone(&self) -> Self {
    Self {
      shared: self.shared.clone(),
    }
  }
}

impl<W: Window> BreadcrumbPanel<W> {
  /// Create a dormant panel. Must be called inside a tokio runtime, which
  /// runs the deferred updates.
  pub fn new(window: W, settings: Settings) -> Self {
    Self {
      shared: Arc::new(Shared {
        window:    Mutex::new(window),
        state:     Mutex::new(RenderState::default()),
        settings:  RwLock::new(settings),
        gate:      WriteGate::default(),
        scheduler: UpdateScheduler::new(),
      }),
    }
  }

  pub fn is_enabled(&self) -> bool {
    self.shared.state.lock().enabled
  }

  pub fn write_state(&self) -> WriteState {
    self.shared.gate.state()
  }

  /// Token of the most recently scheduled update.
  pub fn latest_update(&self) -> Option<Token> {
    self.shared.scheduler.latest()
  }

  pub fn settings(&self) -> Settings {
    *self.shared.settings.read()
  }

  pub fn set_settings(&self, settings: Settings) {
    *self.shared.settings.write() = settings;
  }

  /// Access the window adapter. Do not call back into the panel from `f`.
  pub fn with_window<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
    f(&mut self.shared.window.lock())
  }

  pub fn handle_event(&self, event: EditorEvent) {
    if !self.shared.gate.is_idle() {
      log::trace!("ignoring {event:?} raised during {:?}", self.shared.gate.state());
      return;
    }
    if !self.is_enabled() {
      return;
    }

    match event {
      EditorEvent::Activated(origin)
      | EditorEvent::SelectionModified(origin)
      | EditorEvent::Modified(origin) => {
        if origin == Origin::Source {
          self.schedule_update(false);
        }
      },
      EditorEvent::TextCommand { origin, command } => {
        if origin == Origin::Panel && command == CLICK_COMMAND {
          self.defer_navigation();
        }
      },
    }
  }

  pub fn run_command(&self, name: &str) -> Result<(), CommandError> {
    match name.parse()? {
      Command::TogglePanel => self.toggle_panel(),
      Command::ToggleDebug => self.toggle_debug(),
    }
    Ok(())
  }

  /// Show or hide the panel. Hiding makes the panel dormant and drops all
  /// cached state; showing paints it right away.
  pub fn toggle_panel(&self) {
    let mut window = self.shared.window.lock();
    if window.panel_visible() {
      self.shared.state.lock().reset();
      let _guard = self.shared.gate.begin();
      window.erase_status_everywhere(PANEL_NAME);
      window.hide_panel();
      log::info!("panel hidden, breadcrumbs dormant");
    } else {
      self.shared.state.lock().enable();
      {
        let _guard = self.shared.gate.begin();
        window.create_panel();
        window.show_panel();
      }
      drop(window);
      self.schedule_update(true);
    }
  }

  /// Flip the debug override of the current view and repaint.
  pub fn toggle_debug(&self) {
    let mut window = self.shared.window.lock();
    let Some(buffer) = window.source_buffer() else {
      return;
    };
    let id = buffer.id();
    let debug = !buffer.debug_override().unwrap_or(false);
    {
      let _guard = self.shared.gate.begin();
      window.set_debug_override(id, debug);
      window.status_message(&format!(
        "Breadcrumb Panel debug: {}",
        if debug { "ON" } else { "OFF" }
      ));
    }
    drop(window);
    self.schedule_update(true);
  }

  /// Schedule a repaint unless the caret context is unchanged. `force`
  /// bypasses that check.
  fn schedule_update(&self, force: bool) {
    let window = self.shared.window.lock();
    let mut state = self.shared.state.lock();
    if !state.enabled || !window.panel_visible() {
      return;
    }
    let Some(buffer) = window.source_buffer() else {
      return;
    };

    let candidate = Context::of(buffer);
    if !force && should_skip(state.contexts.get(candidate.buffer), &candidate) {
      log::trace!("context unchanged for {}", candidate.buffer);
      return;
    }
    if force {
      state.last_rendered = None;
    }

    let settings = self.settings().with_debug_override(buffer.debug_override());
    drop(state);
    drop(window);

    let panel = self.clone();
    let token = self
      .shared
      .scheduler
      .schedule(candidate.buffer, settings.update_delay(), move || panel.commit());
    if settings.debug {
      log::debug!("scheduled update {token} for {candidate:?}");
    }
  }

  /// Runs on the scheduler once an update survived its debounce.
  fn commit(&self) {
    let mut window = self.shared.window.lock();
    let mut state = self.shared.state.lock();
    if !state.enabled {
      return;
    }
    let Some(buffer) = window.source_buffer() else {
      return;
    };

    let context = Context::of(buffer);
    let key = RenderKey::of(buffer);
    if state.last_rendered.as_ref() == Some(&key) {
      state.contexts.record(context);
      return;
    }

    let settings = self.settings().with_debug_override(buffer.debug_override());
    let text = render(buffer, &settings);
    let id = buffer.id();

    {
      let _guard = self.shared.gate.begin();
      window.create_panel();
      write_surface(&mut *window, &self.shared.gate, &text);
      window.set_status(id, PANEL_NAME, &status_summary(&text, state.enabled));
    }

    state.last_rendered = Some(key);
    state.contexts.record(context);
    if settings.debug {
      log::debug!("panel updated for {id}: {text:?}");
    }
  }

  /// Clicks arrive before the host moved the panel caret, so read it later.
  fn defer_navigation(&self) {
    if tokio::runtime::Handle::try_current().is_err() {
      log::warn!("no runtime to defer panel navigation");
      return;
    }
    let panel = self.clone();
    tokio::spawn(async move { panel.navigate_from_panel() });
  }

  /// Move the source caret to the line named by the clicked panel row.
  /// Anything that is not a breadcrumb row is ignored.
  ///
  /// Selection events the host raises from inside `goto_line` are dropped;
  /// the panel schedules its own update once the caret has moved.
  pub fn navigate_from_panel(&self) {
    if !self.shared.gate.is_idle() || !self.is_enabled() {
      return;
    }
    {
      let mut window = self.shared.window.lock();
      let Some(line) = window
        .panel_caret_line()
        .and_then(|text| parse_crumb_line(&text))
      else {
        return;
      };
      let Some(id) = window.source_buffer().map(|buffer| buffer.id()) else {
        return;
      };
      let _guard = self.shared.gate.begin_navigation();
      window.goto_line(id, target_row(line));
    }
    self.schedule_update(false);
  }
}

fn render<B: SourceBuffer + ?Sized>(buffer: &B, settings: &Settings) -> String {
  let selections = buffer.selections();
  format_breadcrumbs(selections.len(), || {
    let row = buffer.row_of(selections[0].from());
    resolve(row, buffer, settings.resolve_options(buffer.tab_width()))
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn command_names_round_trip() {
    for command in [Command::TogglePanel, Command::ToggleDebug] {
      assert_eq!(command.name().parse::<Command>(), Ok(command));
    }
    assert_eq!(
      "toggle_everything".parse::<Command>(),
      Err(CommandError::Unknown("toggle_everything".into()))
    );
  }
}
