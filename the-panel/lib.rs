//! Breadcrumb panel controller.
//!
//! Glues the pure resolution code from `the-crumbs-core` and the coalescing
//! scheduler from `the-crumbs-event` to a host editor, which is only reached
//! through the traits in [`host`].

pub mod gate;
pub mod host;
pub mod panel;
pub mod settings;
pub mod state;
pub mod surface;

pub use gate::{
  Context,
  ContextCache,
  should_skip,
};
pub use host::{
  Origin,
  SelectionRange,
  SourceBuffer,
  Window,
};
pub use panel::{
  BreadcrumbPanel,
  Command,
  CommandError,
  EditorEvent,
};
pub use settings::{
  Settings,
  SettingsError,
};
pub use state::{
  RenderKey,
  RenderState,
};
pub use surface::{
  WriteGate,
  WriteState,
};
