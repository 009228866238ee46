//! Indentation-driven breadcrumbs.
//!
//! Everything in this crate is synchronous and side-effect free: measuring
//! indentation, walking a buffer upwards to find the lines that opened the
//! current indentation level, rendering those lines as the panel text and
//! mapping a clicked panel line back to a buffer line.

pub mod ancestor;
pub mod chars;
pub mod format;
pub mod indent;
pub mod line_ending;
pub mod lines;
pub mod navigation;

pub use ancestor::{
  AncestorChain,
  Line,
  ResolveOptions,
  resolve,
};
pub use format::format_breadcrumbs;
pub use indent::indent_units;
pub use lines::{
  BufferId,
  LineAccessor,
};
pub use navigation::parse_crumb_line;
