use std::fmt::Write;

use crate::ancestor::AncestorChain;

/// Shown when there is not exactly one selection.
pub const MULTIPLE_CONTEXTS: &str = "Multiple contexts\n";
/// Shown when the caret line has no ancestors.
pub const NO_INDENT: &str = "No indent\n";

const SUMMARY_CHARS: usize = 60;

/// Render the panel text for the current selection state.
///
/// `resolve` is only invoked when there is exactly one selection. Each
/// ancestor becomes one `"{number:>6}:  {text}"` row, outermost first.
pub fn format_breadcrumbs<F>(selection_count: usize, resolve: F) -> String
where
  F: FnOnce() -> AncestorChain,
{
  if selection_count != 1 {
    return MULTIPLE_CONTEXTS.to_string();
  }

  let chain = resolve();
  if chain.is_empty() {
    return NO_INDENT.to_string();
  }

  let mut out = String::new();
  for line in &chain {
    // writing into a String cannot fail
    let _ = writeln!(out, "{:>6}:  {}", line.number, line.text);
  }
  out
}

/// Status bar annotation mirroring the panel content.
pub fn status_summary(text: &str, enabled: bool) -> String {
  let state = if enabled { "active" } else { "off" };
  let summary: String = text.trim().chars().take(SUMMARY_CHARS).collect();
  format!("Breadcrumbs: {state} - {summary}")
}
