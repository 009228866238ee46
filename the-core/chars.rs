/// Characters that close or continue a construct without naming it.
pub const CLOSER_CHARS: &[char] = &[')', ']', '}', ',', ':'];

#[inline]
pub fn char_is_closer(ch: char) -> bool {
  CLOSER_CHARS.contains(&ch)
}

#[inline]
pub fn is_blank(text: &str) -> bool {
  text.trim().is_empty()
}

/// Whether the trimmed `text` consists solely of closer characters, as in
/// `"):"`, `"],"` or `"}"`. Such lines make poor breadcrumb labels.
///
/// Blank text is not closer-only.
pub fn is_closer_only(text: &str) -> bool {
  let trimmed = text.trim();
  !trimmed.is_empty() && trimmed.chars().all(char_is_closer)
}
