use std::{
  fmt,
  num::NonZeroU64,
  sync::atomic::{
    AtomicU64,
    Ordering,
  },
};

/// Identifies one scheduling request. Later requests carry larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(NonZeroU64);

impl Token {
  pub const fn get(self) -> u64 {
    self.0.get()
  }
}

impl fmt::Display for Token {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

/// Issues strictly increasing tokens, starting at 1, and remembers the most
/// recent one. Safe to share between threads.
#[derive(Debug, Default)]
pub struct TokenSource {
  latest: AtomicU64,
}

impl TokenSource {
  pub fn new() -> Self {
    Self::default()
  }

  /// Issue a new token and record it as the latest.
  pub fn issue(&self) -> Token {
    let value = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
    // the counter starts at zero and only grows
    Token(NonZeroU64::new(value).unwrap_or(NonZeroU64::MAX))
  }

  pub fn latest(&self) -> Option<Token> {
    NonZeroU64::new(self.latest.load(Ordering::Acquire)).map(Token)
  }

  /// Whether no newer token has been issued since `token`.
  pub fn is_latest(&self, token: Token) -> bool {
    self.latest.load(Ordering::Acquire) == token.get()
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;

  #[test]
  fn tokens_start_at_one_and_increase() {
    let source = TokenSource::new();
    assert_eq!(source.latest(), None);

    let first = source.issue();
    let second = source.issue();
    assert_eq!(first.get(), 1);
    assert_eq!(second.get(), 2);
    assert!(first < second);
    assert_eq!(source.latest(), Some(second));
  }

  #[test]
  fn only_the_newest_token_is_latest() {
    let source = TokenSource::new();
    let old = source.issue();
    assert!(source.is_latest(old));
    let new = source.issue();
    assert!(!source.is_latest(old));
    assert!(source.is_latest(new));
  }

  #[test]
  fn concurrent_issue_never_repeats() {
    let source = TokenSource::new();
    let issued: Vec<Token> = std::thread::scope(|scope| {
      let handles: Vec<_> = (0..8)
        .map(|_| scope.spawn(|| (0..1000).map(|_| source.issue()).collect::<Vec<_>>()))
        .collect();
      handles
        .into_iter()
        .flat_map(|handle| handle.join().unwrap())
        .collect()
    });
    let unique: HashSet<_> = issued.iter().copied().collect();
    assert_eq!(unique.len(), 8000);
    assert_eq!(source.latest().map(Token::get), Some(8000));
  }
}
