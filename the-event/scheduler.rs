//! Coalescing scheduler for breadcrumb updates.
//!
//! Every call to [`UpdateScheduler::schedule`] issues a fresh [`Token`] and
//! hands the update to a single background task. That task owns the one
//! pending update: a newer request replaces it and pushes the deadline back,
//! so a burst of requests commits at most once. Right before committing, the
//! token is compared with the latest issued one, which keeps a request that
//! lost the race from ever running.

use std::{
  fmt,
  sync::Arc,
  time::Duration,
};

use the_crumbs_core::BufferId;
use tokio::{
  sync::mpsc::Sender,
  time::Instant,
};

use crate::{
  debounce::{
    AsyncHook,
    send_blocking,
  },
  token::{
    Token,
    TokenSource,
  },
};

type Work = Box<dyn FnOnce() + Send + 'static>;

pub struct ScheduledUpdate {
  pub token:        Token,
  pub buffer:       BufferId,
  pub requested_at: Instant,
  delay:            Duration,
  work:             Work,
}

impl ScheduledUpdate {
  pub fn deadline(&self) -> Instant {
    self.requested_at + self.delay
  }
}

impl fmt::Debug for ScheduledUpdate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ScheduledUpdate")
      .field("token", &self.token)
      .field("buffer", &self.buffer)
      .field("requested_at", &self.requested_at)
      .field("delay", &self.delay)
      .finish_non_exhaustive()
  }
}

/// The task side of the scheduler.
struct Coalescer {
  tokens:  Arc<TokenSource>,
  pending: Option<ScheduledUpdate>,
}

impl AsyncHook for Coalescer {
  type Event = ScheduledUpdate;

  fn handle_event(&mut self, update: ScheduledUpdate, timeout: Option<Instant>) -> Option<Instant> {
    if let Some(pending) = &self.pending {
      // senders on other threads may deliver out of issue order
      if pending.token > update.token {
        log::debug!("dropping stale update {} behind {}", update.token, pending.token);
        return timeout;
      }
      log::trace!("update {} supersedes {}", update.token, pending.token);
    }
    let deadline = update.deadline();
    self.pending = Some(update);
    Some(deadline)
  }

  fn finish_debounce(&mut self) {
    let Some(update) = self.pending.take() else {
      return;
    };
    if !self.tokens.is_latest(update.token) {
      log::trace!("update {} lost the race, discarding", update.token);
      return;
    }
    log::trace!("committing update {} for {}", update.token, update.buffer);
    (update.work)();
  }
}

/// Cheap to clone; clones share the token source and the background task.
#[derive(Clone)]
pub struct UpdateScheduler {
  tokens: Arc<TokenSource>,
  tx:     Sender<ScheduledUpdate>,
}

impl UpdateScheduler {
  /// Must be called inside a tokio runtime for scheduled work to ever run.
  pub fn new() -> Self {
    let tokens = Arc::new(TokenSource::new());
    let tx = Coalescer {
      tokens:  tokens.clone(),
      pending: None,
    }
    .spawn();
    Self { tokens, tx }
  }

  /// Run `work` once `delay` has elapsed, unless another update is scheduled
  /// first. Never runs `work` on the caller's stack.
  pub fn schedule<F>(&self, buffer: BufferId, delay: Duration, work: F) -> Token
  where
    F: FnOnce() + Send + 'static,
  {
    let token = self.tokens.issue();
    let update = ScheduledUpdate {
      token,
      buffer,
      requested_at: Instant::now(),
      delay,
      work: Box::new(work),
    };
    if !send_blocking(&self.tx, update) {
      log::warn!("update {token} for {buffer} could not be scheduled");
    }
    token
  }

  pub fn latest(&self) -> Option<Token> {
    self.tokens.latest()
  }

  pub fn is_latest(&self, token: Token) -> bool {
    self.tokens.is_latest(token)
  }
}

impl Default for UpdateScheduler {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Debug for UpdateScheduler {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("UpdateScheduler")
      .field("latest", &self.tokens.latest())
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use parking_lot::Mutex;

  use super::*;

  const BUFFER: BufferId = BufferId(1);
  const DELAY: Duration = Duration::from_millis(32);

  fn recorder() -> (Arc<Mutex<Vec<u32>>>, impl Fn(u32) -> Work) {
    let ran = Arc::new(Mutex::new(Vec::new()));
    let sink = ran.clone();
    let make = move |n: u32| -> Work {
      let sink = sink.clone();
      Box::new(move || sink.lock().push(n))
    };
    (ran, make)
  }

  #[tokio::test(start_paused = true)]
  async fn only_the_last_of_a_burst_commits() {
    let scheduler = UpdateScheduler::new();
    let (ran, work) = recorder();

    let tokens: Vec<Token> = (1..=5)
      .map(|n| scheduler.schedule(BUFFER, DELAY, work(n)))
      .collect();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(*ran.lock(), vec![5]);
    assert_eq!(scheduler.latest(), tokens.last().copied());
    assert!(tokens.windows(2).all(|pair| pair[0] < pair[1]));
  }

  #[tokio::test(start_paused = true)]
  async fn separate_bursts_commit_separately() {
    let scheduler = UpdateScheduler::new();
    let (ran, work) = recorder();

    scheduler.schedule(BUFFER, DELAY, work(1));
    scheduler.schedule(BUFFER, DELAY, work(2));
    tokio::time::sleep(Duration::from_millis(50)).await;
    scheduler.schedule(BUFFER, DELAY, work(3));
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(*ran.lock(), vec![2, 3]);
  }

  #[tokio::test(start_paused = true)]
  async fn a_newer_request_pushes_the_deadline_back() {
    let scheduler = UpdateScheduler::new();
    let (ran, work) = recorder();

    scheduler.schedule(BUFFER, DELAY, work(1));
    tokio::time::sleep(Duration::from_millis(20)).await;
    scheduler.schedule(BUFFER, DELAY, work(2));
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(ran.lock().is_empty());

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(*ran.lock(), vec![2]);
  }

  #[tokio::test(start_paused = true)]
  async fn zero_delay_still_runs_later() {
    let scheduler = UpdateScheduler::new();
    let (ran, work) = recorder();

    scheduler.schedule(BUFFER, Duration::ZERO, work(1));
    assert!(ran.lock().is_empty());

    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(*ran.lock(), vec![1]);
  }

  #[test]
  fn stale_updates_never_replace_newer_ones() {
    let tokens = Arc::new(TokenSource::new());
    let mut hook = Coalescer {
      tokens:  tokens.clone(),
      pending: None,
    };
    let (ran, work) = recorder();
    let update = |n: u32| ScheduledUpdate {
      token:        tokens.issue(),
      buffer:       BUFFER,
      requested_at: Instant::now(),
      delay:        DELAY,
      work:         work(n),
    };

    let older = update(1);
    let newer = update(2);
    hook.handle_event(newer, None);
    hook.handle_event(older, None);
    hook.finish_debounce();

    assert_eq!(*ran.lock(), vec![2]);
  }

  #[test]
  fn superseded_pending_update_is_discarded() {
    let tokens = Arc::new(TokenSource::new());
    let mut hook = Coalescer {
      tokens:  tokens.clone(),
      pending: None,
    };
    let (ran, work) = recorder();

    hook.handle_event(
      ScheduledUpdate {
        token:        tokens.issue(),
        buffer:       BUFFER,
        requested_at: Instant::now(),
        delay:        DELAY,
        work:         work(1),
      },
      None,
    );
    // issued but not yet delivered
    tokens.issue();
    hook.finish_debounce();

    assert!(ran.lock().is_empty());
  }

  #[test]
  fn scheduling_without_a_runtime_is_inert() {
    let scheduler = UpdateScheduler::new();
    let (ran, work) = recorder();
    let first = scheduler.schedule(BUFFER, DELAY, work(1));
    let second = scheduler.schedule(BUFFER, DELAY, work(2));
    assert_eq!((first.get(), second.get()), (1, 2));
    assert!(ran.lock().is_empty());
  }

  #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
  async fn concurrent_schedulers_commit_the_highest_token() {
    let scheduler = UpdateScheduler::new();
    let committed = Arc::new(Mutex::new(Vec::new()));

    std::thread::scope(|scope| {
      for _ in 0..4 {
        let scheduler = scheduler.clone();
        let committed = committed.clone();
        scope.spawn(move || {
          for _ in 0..50 {
            let committed = committed.clone();
            let slot = Arc::new(Mutex::new(None));
            let own = slot.clone();
            let token = scheduler.schedule(BUFFER, Duration::from_millis(200), move || {
              if let Some(token) = *own.lock() {
                committed.lock().push(token);
              }
            });
            *slot.lock() = Some(token);
          }
        });
      }
    });
    tokio::time::sleep(Duration::from_secs(1)).await;

    let committed = committed.lock();
    assert_eq!(committed.len(), 1);
    assert_eq!(Some(committed[0]), scheduler.latest());
  }
}
