//! Debounced event actor running on the tokio runtime.

use std::time::Duration;

use futures_executor::block_on;
use tokio::{
  sync::mpsc::{
    self,
    Sender,
    error::TrySendError,
  },
  time::Instant,
};

/// Maximum time to block when sending to a full channel.
/// Dropping an update is better than stalling the caller's event loop.
const SEND_TIMEOUT_MS: u64 = 2;

const CHANNEL_CAPACITY: usize = 256;

/// A background task that receives events through a channel and decides,
/// for each one, whether to act now or (re)arm a debounce deadline.
///
/// The hook owns whatever state it needs to coalesce events; only the task
/// running the hook ever touches it.
pub trait AsyncHook: Send + 'static + Sized {
  type Event: Send + 'static;

  /// Called immediately whenever an event is received. Returns the deadline
  /// at which [`AsyncHook::finish_debounce`] should run, either a new one or
  /// the current `timeout`, or `None` to disarm.
  fn handle_event(&mut self, event: Self::Event, timeout: Option<Instant>) -> Option<Instant>;

  /// Called whenever the debounce deadline is reached.
  fn finish_debounce(&mut self);

  fn spawn(self) -> mpsc::Sender<Self::Event> {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    // only spawn the worker inside a runtime; without one the receiver is
    // dropped and every send reports a closed channel
    if tokio::runtime::Handle::try_current().is_ok() {
      tokio::spawn(run(self, rx));
    }
    tx
  }
}

/// Drives `hook` until every sender is gone. A pending debounce is dropped
/// with the channel.
async fn run<Hook: AsyncHook>(mut hook: Hook, mut rx: mpsc::Receiver<Hook::Event>) {
  let mut deadline = None;
  loop {
    let received = match deadline {
      Some(at) => match tokio::time::timeout_at(at, rx.recv()).await {
        Ok(received) => received,
        Err(_elapsed) => {
          deadline = None;
          hook.finish_debounce();
          continue;
        },
      },
      None => rx.recv().await,
    };
    match received {
      Some(event) => deadline = hook.handle_event(event, deadline),
      None => break,
    }
  }
}

/// Send an event to a channel from synchronous code, blocking only briefly
/// if the channel is full. Returns whether the event was delivered.
pub fn send_blocking<T>(tx: &Sender<T>, data: T) -> bool {
  match tx.try_send(data) {
    Ok(()) => true,
    Err(TrySendError::Full(data)) => {
      // the send timeout needs a timer
      if tokio::runtime::Handle::try_current().is_err() {
        log::warn!("dropping event: channel full outside a runtime");
        return false;
      }
      let sent = block_on(tx.send_timeout(data, Duration::from_millis(SEND_TIMEOUT_MS))).is_ok();
      if !sent {
        log::warn!("dropping event: channel stayed full");
      }
      sent
    },
    Err(TrySendError::Closed(_)) => {
      log::warn!("Attempted to send to closed channel");
      false
    },
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    Arc,
    atomic::{
      AtomicUsize,
      Ordering,
    },
  };

  use super::*;

  /// Counts debounced bursts of `()` events.
  struct Bursts {
    delay:    Duration,
    finished: Arc<AtomicUsize>,
  }

  impl AsyncHook for Bursts {
    type Event = ();

    fn handle_event(&mut self, _: (), _: Option<Instant>) -> Option<Instant> {
      Some(Instant::now() + self.delay)
    }

    fn finish_debounce(&mut self) {
      self.finished.fetch_add(1, Ordering::SeqCst);
    }
  }

  #[tokio::test(start_paused = true)]
  async fn bursts_are_debounced() {
    let finished = Arc::new(AtomicUsize::new(0));
    let tx = Bursts {
      delay:    Duration::from_millis(10),
      finished: finished.clone(),
    }
    .spawn();

    for _ in 0..20 {
      assert!(send_blocking(&tx, ()));
    }
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(finished.load(Ordering::SeqCst), 1);

    assert!(send_blocking(&tx, ()));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(finished.load(Ordering::SeqCst), 2);
  }

  #[test]
  fn no_runtime_means_closed_channel() {
    let tx = Bursts {
      delay:    Duration::from_millis(10),
      finished: Arc::new(AtomicUsize::new(0)),
    }
    .spawn();
    assert!(!send_blocking(&tx, ()));
  }
}
