//! Deferred, coalesced execution of breadcrumb updates.

mod debounce;
pub mod scheduler;
pub mod token;

pub use debounce::{
  AsyncHook,
  send_blocking,
};
pub use scheduler::{
  ScheduledUpdate,
  UpdateScheduler,
};
pub use token::{
  Token,
  TokenSource,
};
