//! Cancellable background work tagged with a monotonically increasing token.
//!
//! A [`CancellableTask`] owns at most one running task. Starting a new one
//! aborts the previous task and invalidates its [`Token`]; results computed
//! under an old token must be discarded by checking [`CancellableTask::is_current`]
//! before they are committed.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::task::AbortHandle;

/// Identifies one generation of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Token(u64);

#[derive(Default)]
pub struct CancellableTask {
  epoch: AtomicU64,
  handle: Mutex<Option<AbortHandle>>,
}

impl CancellableTask {
  pub fn new() -> Self {
    Self::default()
  }

  fn handle(&self) -> MutexGuard<'_, Option<AbortHandle>> {
    self.handle.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Start a new generation: invalidates every earlier token and aborts the
  /// running task, if any.
  pub fn begin(&self) -> Token {
    let token = Token(self.epoch.fetch_add(1, Ordering::SeqCst) + 1);
    if let Some(handle) = self.handle().take() {
      handle.abort();
    }
    token
  }

  /// Begin a new generation and run `task` on the runtime under its token.
  pub fn spawn<F, Fut>(&self, task: F) -> Token
  where
    F: FnOnce(Token) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
  {
    let token = self.begin();
    let join = tokio::spawn(task(token));
    *self.handle() = Some(join.abort_handle());
    token
  }

  /// Invalidate the current generation without starting a new task.
  pub fn cancel(&self) {
    self.begin();
  }

  pub fn is_current(&self, token: Token) -> bool {
    self.epoch.load(Ordering::SeqCst) == token.0
  }
}

impl Drop for CancellableTask {
  fn drop(&mut self) {
    self.cancel();
  }
}
