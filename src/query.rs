//! One-shot async loader for views that show a single fetched value.
//!
//! A `Query<T>` wraps a fetch closure, runs it on the runtime and publishes
//! the outcome as a [`QueryState`] snapshot. Views read the snapshot on
//! every render; there is nothing to poll.
//!
//! ```ignore
//! let client = client.clone();
//! let query = Query::new(move || {
//!   let client = client.clone();
//!   async move { client.cards_by_type("fire").await }
//! });
//! query.fetch();
//! ```

use futures::future::BoxFuture;
use std::future::Future;
use std::sync::{Arc, Weak};
use tokio::sync::watch;

use crate::pokeapi::ResourceResult;
use crate::task::CancellableTask;

/// The state of a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryState<T> {
  /// Query has not been started
  Idle,
  Loading,
  Success(T),
  Error(String),
}

impl<T> QueryState<T> {
  pub fn is_loading(&self) -> bool {
    matches!(self, QueryState::Loading)
  }

  pub fn data(&self) -> Option<&T> {
    match self {
      QueryState::Success(data) => Some(data),
      _ => None,
    }
  }

  pub fn error(&self) -> Option<&str> {
    match self {
      QueryState::Error(e) => Some(e),
      _ => None,
    }
  }
}

type FetcherFn<T> = Box<dyn Fn() -> BoxFuture<'static, ResourceResult<T>> + Send + Sync>;

pub struct Query<T> {
  fetcher: FetcherFn<T>,
  state: Arc<watch::Sender<QueryState<T>>>,
  task: Arc<CancellableTask>,
}

impl<T: Clone + Send + Sync + 'static> Query<T> {
  pub fn new<F, Fut>(fetcher: F) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ResourceResult<T>> + Send + 'static,
  {
    Self {
      fetcher: Box::new(move || Box::pin(fetcher())),
      state: Arc::new(watch::Sender::new(QueryState::Idle)),
      task: Arc::new(CancellableTask::new()),
    }
  }

  pub fn state(&self) -> QueryState<T> {
    self.state.borrow().clone()
  }

  pub fn is_loading(&self) -> bool {
    self.state.borrow().is_loading()
  }

  /// Start fetching unless a fetch is already running
  pub fn fetch(&self) {
    if self.is_loading() {
      return;
    }
    self.refetch();
  }

  /// Start a new fetch, discarding the outcome of any running one
  pub fn refetch(&self) {
    let future = (self.fetcher)();
    let state = Arc::clone(&self.state);
    let task: Weak<CancellableTask> = Arc::downgrade(&self.task);
    self.task.cancel();
    state.send_replace(QueryState::Loading);

    self.task.spawn(move |token| async move {
      let next = match future.await {
        Ok(data) => QueryState::Success(data),
        Err(e) if e.is_aborted() => return,
        Err(e) => QueryState::Error(e.to_string()),
      };
      state.send_if_modified(|current| {
        let is_current = task.upgrade().is_some_and(|t| t.is_current(token));
        if is_current {
          *current = next;
        }
        is_current
      });
    });
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::pokeapi::ResourceError;
  use std::sync::atomic::{AtomicU32, Ordering};
  use std::time::Duration;

  #[tokio::test(start_paused = true)]
  async fn test_query_success() {
    let query = Query::new(|| async { Ok(vec![1, 2, 3]) });
    assert_eq!(query.state(), QueryState::Idle);

    query.fetch();
    assert!(query.is_loading());

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(query.state().data(), Some(&vec![1, 2, 3]));
  }

  #[tokio::test(start_paused = true)]
  async fn test_query_error() {
    let query: Query<u32> = Query::new(|| async { Err(ResourceError::not_found("/type/nope")) });

    query.fetch();
    tokio::time::sleep(Duration::from_millis(10)).await;

    let state = query.state();
    assert!(state.error().is_some_and(|e| e.contains("/type/nope")));
  }

  #[tokio::test(start_paused = true)]
  async fn test_fetch_while_loading_is_noop() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let query = Query::new(move || {
      counter.fetch_add(1, Ordering::SeqCst);
      async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        Ok(42)
      }
    });

    query.fetch();
    query.fetch();
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(query.state(), QueryState::Success(42));
  }

  #[tokio::test(start_paused = true)]
  async fn test_refetch_supersedes_pending() {
    let counter = Arc::new(AtomicU32::new(0));
    let for_query = counter.clone();

    let query = Query::new(move || {
      let n = for_query.fetch_add(1, Ordering::SeqCst);
      async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok(n)
      }
    });

    query.fetch();
    tokio::time::sleep(Duration::from_millis(10)).await;
    query.refetch();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(query.state(), QueryState::Success(1));
  }
}
