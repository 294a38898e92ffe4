//! Loading state around [`DetailResolver`] for a single pokemon.

use std::sync::Arc;
use tokio::sync::watch;

use crate::pokeapi::{DetailResolver, ResourceDetail, ResourceError, ResourceResult};
use crate::task::{CancellableTask, Token};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailState {
  /// The id or name last requested
  pub target: Option<String>,
  pub detail: Option<ResourceDetail>,
  pub loading: bool,
  pub error: Option<String>,
}

impl DetailState {
  fn requested(&self, target: &str) -> Self {
    Self {
      target: Some(target.to_string()),
      detail: None,
      loading: true,
      error: None,
    }
  }

  fn loaded(&self, detail: ResourceDetail) -> Self {
    Self {
      detail: Some(detail),
      loading: false,
      error: None,
      ..self.clone()
    }
  }

  fn failed(&self, message: String) -> Self {
    Self {
      detail: None,
      loading: false,
      error: Some(message),
      ..self.clone()
    }
  }
}

struct DetailInner {
  resolver: DetailResolver,
  state: watch::Sender<DetailState>,
  request: CancellableTask,
}

impl DetailInner {
  fn commit(&self, token: Token, result: ResourceResult<ResourceDetail>) {
    if matches!(result, Err(ResourceError::Aborted)) {
      return;
    }
    self.state.send_if_modified(|state| {
      if !self.request.is_current(token) {
        return false;
      }
      *state = match result {
        Ok(detail) => state.loaded(detail),
        Err(e) => state.failed(e.to_string()),
      };
      true
    });
  }
}

/// Detail view controller with `load` and `retry`.
///
/// A new `load` supersedes the previous one; dropping the controller aborts
/// the request in flight.
pub struct DetailController {
  inner: Arc<DetailInner>,
}

impl DetailController {
  pub fn new(resolver: DetailResolver) -> Self {
    Self {
      inner: Arc::new(DetailInner {
        resolver,
        state: watch::Sender::new(DetailState::default()),
        request: CancellableTask::new(),
      }),
    }
  }

  pub fn state(&self) -> DetailState {
    self.inner.state.borrow().clone()
  }

  pub fn subscribe(&self) -> watch::Receiver<DetailState> {
    self.inner.state.subscribe()
  }

  pub fn load(&self, id_or_name: &str) {
    self.inner.request.cancel();
    self
      .inner
      .state
      .send_modify(|state| *state = state.requested(id_or_name));

    let inner = Arc::clone(&self.inner);
    let target = id_or_name.to_string();
    self.inner.request.spawn(move |token| async move {
      let result = inner.resolver.get_details(&target).await;
      inner.commit(token, result);
    });
  }

  /// Load the last requested target again. No-op before the first `load`.
  pub fn retry(&self) {
    let target = self.inner.state.borrow().target.clone();
    if let Some(target) = target {
      self.load(&target);
    }
  }
}

impl Drop for DetailController {
  fn drop(&mut self) {
    self.inner.request.cancel();
  }
}
