//! Debounced, cancellable pokemon search.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::config::SearchConfig;
use crate::pokeapi::{ResourceClient, ResourceError, ResourceResult, ResourceSummary};
use crate::task::{CancellableTask, Token};

/// Tunables for [`SearchController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
  /// Quiet period after the last keystroke before a lookup starts
  pub debounce: Duration,
  /// How many index entries the partial-match scan considers
  pub index_limit: usize,
  /// Maximum number of partial matches resolved to cards
  pub max_matches: usize,
}

impl Default for SearchOptions {
  fn default() -> Self {
    Self {
      debounce: Duration::from_millis(500),
      index_limit: 1000,
      max_matches: 10,
    }
  }
}

impl From<&SearchConfig> for SearchOptions {
  fn from(config: &SearchConfig) -> Self {
    Self {
      debounce: config.debounce(),
      index_limit: config.index_limit,
      max_matches: config.max_matches,
    }
  }
}

/// Read-only projection of the search for the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
  pub query: String,
  pub results: Vec<ResourceSummary>,
  pub loading: bool,
  pub error: Option<String>,
}

impl SearchState {
  fn pending(&self, query: &str) -> Self {
    Self {
      query: query.to_string(),
      loading: true,
      error: None,
      ..self.clone()
    }
  }

  fn resolved(&self, results: Vec<ResourceSummary>) -> Self {
    Self {
      results,
      loading: false,
      error: None,
      ..self.clone()
    }
  }

  fn failed(&self, message: String) -> Self {
    Self {
      results: Vec::new(),
      loading: false,
      error: Some(message),
      ..self.clone()
    }
  }
}

/// Resolve a query to cards.
///
/// 1. Digits only: direct id lookup (a miss yields no results)
/// 2. Otherwise exact name lookup
/// 3. If the exact lookup is a miss, scan the first `index_limit` index
///    entries for names containing the query and resolve up to
///    `max_matches` of them concurrently
pub async fn lookup(
  client: &ResourceClient,
  options: &SearchOptions,
  query: &str,
) -> ResourceResult<Vec<ResourceSummary>> {
  let query = query.trim().to_lowercase();
  if query.is_empty() {
    return Ok(Vec::new());
  }

  if query.chars().all(|c| c.is_ascii_digit()) {
    let Ok(id) = query.parse::<u32>() else {
      return Ok(Vec::new());
    };
    return match client.get_card(&id.to_string()).await {
      Ok(card) => Ok(vec![card]),
      Err(e) if e.is_not_found() => Ok(Vec::new()),
      Err(e) => Err(e),
    };
  }

  match client.get_card(&query).await {
    Ok(card) => Ok(vec![card]),
    Err(e) if e.is_not_found() => partial_matches(client, options, &query).await,
    Err(e) => Err(e),
  }
}

async fn partial_matches(
  client: &ResourceClient,
  options: &SearchOptions,
  query: &str,
) -> ResourceResult<Vec<ResourceSummary>> {
  let index = client.get_page(options.index_limit, 0).await?;
  let matches: Vec<&str> = index
    .results
    .iter()
    .filter(|entry| entry.name.to_lowercase().contains(query))
    .take(options.max_matches)
    .map(|entry| entry.name.as_str())
    .collect();

  tracing::debug!(query, matches = matches.len(), "partial name scan");
  client.get_cards(&matches).await
}

struct SearchInner {
  client: Arc<ResourceClient>,
  options: SearchOptions,
  state: watch::Sender<SearchState>,
  session: CancellableTask,
}

impl SearchInner {
  /// Apply a finished lookup if its session is still the current one.
  fn commit(&self, token: Token, result: ResourceResult<Vec<ResourceSummary>>) -> bool {
    if matches!(result, Err(ResourceError::Aborted)) {
      return false;
    }
    self.state.send_if_modified(|state| {
      if !self.session.is_current(token) {
        tracing::debug!(query = %state.query, "dropping superseded search results");
        return false;
      }
      *state = match result {
        Ok(results) => state.resolved(results),
        Err(e) => {
          tracing::warn!(error = %e, "search failed");
          state.failed(e.to_string())
        }
      };
      true
    })
  }
}

/// Turns rapid keystrokes into at most one lookup per quiet period.
///
/// Each non-empty `search` starts a new session that aborts the pending
/// timer and any in-flight request of the previous one. Dropping the
/// controller cancels outstanding work.
pub struct SearchController {
  inner: Arc<SearchInner>,
}

impl SearchController {
  pub fn new(client: Arc<ResourceClient>, options: SearchOptions) -> Self {
    Self {
      inner: Arc::new(SearchInner {
        client,
        options,
        state: watch::Sender::new(SearchState::default()),
        session: CancellableTask::new(),
      }),
    }
  }

  pub fn state(&self) -> SearchState {
    self.inner.state.borrow().clone()
  }

  pub fn subscribe(&self) -> watch::Receiver<SearchState> {
    self.inner.state.subscribe()
  }

  /// Schedule a search for `query`. Blank queries clear synchronously.
  pub fn search(&self, query: &str) {
    if query.trim().is_empty() {
      self.clear();
      return;
    }

    // The previous session must not commit over the pending state, and the
    // pending state must be in place before the new session can commit.
    self.inner.session.cancel();
    self
      .inner
      .state
      .send_modify(|state| *state = state.pending(query));

    let inner = Arc::clone(&self.inner);
    let owned_query = query.to_string();
    self.inner.session.spawn(move |token| async move {
      tokio::time::sleep(inner.options.debounce).await;
      tracing::info!(query = %owned_query, "searching");
      let result = lookup(&inner.client, &inner.options, &owned_query).await;
      inner.commit(token, result);
    });
  }

  /// Abort any pending search and reset to an empty result set.
  pub fn clear(&self) {
    self.inner.session.cancel();
    self.inner.state.send_replace(SearchState::default());
  }
}

impl Drop for SearchController {
  fn drop(&mut self) {
    self.inner.session.cancel();
  }
}
