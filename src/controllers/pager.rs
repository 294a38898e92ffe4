//! Incremental, offset-based list over the pokemon index.

use std::sync::Arc;
use tokio::sync::watch;

use crate::pokeapi::{ResourceClient, ResourceError, ResourceResult, ResourceSummary};
use crate::task::{CancellableTask, Token};

/// Read-only projection of the list for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerState {
  pub items: Vec<ResourceSummary>,
  /// Offset of the next page to request
  pub offset: usize,
  pub has_more: bool,
  pub loading: bool,
  pub error: Option<String>,
}

impl Default for PagerState {
  fn default() -> Self {
    Self {
      items: Vec::new(),
      offset: 0,
      has_more: true,
      loading: false,
      error: None,
    }
  }
}

impl PagerState {
  fn started(&self) -> Self {
    Self {
      loading: true,
      error: None,
      ..self.clone()
    }
  }

  fn appended(&self, page: Page, page_size: usize) -> Self {
    let mut items = self.items.clone();
    items.extend(page.cards);
    Self {
      items,
      offset: self.offset + page_size,
      has_more: page.has_more,
      loading: false,
      error: None,
    }
  }

  fn replaced(page: Page, page_size: usize) -> Self {
    Self {
      items: page.cards,
      offset: page_size,
      has_more: page.has_more,
      loading: false,
      error: None,
    }
  }

  fn failed(&self, message: String) -> Self {
    Self {
      loading: false,
      error: Some(message),
      ..self.clone()
    }
  }

  fn settled(&self) -> Self {
    Self {
      loading: false,
      ..self.clone()
    }
  }
}

/// A fully resolved page.
struct Page {
  cards: Vec<ResourceSummary>,
  has_more: bool,
}

/// Append-only list view over the paginated index.
///
/// `load_more` and `refresh` are awaited by whoever triggers them; the visible
/// state is only ever changed by committing a complete page.
pub struct ListPager {
  client: Arc<ResourceClient>,
  page_size: usize,
  state: watch::Sender<PagerState>,
  generation: CancellableTask,
}

impl ListPager {
  pub fn new(client: Arc<ResourceClient>, page_size: usize) -> Self {
    Self {
      client,
      page_size: page_size.max(1),
      state: watch::Sender::new(PagerState::default()),
      generation: CancellableTask::new(),
    }
  }

  pub fn state(&self) -> PagerState {
    self.state.borrow().clone()
  }

  pub fn subscribe(&self) -> watch::Receiver<PagerState> {
    self.state.subscribe()
  }

  /// Load and append the next page.
  ///
  /// No-op while a load is in flight or once the upstream reported no next page.
  pub async fn load_more(&self) {
    let mut request = None;
    self.state.send_if_modified(|state| {
      if state.loading || !state.has_more {
        return false;
      }
      request = Some((self.generation.begin(), state.offset));
      *state = state.started();
      true
    });

    let Some((token, offset)) = request else {
      tracing::debug!("load_more skipped: busy or exhausted");
      return;
    };

    tracing::info!(offset, page_size = self.page_size, "loading page");
    let result = self.fetch_page(offset).await;
    let page_size = self.page_size;
    self.commit(token, result, |state, page| state.appended(page, page_size));
  }

  /// Reload from the first page, replacing all items.
  ///
  /// Supersedes any `load_more` still in flight.
  pub async fn refresh(&self) {
    let token = self.generation.begin();
    self.state.send_modify(|state| *state = state.started());

    tracing::info!("refreshing list");
    let result = self.fetch_page(0).await;
    let page_size = self.page_size;
    self.commit(token, result, |_, page| PagerState::replaced(page, page_size));
  }

  /// Fetch the index page and resolve every entry to a card. Any failure
  /// in the fan-out fails the whole page.
  async fn fetch_page(&self, offset: usize) -> ResourceResult<Page> {
    let index = self.client.get_page(self.page_size, offset).await?;
    let names: Vec<&str> = index.results.iter().map(|e| e.name.as_str()).collect();
    let cards = self.client.get_cards(&names).await?;

    Ok(Page {
      cards,
      has_more: index.next.is_some(),
    })
  }

  fn commit<F>(&self, token: Token, result: ResourceResult<Page>, on_success: F)
  where
    F: FnOnce(&PagerState, Page) -> PagerState,
  {
    self.state.send_if_modified(|state| {
      if !self.generation.is_current(token) {
        tracing::debug!("dropping superseded page");
        return false;
      }
      *state = match result {
        Ok(page) => on_success(state, page),
        Err(ResourceError::Aborted) => state.settled(),
        Err(e) => {
          tracing::warn!(error = %e, "page load failed");
          state.failed(e.to_string())
        }
      };
      true
    });
  }
}
