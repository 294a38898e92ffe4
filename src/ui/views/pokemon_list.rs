use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::controllers::{ListPager, PagerState, SearchController, SearchOptions, SearchState};
use crate::pokeapi::{ResourceClient, ResourceSummary};
use crate::ui::components::{KeyResult, SearchEvent, SearchInput};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::PokemonDetailView;
use crate::ui::{card_line, ensure_valid_selection};

/// Rows from the end of the list at which the next page is requested
const PREFETCH_DISTANCE: usize = 5;

/// The national dex list, with the search prompt layered over it
pub struct PokemonListView {
  client: Arc<ResourceClient>,
  pager: Arc<ListPager>,
  search: SearchController,
  search_input: SearchInput,
  list_state: ListState,
  results_state: ListState,
}

impl PokemonListView {
  pub fn new(client: Arc<ResourceClient>, page_size: usize, options: SearchOptions) -> Self {
    let pager = Arc::new(ListPager::new(Arc::clone(&client), page_size));
    let search = SearchController::new(Arc::clone(&client), options);

    let view = Self {
      client,
      pager,
      search,
      search_input: SearchInput::new(),
      list_state: ListState::default(),
      results_state: ListState::default(),
    };
    view.load_more();
    view
  }

  fn load_more(&self) {
    let pager = Arc::clone(&self.pager);
    tokio::spawn(async move { pager.load_more().await });
  }

  fn refresh(&self) {
    let pager = Arc::clone(&self.pager);
    tokio::spawn(async move { pager.refresh().await });
  }

  /// Search results replace the list while a query is entered
  fn showing_results(&self) -> bool {
    !self.search_input.query().trim().is_empty()
  }

  fn selected_card(&self) -> Option<ResourceSummary> {
    if self.showing_results() {
      let idx = self.results_state.selected()?;
      self.search.state().results.get(idx).cloned()
    } else {
      let idx = self.list_state.selected()?;
      self.pager.state().items.get(idx).cloned()
    }
  }

  fn maybe_prefetch(&self, state: &PagerState) {
    if state.loading || !state.has_more || state.error.is_some() {
      return;
    }
    let selected = self.list_state.selected().unwrap_or(0);
    if selected + PREFETCH_DISTANCE >= state.items.len() {
      self.load_more();
    }
  }

  fn move_selection(&mut self, down: bool) {
    let state = if self.showing_results() {
      &mut self.results_state
    } else {
      &mut self.list_state
    };
    if down {
      state.select_next();
    } else {
      state.select_previous();
    }
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect) {
    let state = self.pager.state();
    ensure_valid_selection(&mut self.list_state, state.items.len());

    let title = if state.loading && state.items.is_empty() {
      " Pokédex (loading...) ".to_string()
    } else if let Some(error) = &state.error {
      format!(" Pokédex ({}) (error: {}) ", state.items.len(), error)
    } else if state.loading {
      format!(" Pokédex ({}) (loading more...) ", state.items.len())
    } else {
      format!(" Pokédex ({}) ", state.items.len())
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Red));

    if state.items.is_empty() && !state.loading {
      let content = if state.error.is_some() {
        "Failed to load the Pokédex. Press 'r' to retry."
      } else {
        "No pokemon found."
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let mut items: Vec<ListItem> = state.items.iter().map(|c| ListItem::new(card_line(c))).collect();
    if !state.has_more {
      items.push(ListItem::new(Line::styled(
        "  end of the Pokédex",
        Style::default().fg(Color::DarkGray),
      )));
    }

    let list = List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }

  fn render_results(&mut self, frame: &mut Frame, area: Rect, state: &SearchState) {
    ensure_valid_selection(&mut self.results_state, state.results.len());

    let block = Block::default()
      .title(format!(" Search \"{}\" ({}) ", state.query.trim(), state.results.len()))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow));

    if state.results.is_empty() {
      let (content, color) = match (&state.error, state.loading) {
        (Some(error), _) => (format!("Search failed: {}", error), Color::Red),
        (None, true) => ("Searching...".to_string(), Color::DarkGray),
        (None, false) => ("No pokemon match.".to_string(), Color::DarkGray),
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(color));
      frame.render_widget(paragraph, area);
      return;
    }

    let items: Vec<ListItem> = state.results.iter().map(|c| ListItem::new(card_line(c))).collect();
    let list = List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.results_state);
  }
}

impl View for PokemonListView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    // Let search component try to handle first
    match self.search_input.handle_key(key) {
      KeyResult::Event(SearchEvent::Changed(query)) => {
        self.results_state.select(None);
        self.search.search(&query);
        return ViewAction::None;
      }
      KeyResult::Event(SearchEvent::Cleared) => {
        self.search.clear();
        return ViewAction::None;
      }
      KeyResult::Event(SearchEvent::Submitted) | KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.move_selection(true),
      KeyCode::Char('k') | KeyCode::Up => self.move_selection(false),
      KeyCode::Char('r') => self.refresh(),
      KeyCode::Enter => {
        if let Some(card) = self.selected_card() {
          return ViewAction::Push(Box::new(PokemonDetailView::new(
            &card,
            Arc::clone(&self.client),
          )));
        }
      }
      KeyCode::Esc if self.showing_results() => {
        self.search_input.reset();
        self.search.clear();
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let search = self.search.state();
    if self.showing_results() {
      self.render_results(frame, area, &search);
    } else {
      self.render_list(frame, area);
    }

    let status = if search.loading { Some("searching...") } else { None };
    self.search_input.render_overlay(frame, area, status);
  }

  fn breadcrumb_label(&self) -> String {
    "Pokédex".to_string()
  }

  fn is_capturing_input(&self) -> bool {
    self.search_input.is_active()
  }

  fn tick(&mut self) {
    if !self.showing_results() {
      self.maybe_prefetch(&self.pager.state());
    }
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("/", "search").with_priority(20),
      ShortcutInfo::new("r", "refresh").with_priority(30),
      ShortcutInfo::new("enter", "details").with_priority(40),
      ShortcutInfo::new("q", "quit").with_priority(90),
    ]
  }
}
