use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::pokeapi::{ResourceClient, ResourceSummary};
use crate::query::{Query, QueryState};
use crate::ui::renderfns::{display_name, type_color};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::PokemonDetailView;
use crate::ui::{card_line, ensure_valid_selection};

/// First pokemon of one type, opened with `:type <name>`
pub struct TypeListView {
  client: Arc<ResourceClient>,
  type_name: String,
  query: Query<Vec<ResourceSummary>>,
  list_state: ListState,
}

impl TypeListView {
  pub fn new(type_name: String, client: Arc<ResourceClient>) -> Self {
    let for_query = Arc::clone(&client);
    let name = type_name.clone();
    let query = Query::new(move || {
      let client = Arc::clone(&for_query);
      let name = name.clone();
      async move { client.cards_by_type(&name).await }
    });

    // Start fetching immediately
    query.fetch();

    Self {
      client,
      type_name,
      query,
      list_state: ListState::default(),
    }
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect) {
    let state = self.query.state();
    let cards: &[ResourceSummary] = state.data().map(|v| v.as_slice()).unwrap_or(&[]);
    ensure_valid_selection(&mut self.list_state, cards.len());

    let label = display_name(&self.type_name);
    let title = match &state {
      QueryState::Loading | QueryState::Idle => format!(" {} type (loading...) ", label),
      QueryState::Error(_) => format!(" {} type (error) ", label),
      QueryState::Success(cards) => format!(" {} type ({}) ", label, cards.len()),
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(type_color(&self.type_name)));

    if cards.is_empty() {
      let (content, color) = match &state {
        QueryState::Error(e) => (format!("{}\n\nPress 'r' to retry.", e), Color::Red),
        QueryState::Success(_) => ("No pokemon of this type.".to_string(), Color::DarkGray),
        _ => ("Loading...".to_string(), Color::DarkGray),
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(color));
      frame.render_widget(paragraph, area);
      return;
    }

    let items: Vec<ListItem> = cards.iter().map(|c| ListItem::new(card_line(c))).collect();
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
}

impl View for TypeListView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Char('r') => self.query.refetch(),
      KeyCode::Enter => {
        let state = self.query.state();
        let selected = self
          .list_state
          .selected()
          .and_then(|idx| state.data().and_then(|cards| cards.get(idx)));
        if let Some(card) = selected {
          return ViewAction::Push(Box::new(PokemonDetailView::new(
            card,
            Arc::clone(&self.client),
          )));
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    self.render_list(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    format!("Type [{}]", self.type_name)
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("r", "reload").with_priority(30),
      ShortcutInfo::new("enter", "details").with_priority(40),
      ShortcutInfo::new("q", "back").with_priority(90),
    ]
  }
}
