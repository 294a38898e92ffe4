pub mod components;
pub mod renderfns;
pub mod view;
pub mod views;

use crate::pokeapi::ResourceSummary;
use ratatui::prelude::*;
use ratatui::widgets::ListState;
use renderfns::{display_name, format_id, truncate, type_color};

/// Keep the list selection inside `0..len`, selecting the first row when
/// items appear and clearing the selection when they disappear.
pub fn ensure_valid_selection(state: &mut ListState, len: usize) {
  match state.selected() {
    _ if len == 0 => state.select(None),
    None => state.select(Some(0)),
    Some(i) if i >= len => state.select(Some(len - 1)),
    Some(_) => {}
  }
}

/// One list row for a pokemon card: number, name and colored type badges
pub fn card_line(card: &ResourceSummary) -> Line<'static> {
  let mut spans = vec![
    Span::styled(
      format!("{:<6}", format_id(card.id)),
      Style::default().fg(Color::DarkGray),
    ),
    Span::raw(" "),
    Span::styled(
      format!("{:<16}", truncate(&display_name(&card.name), 16)),
      Style::default().fg(Color::White).bold(),
    ),
  ];

  for type_name in &card.types {
    spans.push(Span::raw(" "));
    spans.push(Span::styled(
      format!(" {} ", type_name.to_uppercase()),
      Style::default().fg(Color::Black).bg(type_color(type_name)),
    ));
  }

  Line::from(spans)
}
