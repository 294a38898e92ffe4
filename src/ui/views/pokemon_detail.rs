use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::controllers::DetailController;
use crate::pokeapi::{DetailResolver, ResourceClient, ResourceDetail, ResourceSummary};
use crate::ui::renderfns::{
  display_name, format_height, format_id, format_stat_name, format_weight, generation_from_id,
  stat_color, type_color,
};
use crate::ui::view::{ShortcutInfo, View, ViewAction};

/// Widest stat bar, reached at a base stat of 255
const STAT_BAR_WIDTH: usize = 30;

/// Detail page for one pokemon
pub struct PokemonDetailView {
  label: String,
  controller: DetailController,
  scroll: u16,
}

impl PokemonDetailView {
  pub fn new(card: &ResourceSummary, client: Arc<ResourceClient>) -> Self {
    let controller = DetailController::new(DetailResolver::new(client));
    controller.load(&card.id.to_string());

    Self {
      label: display_name(&card.name),
      controller,
      scroll: 0,
    }
  }

  fn render_detail(&self, frame: &mut Frame, area: Rect) {
    let state = self.controller.state();

    let title = match (&state.error, state.loading) {
      (_, true) => format!(" {} (loading...) ", self.label),
      (Some(_), _) => format!(" {} (error) ", self.label),
      _ if state.detail.as_ref().is_some_and(|d| !d.is_complete()) => {
        format!(" {} (partial) ", self.label)
      }
      _ => format!(" {} ", self.label),
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Red));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.loading {
      let paragraph =
        Paragraph::new("Loading details...").style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, inner);
      return;
    }

    if let Some(error) = &state.error {
      let paragraph = Paragraph::new(format!("Error: {}\n\nPress 'r' to retry.", error))
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true });
      frame.render_widget(paragraph, inner);
      return;
    }

    let Some(detail) = &state.detail else {
      return;
    };

    let paragraph = Paragraph::new(detail_lines(detail))
      .wrap(Wrap { trim: false })
      .scroll((self.scroll, 0));
    frame.render_widget(paragraph, inner);
  }
}

fn section(title: &str) -> Line<'static> {
  Line::from(Span::styled(
    title.to_string(),
    Style::default().fg(Color::Cyan).bold(),
  ))
}

fn label(name: &str) -> Span<'static> {
  Span::styled(format!("{:<12}", name), Style::default().fg(Color::DarkGray))
}

fn detail_lines(detail: &ResourceDetail) -> Vec<Line<'static>> {
  let summary = &detail.summary;
  let mut lines = Vec::new();

  // Heading: number, name, types
  let mut heading = vec![
    Span::styled(
      format_id(summary.id),
      Style::default().fg(Color::DarkGray),
    ),
    Span::raw(" "),
    Span::styled(
      display_name(&summary.name),
      Style::default().fg(Color::White).bold(),
    ),
  ];
  for type_name in &summary.types {
    heading.push(Span::raw(" "));
    heading.push(Span::styled(
      format!(" {} ", type_name.to_uppercase()),
      Style::default().fg(Color::Black).bg(type_color(type_name)),
    ));
  }
  lines.push(Line::from(heading));

  if let Some(genus) = detail.species.as_ref().and_then(|s| s.genus.clone()) {
    lines.push(Line::styled(genus, Style::default().fg(Color::Gray).italic()));
  }
  lines.push(Line::default());

  lines.push(Line::from(vec![
    label("Height"),
    Span::raw(format_height(detail.height)),
  ]));
  lines.push(Line::from(vec![
    label("Weight"),
    Span::raw(format_weight(detail.weight)),
  ]));
  if let Some(exp) = detail.base_experience {
    lines.push(Line::from(vec![label("Base exp"), Span::raw(exp.to_string())]));
  }
  lines.push(Line::from(vec![
    label("Generation"),
    Span::raw(generation_from_id(summary.id)),
  ]));
  if let Some(species) = &detail.species {
    let mut flags = Vec::new();
    if species.is_legendary {
      flags.push("legendary");
    }
    if species.is_mythical {
      flags.push("mythical");
    }
    if !flags.is_empty() {
      lines.push(Line::from(vec![
        label("Status"),
        Span::styled(flags.join(", "), Style::default().fg(Color::Yellow)),
      ]));
    }
  }
  lines.push(Line::default());

  lines.push(section("Base stats"));
  for stat in &detail.stats {
    let width = (stat.base as usize * STAT_BAR_WIDTH / 255).clamp(1, STAT_BAR_WIDTH);
    lines.push(Line::from(vec![
      label(&format_stat_name(&stat.name)),
      Span::raw(format!("{:>4} ", stat.base)),
      Span::styled("█".repeat(width), Style::default().fg(stat_color(stat.base))),
    ]));
  }
  let total: u32 = detail.stats.iter().map(|s| s.base).sum();
  lines.push(Line::from(vec![
    label("Total"),
    Span::styled(format!("{:>4}", total), Style::default().bold()),
  ]));
  lines.push(Line::default());

  lines.push(section("Abilities"));
  for ability in &detail.abilities {
    let mut spans = vec![Span::raw("  "), Span::raw(display_name(&ability.name))];
    if ability.hidden {
      spans.push(Span::styled(" (hidden)", Style::default().fg(Color::DarkGray)));
    }
    lines.push(Line::from(spans));
  }
  lines.push(Line::default());

  if let Some(text) = detail.species.as_ref().and_then(|s| s.flavor_text.clone()) {
    lines.push(section("Pokédex entry"));
    lines.push(Line::raw(text));
    lines.push(Line::default());
  }

  if let Some(chain) = &detail.evolution {
    lines.push(section("Evolution"));
    for stage in chain {
      let mut spans = vec![
        Span::raw("  ".repeat(stage.depth + 1)),
        Span::raw(display_name(&stage.species)),
      ];
      if stage.species == summary.name {
        spans.push(Span::styled(" ◀", Style::default().fg(Color::Yellow)));
      }
      match (stage.min_level, &stage.trigger) {
        (Some(level), _) => spans.push(Span::styled(
          format!("  (level {})", level),
          Style::default().fg(Color::DarkGray),
        )),
        (None, Some(trigger)) if stage.depth > 0 => spans.push(Span::styled(
          format!("  ({})", trigger.replace('-', " ")),
          Style::default().fg(Color::DarkGray),
        )),
        _ => {}
      }
      lines.push(Line::from(spans));
    }
    lines.push(Line::default());
  }

  for part in &detail.missing {
    lines.push(Line::styled(
      format!("Could not load {}. Press 'r' to retry.", part),
      Style::default().fg(Color::Yellow),
    ));
  }

  lines
}

impl View for PokemonDetailView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
      KeyCode::Char('k') | KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
      KeyCode::Char('r') => {
        self.scroll = 0;
        self.controller.retry();
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    self.render_detail(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    self.label.clone()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("j/k", "scroll").with_priority(20),
      ShortcutInfo::new("r", "reload").with_priority(30),
      ShortcutInfo::new("q", "back").with_priority(90),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::pokeapi::types::{Ability, EvolutionStage, Stat};
  use crate::pokeapi::DetailPart;

  fn text(lines: &[Line]) -> String {
    lines
      .iter()
      .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
      .collect::<Vec<_>>()
      .join("\n")
  }

  fn detail() -> ResourceDetail {
    ResourceDetail {
      summary: ResourceSummary {
        id: 25,
        name: "pikachu".to_string(),
        image: String::new(),
        types: vec!["electric".to_string()],
      },
      height: 4,
      weight: 60,
      base_experience: Some(112),
      stats: vec![
        Stat {
          name: "hp".to_string(),
          base: 35,
        },
        Stat {
          name: "speed".to_string(),
          base: 90,
        },
      ],
      abilities: vec![Ability {
        name: "lightning-rod".to_string(),
        hidden: true,
      }],
      species: None,
      evolution: Some(vec![
        EvolutionStage {
          species: "pichu".to_string(),
          id: Some(172),
          depth: 0,
          min_level: None,
          trigger: None,
        },
        EvolutionStage {
          species: "pikachu".to_string(),
          id: Some(25),
          depth: 1,
          min_level: None,
          trigger: Some("level-up".to_string()),
        },
      ]),
      missing: vec![DetailPart::Species],
    }
  }

  #[test]
  fn test_detail_lines_render_core_fields() {
    let rendered = text(&detail_lines(&detail()));
    assert!(rendered.contains("#025 Pikachu"));
    assert!(rendered.contains("0.4 m"));
    assert!(rendered.contains("6.0 kg"));
    assert!(rendered.contains("Total        125"));
    assert!(rendered.contains("Lightning Rod (hidden)"));
  }

  #[test]
  fn test_stat_bar_never_exceeds_width() {
    let mut detail = detail();
    detail.stats = vec![Stat {
      name: "hp".to_string(),
      base: 999,
    }];
    let rendered = text(&detail_lines(&detail));
    let widest = rendered
      .lines()
      .map(|l| l.chars().filter(|c| *c == '█').count())
      .max()
      .unwrap_or(0);
    assert_eq!(widest, STAT_BAR_WIDTH);
  }

  #[test]
  fn test_detail_lines_mark_current_stage_and_missing_parts() {
    let rendered = text(&detail_lines(&detail()));
    assert!(rendered.contains("Pikachu ◀  (level up)"));
    assert!(rendered.contains("Could not load species."));
  }
}
