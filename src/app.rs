use crate::commands::{self, Action};
use crate::config::Config;
use crate::controllers::SearchOptions;
use crate::event::{Event, EventHandler};
use crate::pokeapi::ResourceClient;
use crate::ui::components::{CommandEvent, CommandInput, KeyResult};
use crate::ui::renderfns::{draw_footer, draw_header, truncate};
use crate::ui::view::{View, ViewAction};
use crate::ui::views::{PokemonListView, TypeListView};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;

const TICK_RATE: Duration = Duration::from_millis(100);

/// Main application state
pub struct App {
  /// Navigation stack - root is always the Pokédex list
  view_stack: Vec<Box<dyn View>>,

  command: CommandInput,

  /// Last command outcome, shown in the footer
  status: Option<String>,

  config: Config,

  /// Shared by every controller the views create
  client: Arc<ResourceClient>,

  page_size: usize,

  should_quit: bool,
}

impl App {
  pub fn new(config: Config, page_size: Option<usize>) -> Result<Self> {
    let client = Arc::new(ResourceClient::from_config(&config)?);
    let page_size = page_size.unwrap_or(config.list.page_size);
    tracing::info!(base_url = %config.api.base_url, page_size, "starting dexterm");

    let mut app = Self {
      view_stack: Vec::new(),
      command: CommandInput::new(),
      status: None,
      config,
      client,
      page_size,
      should_quit: false,
    };
    app.view_stack.push(app.root_view());
    Ok(app)
  }

  fn root_view(&self) -> Box<dyn View> {
    Box::new(PokemonListView::new(
      Arc::clone(&self.client),
      self.page_size,
      SearchOptions::from(&self.config.search),
    ))
  }

  pub async fn run(&mut self) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = self.event_loop(&mut terminal).await;

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop(
    &mut self,
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
  ) -> Result<()> {
    let mut events = EventHandler::new(TICK_RATE);

    while !self.should_quit {
      terminal.draw(|frame| self.draw(frame))?;

      match events.next().await {
        Some(Event::Key(key)) => self.handle_key(key),
        Some(Event::Tick) => {
          if let Some(view) = self.view_stack.last_mut() {
            view.tick();
          }
        }
        None => break,
      }
    }
    Ok(())
  }

  fn draw(&mut self, frame: &mut Frame) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1), // Header
        Constraint::Min(1),    // Main content
        Constraint::Length(1), // Footer
      ])
      .split(frame.area());

    let shortcuts = self
      .view_stack
      .last()
      .map(|v| v.shortcuts())
      .unwrap_or_default();
    draw_header(
      frame,
      chunks[0],
      &self.config.api.base_url,
      self.client.stats().size,
      &shortcuts,
    );

    if let Some(view) = self.view_stack.last_mut() {
      view.render(frame, chunks[1]);
    }
    self.command.render_overlay(frame, chunks[1]);

    let breadcrumb = self.breadcrumb();
    draw_footer(frame, chunks[2], &breadcrumb, self.status.as_deref());
  }

  fn breadcrumb(&self) -> Vec<String> {
    self
      .view_stack
      .iter()
      .map(|v| v.breadcrumb_label())
      .collect()
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    let capturing = self
      .view_stack
      .last()
      .is_some_and(|v| v.is_capturing_input());

    if self.command.is_active() || !capturing {
      match self.command.handle_key(key) {
        KeyResult::Event(CommandEvent::Submitted(line)) => {
          self.execute_command(&line);
          return;
        }
        KeyResult::Event(CommandEvent::Cancelled) | KeyResult::Handled => return,
        KeyResult::NotHandled => {}
      }
    }

    let action = match self.view_stack.last_mut() {
      Some(view) => view.handle_key(key),
      None => return,
    };

    match action {
      ViewAction::None => {}
      ViewAction::Push(view) => self.view_stack.push(view),
      ViewAction::Pop => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        } else {
          self.should_quit = true;
        }
      }
    }
  }

  fn execute_command(&mut self, line: &str) {
    let action = match commands::parse(line) {
      Ok(action) => action,
      Err(message) => {
        self.status = Some(message);
        return;
      }
    };

    tracing::debug!(?action, "executing command");
    match action {
      Action::Pokedex => {
        self.view_stack.truncate(1);
        self.status = None;
      }
      Action::Type(name) => {
        self.view_stack.truncate(1);
        self
          .view_stack
          .push(Box::new(TypeListView::new(name, Arc::clone(&self.client))));
        self.status = None;
      }
      Action::Stats => {
        let stats = self.client.stats();
        let keys = truncate(&stats.keys.join(", "), 80);
        self.status = Some(format!("{} cached responses: {}", stats.size, keys));
      }
      Action::ClearCache => {
        let purged = self.client.stats().size;
        self.client.clear();
        self.status = Some(format!("Cleared {} cached responses", purged));
      }
      Action::Quit => self.should_quit = true,
    }
  }
}
