use crate::api::{ProfileResource, Resources};
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::service::MockService;
use crate::storage::KeyValueStore;
use crate::text::get_initials;
use crate::theme::{Palette, Theme};
use crate::ui;
use crate::ui::components::{CommandEvent, CommandInput, KeyResult};
use crate::ui::view::{Shortcut, View, ViewAction, ViewContext};
use crate::ui::views::{ChatView, HomeView, JobListView, ProfileView};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::{stdout, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// How long a footer notice stays up
const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Main application state
pub struct App {
  /// Navigation stack - root is always at index 0
  view_stack: Vec<Box<dyn View>>,

  /// `:` command palette
  command: CommandInput,

  /// Shared handles passed to every view
  ctx: ViewContext,

  /// Profile shown in the header, kept current by the broadcast channel
  profile: ProfileResource,

  theme: Theme,

  title: String,

  /// Latest notice and when it was posted
  notice: Option<(String, Instant)>,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub fn new(
    config: &Config,
    store: Arc<dyn KeyValueStore>,
    events: mpsc::UnboundedSender<Event>,
  ) -> Self {
    let service = MockService::new(config.service, config.jobs.page_limit);
    let resources = Resources::new(service, config.cache.ttl());
    let ctx = ViewContext::new(resources, store.clone(), events);

    let profile = ctx.resources.profile();
    let loader = profile.clone();
    tokio::spawn(async move {
      // Header falls back to a placeholder; failures are logged by the resource
      let _ = loader.fetch_profile().await;
    });

    Self {
      view_stack: vec![Box::new(HomeView::new(ctx.clone()))],
      command: CommandInput::new(),
      ctx,
      profile,
      theme: Theme::load(store),
      title: config.title().to_string(),
      notice: None,
      should_quit: false,
    }
  }

  pub async fn run(&mut self, events: &mut EventHandler) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = self.event_loop(&mut terminal, events).await;

    // Cleanup terminal, even when the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop(
    &mut self,
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    events: &mut EventHandler,
  ) -> Result<()> {
    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(event) => self.handle_event(event),
        None => break,
      }
    }
    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => self.tick(),
      Event::Notice(message) => self.notify(message),
    }
  }

  fn tick(&mut self) {
    for view in &mut self.view_stack {
      view.tick();
    }
    if let Some((_, posted)) = &self.notice {
      if posted.elapsed() >= NOTICE_TTL {
        self.notice = None;
      }
    }
  }

  fn notify(&mut self, message: String) {
    debug!(%message, "Notice");
    self.notice = Some((message, Instant::now()));
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    // The palette only opens when the view is not taking text
    let captured = self.view_stack.last().is_some_and(|v| v.captures_input());
    if self.command.is_active() || !captured {
      match self.command.handle_key(key) {
        KeyResult::Event(CommandEvent::Submitted(cmd)) => {
          self.execute_command(&cmd);
          return;
        }
        KeyResult::Event(CommandEvent::Cancelled) | KeyResult::Handled => return,
        KeyResult::NotHandled => {}
      }
    }

    let action = match self.view_stack.last_mut() {
      Some(view) => view.handle_key(key),
      None => ViewAction::None,
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

  fn execute_command(&mut self, cmd: &str) {
    let ctx = self.ctx.clone();
    match cmd {
      "home" => self.set_root(Box::new(HomeView::new(ctx))),
      "jobs" => self.set_root(Box::new(JobListView::new(ctx, ""))),
      "profile" => self.set_root(Box::new(ProfileView::new(ctx))),
      "chat" => self.set_root(Box::new(ChatView::new(ctx))),
      "theme" => {
        self.theme.toggle();
        self.notify(format!("Switched to {} mode", self.theme.name()));
      }
      "quit" => self.should_quit = true,
      "" => {}
      other => self.notify(format!("Unknown command: {}", other)),
    }
  }

  /// Replace the whole stack with `view`
  fn set_root(&mut self, view: Box<dyn View>) {
    info!(view = %view.breadcrumb_label(), "Switching view");
    self.view_stack.clear();
    self.view_stack.push(view);
  }

  // Accessors for UI rendering
  pub fn current_view_mut(&mut self) -> Option<&mut Box<dyn View>> {
    self.view_stack.last_mut()
  }

  pub fn command_input(&self) -> &CommandInput {
    &self.command
  }

  pub fn palette(&self) -> Palette {
    self.theme.palette()
  }

  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn initials(&self) -> String {
    self
      .profile
      .profile()
      .map(|p| get_initials(&p.name, 2))
      .unwrap_or_default()
  }

  pub fn notice(&self) -> Option<&str> {
    self.notice.as_ref().map(|(message, _)| message.as_str())
  }

  pub fn shortcuts(&self) -> Vec<Shortcut> {
    self
      .view_stack
      .last()
      .map(|view| view.shortcuts())
      .unwrap_or_default()
  }

  pub fn breadcrumb(&self) -> Vec<String> {
    self
      .view_stack
      .iter()
      .map(|v| v.breadcrumb_label())
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::ServiceConfig;
  use crate::storage::MemoryStore;

  fn app() -> App {
    let config = Config {
      service: ServiceConfig {
        failure_rate: 0.0,
        latency: false,
      },
      ..Config::default()
    };
    let (tx, _rx) = mpsc::unbounded_channel();
    App::new(&config, Arc::new(MemoryStore::new()), tx)
  }

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn command(app: &mut App, text: &str) {
    app.handle_key(key(KeyCode::Char(':')));
    for c in text.chars() {
      app.handle_key(key(KeyCode::Char(c)));
    }
    app.handle_key(key(KeyCode::Enter));
  }

  #[tokio::test]
  async fn test_starts_on_home() {
    let app = app();
    assert_eq!(app.breadcrumb(), vec!["Home"]);
  }

  #[tokio::test]
  async fn test_command_replaces_root() {
    let mut app = app();
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.breadcrumb().len(), 2);

    command(&mut app, "profile");
    assert_eq!(app.breadcrumb(), vec!["Profile"]);
  }

  #[tokio::test]
  async fn test_theme_command_toggles_and_notifies() {
    let mut app = app();
    let before = app.palette();
    command(&mut app, "dark");

    assert_ne!(app.palette(), before);
    assert_eq!(app.notice(), Some("Switched to dark mode"));
  }

  #[tokio::test]
  async fn test_unknown_command_notifies() {
    let mut app = app();
    command(&mut app, "nope");
    assert_eq!(app.notice(), Some("Unknown command: nope"));
  }

  #[tokio::test]
  async fn test_q_pops_then_quits() {
    let mut app = app();
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(key(KeyCode::Char('q')));
    assert!(!app.should_quit);
    assert_eq!(app.breadcrumb(), vec!["Home"]);

    app.handle_key(key(KeyCode::Char('q')));
    assert!(app.should_quit);
  }

  #[tokio::test]
  async fn test_header_initials_follow_profile() {
    let app = app();
    while app.initials().is_empty() {
      tokio::task::yield_now().await;
    }
    assert_eq!(app.initials(), "SJ");
  }
}
