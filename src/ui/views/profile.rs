use crate::api::{ApplicationsResource, ProfileResource};
use crate::query::Query;
use crate::service::data::SKILLS;
use crate::service::types::{Application, Profile, ProfilePatch, Stat};
use crate::text::get_initials;
use crate::theme::Palette;
use crate::ui::components::{KeyResult, ProfileEditor, ProfileFormEvent};
use crate::ui::renderfns::status_color;
use crate::ui::view::{Shortcut, View, ViewAction, ViewContext};
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
  Overview,
  Applications,
  Saved,
}

const TABS: [Tab; 3] = [Tab::Overview, Tab::Applications, Tab::Saved];

impl Tab {
  fn title(self) -> &'static str {
    match self {
      Tab::Overview => "Overview",
      Tab::Applications => "Applications",
      Tab::Saved => "Saved Jobs",
    }
  }
}

/// The user's profile, stats and applications, with an edit form
pub struct ProfileView {
  ctx: ViewContext,
  profile: ProfileResource,
  applications: ApplicationsResource,
  tab: usize,
  editor: ProfileEditor,
  save: Query<Profile>,
}

impl ProfileView {
  pub fn new(ctx: ViewContext) -> Self {
    let view = Self {
      profile: ctx.resources.profile(),
      applications: ctx.resources.applications(),
      ctx,
      tab: 0,
      editor: ProfileEditor::new(),
      save: Query::new(),
    };
    view.load();
    view
  }

  /// Load profile, stats and applications side by side
  fn load(&self) {
    let profile = self.profile.clone();
    let applications = self.applications.clone();

    tokio::spawn(async move {
      // Each call runs to completion so no loading flag is left behind;
      // failures are logged and kept in each resource's error state
      let _ = futures::join!(
        profile.fetch_profile(),
        profile.fetch_stats(),
        applications.fetch_applications()
      );
    });
  }

  fn retry(&self) {
    self.profile.clear_error();
    self.applications.clear_error();
    self.load();
  }

  fn save(&mut self, patch: ProfilePatch) {
    if self.save.is_loading() {
      return;
    }
    let profile = self.profile.clone();
    self.save.run(async move { profile.update_profile(patch).await });
  }

  fn settle_save(&mut self) {
    if !self.save.poll() {
      return;
    }
    match self.save.take() {
      Some(Ok(_)) => {
        self.editor.close();
        self.ctx.notify("Profile updated successfully!");
      }
      Some(Err(e)) => {
        // Reported inside the form; the page itself is still valid
        self.profile.clear_error();
        self.editor.fail(e);
      }
      None => {}
    }
  }

  fn render_message(
    &self,
    frame: &mut Frame,
    area: Rect,
    text: String,
    color: Color,
    palette: &Palette,
  ) {
    let block = Block::default()
      .title(" Profile ")
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(palette.border));
    let paragraph = Paragraph::new(text)
      .block(block)
      .wrap(Wrap { trim: true })
      .style(Style::default().fg(color));
    frame.render_widget(paragraph, area);
  }

  fn render_header(&self, frame: &mut Frame, area: Rect, profile: &Profile, palette: &Palette) {
    let mut lines = vec![
      Line::from(vec![
        Span::styled(
          format!(" {} ", get_initials(&profile.name, 2)),
          Style::default().fg(Color::Black).bg(palette.accent).bold(),
        ),
        Span::raw("  "),
        Span::styled(profile.name.clone(), Style::default().fg(palette.text).bold()),
      ]),
      Line::from(Span::styled(
        profile.title.clone(),
        Style::default().fg(palette.accent),
      )),
      Line::from(Span::styled(
        format!("{}  ·  {} experience", profile.location, profile.experience),
        Style::default().fg(palette.muted),
      )),
    ];
    if let Some(synced) = self.profile.synced_at() {
      let stamp = synced.with_timezone(&Local).format("%H:%M");
      lines[2].spans.push(Span::styled(
        format!("  ·  synced {}", stamp),
        Style::default().fg(palette.muted),
      ));
    }
    frame.render_widget(Paragraph::new(lines), area);
  }

  fn render_stats(&self, frame: &mut Frame, area: Rect, stats: &[Stat], palette: &Palette) {
    if stats.is_empty() {
      return;
    }
    let columns = Layout::default()
      .direction(Direction::Horizontal)
      .constraints(vec![Constraint::Ratio(1, stats.len() as u32); stats.len()])
      .split(area);

    for (stat, column) in stats.iter().zip(columns.iter()) {
      let lines = vec![
        Line::from(Span::styled(
          stat.value.clone(),
          Style::default().fg(palette.highlight).bold(),
        )),
        Line::from(Span::styled(
          stat.label.clone(),
          Style::default().fg(palette.muted),
        )),
      ];
      let card = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
          Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.muted)),
        );
      frame.render_widget(card, *column);
    }
  }

  fn overview_lines(profile: &Profile, palette: &Palette) -> Vec<Line<'static>> {
    let heading = |text: &'static str| {
      Line::from(Span::styled(text, Style::default().fg(palette.text).bold()))
    };
    let label = Style::default().fg(palette.muted);

    let skills: Vec<Span> = SKILLS
      .iter()
      .flat_map(|skill| {
        [
          Span::styled(format!(" {} ", skill), Style::default().bg(palette.selection)),
          Span::raw(" "),
        ]
      })
      .collect();

    vec![
      heading("About"),
      Line::from(profile.bio.clone()),
      Line::default(),
      heading("Contact Information"),
      Line::from(vec![Span::styled("Email     ", label), Span::raw(profile.email.clone())]),
      Line::from(vec![Span::styled("Phone     ", label), Span::raw(profile.phone.clone())]),
      Line::from(vec![
        Span::styled("Location  ", label),
        Span::raw(profile.location.clone()),
      ]),
      Line::default(),
      heading("Education"),
      Line::from(profile.education.clone()),
      Line::default(),
      heading("Skills"),
      Line::from(skills),
    ]
  }

  fn application_lines(
    &self,
    applications: &[Application],
    palette: &Palette,
  ) -> Vec<Line<'static>> {
    if self.applications.loading() {
      return vec![Line::from(Span::styled(
        "Loading applications...",
        Style::default().fg(palette.muted),
      ))];
    }
    if applications.is_empty() {
      return vec![Line::from(Span::styled(
        "No applications found.",
        Style::default().fg(palette.muted),
      ))];
    }

    applications
      .iter()
      .flat_map(|app| {
        [
          Line::from(vec![
            Span::styled(
              format!("{:<32}", app.position),
              Style::default().fg(palette.text).bold(),
            ),
            Span::styled(
              format!(" {} ", app.status),
              Style::default()
                .fg(Color::Black)
                .bg(status_color(&app.status_color)),
            ),
          ]),
          Line::from(Span::styled(
            format!("{}  ·  Applied on {}", app.company, app.date),
            Style::default().fg(palette.muted),
          )),
          Line::default(),
        ]
      })
      .collect()
  }

  fn render_tabs(&self, frame: &mut Frame, area: Rect, profile: &Profile, palette: &Palette) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([Constraint::Length(1), Constraint::Min(1)])
      .split(area);

    let tabs = Tabs::new(TABS.iter().map(|tab| tab.title()))
      .select(self.tab)
      .style(Style::default().fg(palette.muted))
      .highlight_style(Style::default().fg(palette.accent).bold().underlined());
    frame.render_widget(tabs, chunks[0]);

    let lines = match TABS[self.tab] {
      Tab::Overview => Self::overview_lines(profile, palette),
      Tab::Applications => self.application_lines(&self.applications.applications(), palette),
      Tab::Saved => vec![Line::from(Span::styled(
        "Your saved jobs will appear here.",
        Style::default().fg(palette.muted),
      ))],
    };
    frame.render_widget(
      Paragraph::new(lines).wrap(Wrap { trim: true }),
      chunks[1].inner(Margin::new(1, 1)),
    );
  }
}

impl View for ProfileView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match self.editor.handle_key(key) {
      KeyResult::Event(ProfileFormEvent::Save(patch)) => {
        self.save(patch);
        return ViewAction::None;
      }
      KeyResult::Event(ProfileFormEvent::Cancelled) | KeyResult::Handled => {
        return ViewAction::None
      }
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('e') => {
        if let Some(profile) = self.profile.profile() {
          self.editor.open(&profile);
        }
      }
      KeyCode::Tab | KeyCode::Char('l') | KeyCode::Right => {
        self.tab = (self.tab + 1) % TABS.len();
      }
      KeyCode::BackTab | KeyCode::Char('h') | KeyCode::Left => {
        self.tab = (self.tab + TABS.len() - 1) % TABS.len();
      }
      KeyCode::Char('r') => self.retry(),
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, palette: &Palette) {
    let error = self.profile.error().or_else(|| self.applications.error());
    if let Some(error) = error.filter(|_| !self.editor.is_active()) {
      let text = format!("Something went wrong\n\n{}\n\nPress 'r' to retry.", error);
      self.render_message(frame, area, text, Color::Red, palette);
      return;
    }

    let Some(profile) = self.profile.profile() else {
      let text = "Loading profile...\n\nPlease wait while we fetch your information".to_string();
      self.render_message(frame, area, text, palette.muted, palette);
      return;
    };

    let title = if self.profile.loading() {
      " Profile (refreshing...) "
    } else {
      " Profile "
    };
    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(palette.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(3), // Header
        Constraint::Length(4), // Stats
        Constraint::Min(1),    // Tabs
      ])
      .split(inner);

    self.render_header(frame, chunks[0], &profile, palette);
    self.render_stats(frame, chunks[1], &self.profile.stats(), palette);
    self.render_tabs(frame, chunks[2], &profile, palette);

    self
      .editor
      .render_overlay(frame, area, palette, self.save.is_loading());
  }

  fn breadcrumb_label(&self) -> String {
    "Profile".to_string()
  }

  fn tick(&mut self) {
    self.settle_save();
  }

  fn captures_input(&self) -> bool {
    self.editor.is_active()
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new(":", "command"),
      Shortcut::new("e", "edit"),
      Shortcut::new("tab", "section"),
      Shortcut::new("r", "refresh"),
      Shortcut::new("q", "back"),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::Resources;
  use crate::config::ServiceConfig;
  use crate::service::MockService;
  use crate::storage::MemoryStore;
  use crate::ui::buffer_text;
  use crossterm::event::KeyModifiers;
  use ratatui::backend::TestBackend;
  use std::sync::Arc;
  use std::time::Duration;
  use tokio::sync::mpsc;

  fn context(service: &MockService) -> ViewContext {
    let (tx, _rx) = mpsc::unbounded_channel();
    ViewContext::new(
      Resources::new(service.clone(), Duration::from_secs(300)),
      Arc::new(MemoryStore::new()),
      tx,
    )
  }

  fn service() -> MockService {
    MockService::new(
      ServiceConfig {
        failure_rate: 0.0,
        latency: false,
      },
      12,
    )
  }

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  async fn loaded(view: &ProfileView) {
    while view.profile.profile().is_none()
      || view.profile.stats().is_empty()
      || view.applications.applications().is_empty()
    {
      tokio::task::yield_now().await;
    }
  }

  #[tokio::test]
  async fn test_loads_everything_on_open() {
    let view = ProfileView::new(context(&service()));
    loaded(&view).await;

    assert_eq!(view.profile.stats().len(), 4);
    assert_eq!(view.applications.applications().len(), 3);
  }

  #[tokio::test]
  async fn test_edit_and_save_reaches_other_views() {
    let ctx = context(&service());
    let header = ctx.resources.profile();
    let mut view = ProfileView::new(ctx);
    loaded(&view).await;

    view.handle_key(key(KeyCode::Char('e')));
    assert!(view.captures_input());
    view.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
    for c in "Ada Lovelace".chars() {
      view.handle_key(key(KeyCode::Char(c)));
    }
    view.handle_key(key(KeyCode::Enter));

    while view.save.is_loading() || view.editor.is_active() {
      tokio::task::yield_now().await;
      view.tick();
    }

    assert_eq!(header.profile().unwrap().name, "Ada Lovelace");
  }

  #[tokio::test]
  async fn test_failed_save_keeps_editor_open() {
    let service = service();
    let mut view = ProfileView::new(context(&service));
    loaded(&view).await;

    service.set_failure_rate(1.0);
    view.handle_key(key(KeyCode::Char('e')));
    view.handle_key(key(KeyCode::Enter));
    while view.save.is_loading() {
      tokio::task::yield_now().await;
      view.tick();
    }

    assert!(view.editor.is_active());
    assert_eq!(view.editor.error(), Some("Failed to update profile"));
  }

  #[tokio::test]
  async fn test_failed_save_is_shown_in_the_form() {
    let service = service();
    let mut view = ProfileView::new(context(&service));
    loaded(&view).await;

    service.set_failure_rate(1.0);
    view.handle_key(key(KeyCode::Char('e')));
    view.handle_key(key(KeyCode::Enter));
    while view.save.is_loading() {
      tokio::task::yield_now().await;
      view.tick();
    }

    let palette = crate::theme::Theme::load(Arc::new(MemoryStore::new())).palette();
    let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
    terminal
      .draw(|frame| view.render(frame, frame.area(), &palette))
      .unwrap();
    let text = buffer_text(terminal.backend().buffer());

    assert!(text.contains("Edit Profile"));
    assert!(text.contains("Failed to update profile"));
    assert!(!text.contains("Something went wrong"));

    // Leaving the form goes back to the loaded page, not an error page
    view.handle_key(key(KeyCode::Esc));
    assert!(!view.captures_input());
    assert_eq!(view.profile.error(), None);
  }

  #[tokio::test]
  async fn test_header_shows_last_sync() {
    let mut view = ProfileView::new(context(&service()));
    loaded(&view).await;

    let palette = crate::theme::Theme::load(Arc::new(MemoryStore::new())).palette();
    let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
    terminal
      .draw(|frame| view.render(frame, frame.area(), &palette))
      .unwrap();
    let text = buffer_text(terminal.backend().buffer());

    assert!(text.contains(" Profile "));
    assert!(text.contains("synced"));
  }
}
