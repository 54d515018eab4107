use crate::api::{JobActions, JobsResource};
use crate::query::{Query, QueryState};
use crate::service::types::{ApplyReceipt, Job, SaveReceipt};
use crate::theme::Palette;
use crate::ui::renderfns::match_quality;
use crate::ui::view::{Shortcut, View, ViewAction, ViewContext};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Full posting with save and apply actions.
///
/// Save and apply flip their badge as soon as the key is pressed and flip it
/// back if the service call fails.
pub struct JobDetailView {
  ctx: ViewContext,
  id: String,
  jobs: JobsResource,
  actions: JobActions,
  job: Query<Job>,
  save: Query<SaveReceipt>,
  apply: Query<ApplyReceipt>,
  saved: bool,
  applied: bool,
  scroll: u16,
}

impl JobDetailView {
  pub fn new(ctx: ViewContext, id: String) -> Self {
    let mut view = Self {
      jobs: ctx.resources.jobs(),
      actions: ctx.resources.actions(),
      ctx,
      id,
      job: Query::new(),
      save: Query::new(),
      apply: Query::new(),
      saved: false,
      applied: false,
      scroll: 0,
    };
    view.fetch();
    view
  }

  fn fetch(&mut self) {
    let jobs = self.jobs.clone();
    let id = self.id.clone();
    self.job.run(async move { jobs.fetch_job(&id).await });
  }

  fn save_job(&mut self) {
    if self.saved || self.save.is_loading() {
      return;
    }
    self.saved = true;
    let actions = self.actions.clone();
    let id = self.id.clone();
    self.save.run(async move { actions.save_job(&id).await });
  }

  fn apply_to_job(&mut self) {
    if self.applied || self.apply.is_loading() {
      return;
    }
    self.applied = true;
    let actions = self.actions.clone();
    let id = self.id.clone();
    self.apply.run(async move { actions.apply_to_job(&id, None).await });
  }

  fn settle_actions(&mut self) {
    if self.save.poll() {
      match self.save.take() {
        Some(Ok(receipt)) => self.ctx.notify(receipt.message),
        Some(Err(e)) => {
          self.saved = false;
          self.ctx.notify(e);
        }
        None => {}
      }
    }

    if self.apply.poll() {
      match self.apply.take() {
        Some(Ok(receipt)) => self.ctx.notify(receipt.message),
        Some(Err(e)) => {
          self.applied = false;
          self.ctx.notify(e);
        }
        None => {}
      }
    }
  }

  fn render_detail(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
    let title = match self.job.state() {
      QueryState::Loading => " Job details (loading...) ".to_string(),
      QueryState::Success(job) if self.actions.loading() => format!(" {} (working...) ", job.title),
      QueryState::Success(job) => format!(" {} ", job.title),
      _ => " Job details ".to_string(),
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(palette.border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if self.job.is_loading() {
      let paragraph = Paragraph::new(
        "Loading job details...\n\nPlease wait while we fetch the job information",
      )
      .style(Style::default().fg(palette.muted));
      frame.render_widget(paragraph, inner);
      return;
    }

    if let Some(error) = self.job.error() {
      let paragraph = Paragraph::new(format!(
        "Job not available\n\n{}\n\nPress 'r' to retry or 'q' to go back.",
        error
      ))
      .style(Style::default().fg(Color::Red));
      frame.render_widget(paragraph, inner);
      return;
    }

    let Some(job) = self.job.data() else {
      return;
    };

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(5), // Header
        Constraint::Length(1), // Separator
        Constraint::Min(1),    // Description
      ])
      .split(inner);

    let label = Style::default().fg(palette.muted);
    let (match_color, match_label) = match_quality(job.compatibility);

    let badge = |on: bool, on_text: &'static str, off_text: &'static str| {
      if on {
        Span::styled(on_text, Style::default().fg(Color::Green).bold())
      } else {
        Span::styled(off_text, Style::default().fg(palette.accent))
      }
    };

    let header = vec![
      Line::from(vec![
        Span::styled(
          format!("[{}] ", job.logo),
          Style::default().fg(palette.highlight).bold(),
        ),
        Span::styled(job.company.clone(), Style::default().fg(palette.accent).bold()),
      ]),
      Line::from(vec![
        Span::styled("Location: ", label),
        Span::raw(job.location.clone()),
        Span::raw("  "),
        Span::styled("Type: ", label),
        Span::raw(job.job_type.label()),
        Span::raw("  "),
        Span::styled("Experience: ", label),
        Span::raw(job.experience.label()),
      ]),
      Line::from(vec![
        Span::styled("Salary: ", label),
        Span::raw(job.salary.clone()),
        Span::raw("  "),
        Span::styled("Posted: ", label),
        Span::raw(job.posted.clone()),
        Span::raw("  "),
        Span::styled(
          format!("{}% {}", job.compatibility, match_label),
          Style::default().fg(match_color),
        ),
      ]),
      Line::from(
        job
          .tags
          .iter()
          .flat_map(|tag| {
            [
              Span::styled(format!(" {} ", tag), Style::default().bg(palette.selection)),
              Span::raw(" "),
            ]
          })
          .collect::<Vec<_>>(),
      ),
      Line::from(vec![
        badge(self.saved, "✓ Saved", "<s> Save job"),
        Span::raw("   "),
        badge(self.applied, "✓ Applied", "<a> Apply now"),
      ]),
    ];
    frame.render_widget(Paragraph::new(header), chunks[0]);

    let sep = Paragraph::new("─".repeat(chunks[1].width as usize)).style(label);
    frame.render_widget(sep, chunks[1]);

    let body = vec![
      Line::from(Span::styled(
        "Job Description",
        Style::default().fg(palette.text).bold(),
      )),
      Line::default(),
      Line::from(job.description.clone()),
      Line::default(),
      Line::from(Span::styled(
        format!("About {}", job.company),
        Style::default().fg(palette.text).bold(),
      )),
      Line::default(),
      Line::from(format!(
        "{} is hiring for this {} role in {}.",
        job.company,
        job.job_type.label().to_lowercase(),
        job.location
      )),
    ];
    let desc = Paragraph::new(body)
      .wrap(Wrap { trim: true })
      .scroll((self.scroll, 0));
    frame.render_widget(desc, chunks[2]);
  }
}

impl View for JobDetailView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('s') if self.job.data().is_some() => self.save_job(),
      KeyCode::Char('a') if self.job.data().is_some() => self.apply_to_job(),
      KeyCode::Char('r') if !self.job.is_loading() => self.fetch(),
      KeyCode::Char('j') | KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
      KeyCode::Char('k') | KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, palette: &Palette) {
    self.render_detail(frame, area, palette);
  }

  fn breadcrumb_label(&self) -> String {
    match self.job.data() {
      Some(job) => job.title.clone(),
      None => format!("Job #{}", self.id),
    }
  }

  fn tick(&mut self) {
    self.job.poll();
    self.settle_actions();
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new("s", "save"),
      Shortcut::new("a", "apply"),
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
  use crate::event::Event;
  use crate::service::MockService;
  use crate::storage::MemoryStore;
  use crossterm::event::KeyModifiers;
  use std::sync::Arc;
  use std::time::Duration;
  use tokio::sync::mpsc;

  fn view_with(
    service: &MockService,
    id: &str,
  ) -> (JobDetailView, mpsc::UnboundedReceiver<Event>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let ctx = ViewContext::new(
      Resources::new(service.clone(), Duration::from_secs(300)),
      Arc::new(MemoryStore::new()),
      tx,
    );
    (JobDetailView::new(ctx, id.to_string()), rx)
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

  fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
  }

  async fn tick_until(view: &mut JobDetailView, done: impl Fn(&JobDetailView) -> bool) {
    while !done(view) {
      tokio::task::yield_now().await;
      view.tick();
    }
  }

  #[tokio::test]
  async fn test_loads_job() {
    let (mut view, _rx) = view_with(&service(), "3");
    tick_until(&mut view, |v| !v.job.is_loading()).await;

    assert_eq!(view.breadcrumb_label(), "Frontend Engineer");
  }

  #[tokio::test]
  async fn test_unknown_job_shows_error() {
    let (mut view, _rx) = view_with(&service(), "999");
    tick_until(&mut view, |v| !v.job.is_loading()).await;

    assert_eq!(view.job.error(), Some("Job not found"));
    assert_eq!(view.breadcrumb_label(), "Job #999");
  }

  #[tokio::test]
  async fn test_save_is_optimistic() {
    let (mut view, mut rx) = view_with(&service(), "1");
    tick_until(&mut view, |v| !v.job.is_loading()).await;

    view.handle_key(key('s'));
    assert!(view.saved);
    tick_until(&mut view, |v| !v.save.is_loading()).await;

    assert!(view.saved);
    assert!(matches!(rx.try_recv(), Ok(Event::Notice(_))));
  }

  #[tokio::test]
  async fn test_failed_apply_reverts() {
    let service = service();
    let (mut view, mut rx) = view_with(&service, "1");
    tick_until(&mut view, |v| !v.job.is_loading()).await;

    service.set_failure_rate(1.0);
    view.handle_key(key('a'));
    assert!(view.applied);
    tick_until(&mut view, |v| !v.apply.is_loading()).await;

    assert!(!view.applied);
    match rx.try_recv() {
      Ok(Event::Notice(message)) => assert_eq!(message, "Failed to apply to job"),
      other => panic!("expected notice, got {:?}", other),
    }
  }
}
