use crate::api::JobsResource;
use crate::service::types::{Job, JobQuery};
use crate::theme::Palette;
use crate::ui::components::{FilterEvent, FilterPanel, KeyResult, SearchEvent, SearchInput};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{match_quality, truncate};
use crate::ui::view::{Shortcut, View, ViewAction, ViewContext};
use crate::ui::views::JobDetailView;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

/// Paged, searchable job listing
pub struct JobListView {
  ctx: ViewContext,
  jobs: JobsResource,
  params: JobQuery,
  search: SearchInput,
  filters: FilterPanel,
  list_state: ListState,
}

impl JobListView {
  /// Listing for `search`; an empty search lists every job
  pub fn new(ctx: ViewContext, search: &str) -> Self {
    let view = Self {
      jobs: ctx.resources.jobs(),
      ctx,
      params: JobQuery::default().page(1),
      search: SearchInput::with_query(search.trim()),
      filters: FilterPanel::new(),
      list_state: ListState::default(),
    };
    view.load();
    view
  }

  /// Fetch the current page in the background; the outcome lands in the
  /// resource state read by `render`
  fn load(&self) {
    let jobs = self.jobs.clone();
    let params = self.params.clone();
    let query = self.search.query().to_string();

    tokio::spawn(async move {
      // Failures are logged and kept in the resource's error state
      let _ = if query.is_empty() {
        jobs.fetch_jobs(params).await
      } else {
        jobs.search_jobs(&query, params).await
      };
    });
  }

  fn reload_from_first_page(&mut self) {
    self.params.page = Some(1);
    self.list_state.select(Some(0));
    self.load();
  }

  fn change_page(&mut self, forward: bool) {
    let Some(pagination) = self.jobs.pagination() else {
      return;
    };
    let page = match (forward, pagination.has_next, pagination.has_prev) {
      (true, true, _) => pagination.page + 1,
      (false, _, true) => pagination.page - 1,
      _ => return,
    };
    self.params.page = Some(page);
    self.list_state.select(Some(0));
    self.load();
  }

  fn selected_job(&self) -> Option<Job> {
    let idx = self.list_state.selected()?;
    self.jobs.jobs().into_iter().nth(idx)
  }

  /// Nothing has come back yet for this view
  fn awaiting_first_page(&self) -> bool {
    self.jobs.pagination().is_none() && self.jobs.error().is_none()
  }

  fn title(&self) -> String {
    let heading = if self.search.query().is_empty() {
      "Featured Jobs".to_string()
    } else {
      format!("Search Results for \"{}\"", self.search.query())
    };
    let filters = match self.filters.active_count() {
      0 => String::new(),
      n => format!(" [{} filter{}]", n, if n == 1 { "" } else { "s" }),
    };

    if self.jobs.loading() || self.awaiting_first_page() {
      return format!(" {}{} (loading...) ", heading, filters);
    }

    let total = self
      .jobs
      .pagination()
      .map_or(self.jobs.jobs().len() as u32, |p| p.total);
    format!(
      " {}{} ({} job{} found) ",
      heading,
      filters,
      total,
      if total == 1 { "" } else { "s" }
    )
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect, palette: &Palette) {
    let jobs = self.jobs.jobs();
    ensure_valid_selection(&mut self.list_state, jobs.len());

    let block = Block::default()
      .title(self.title())
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(palette.border));

    let message = if let Some(error) = self.jobs.error() {
      Some((
        format!("Something went wrong\n\n{}\n\nPress 'r' to try again.", error),
        Color::Red,
      ))
    } else if self.jobs.loading() || self.awaiting_first_page() {
      Some((
        "Loading jobs...\n\nPlease wait while we fetch the latest opportunities".to_string(),
        palette.muted,
      ))
    } else if jobs.is_empty() {
      Some((
        "No jobs found\n\nTry adjusting your search criteria or filters to find more results."
          .to_string(),
        palette.muted,
      ))
    } else {
      None
    };

    if let Some((content, color)) = message {
      let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(color));
      frame.render_widget(paragraph, area);
      return;
    }

    let items: Vec<ListItem> = jobs
      .iter()
      .map(|job| {
        let (color, _) = match_quality(job.compatibility);
        let line = Line::from(vec![
          Span::styled(
            format!("{:>3}% ", job.compatibility),
            Style::default().fg(color),
          ),
          Span::styled(
            format!("{:<32}", truncate(&job.title, 32)),
            Style::default().fg(palette.text).bold(),
          ),
          Span::raw(" "),
          Span::styled(
            format!("{:<20}", truncate(&job.company, 20)),
            Style::default().fg(palette.accent),
          ),
          Span::raw(" "),
          Span::styled(
            format!("{:<18}", truncate(&job.location, 18)),
            Style::default().fg(palette.muted),
          ),
          Span::raw(" "),
          Span::styled(
            format!("{:<11}", job.job_type.label()),
            Style::default().fg(palette.muted),
          ),
          Span::raw(job.salary.clone()),
        ]);
        ListItem::new(line)
      })
      .collect();

    let list = List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(palette.selection)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }

  fn render_pagination(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
    let Some(pagination) = self.jobs.pagination() else {
      return;
    };
    if pagination.total_pages <= 1 {
      return;
    }

    let key_style = |enabled: bool| {
      if enabled {
        Style::default().fg(palette.accent)
      } else {
        Style::default().fg(palette.muted)
      }
    };

    let line = Line::from(vec![
      Span::styled("<[> previous", key_style(pagination.has_prev)),
      Span::styled(
        format!("   Page {} of {}   ", pagination.page, pagination.total_pages),
        Style::default().fg(palette.text),
      ),
      Span::styled("<]> next", key_style(pagination.has_next)),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
  }
}

impl View for JobListView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    // Let overlay components try to handle first
    match self.search.handle_key(key) {
      KeyResult::Event(SearchEvent::Submitted(_)) => {
        self.reload_from_first_page();
        return ViewAction::None;
      }
      KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    match self.filters.handle_key(key) {
      KeyResult::Event(FilterEvent::Applied) => {
        self.filters.apply_to(&mut self.params);
        self.reload_from_first_page();
        return ViewAction::None;
      }
      KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => {
        self.list_state.select_next();
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.list_state.select_previous();
      }
      KeyCode::Char(']') | KeyCode::Right => self.change_page(true),
      KeyCode::Char('[') | KeyCode::Left => self.change_page(false),
      KeyCode::Char('r') => {
        self.jobs.clear_error();
        self.jobs.clear_cache();
        self.load();
      }
      KeyCode::Enter => {
        if let Some(job) = self.selected_job() {
          return ViewAction::Push(Box::new(JobDetailView::new(self.ctx.clone(), job.id)));
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, palette: &Palette) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([Constraint::Min(3), Constraint::Length(1)])
      .split(area);

    self.render_list(frame, chunks[0], palette);
    self.render_pagination(frame, chunks[1], palette);

    self.filters.render_overlay(frame, area, palette);
    self.search.render_overlay(frame, area, palette);
  }

  fn breadcrumb_label(&self) -> String {
    match self.search.query() {
      "" => "Jobs".to_string(),
      query => format!("Jobs [{}]", query),
    }
  }

  fn captures_input(&self) -> bool {
    self.search.is_active() || self.filters.is_active()
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new(":", "command"),
      Shortcut::new("/", "search"),
      Shortcut::new("f", "filters"),
      Shortcut::new("[/]", "page"),
      Shortcut::new("r", "refresh"),
      Shortcut::new("q", "back"),
    ]
  }
}
