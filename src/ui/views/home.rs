use crate::theme::Palette;
use crate::ui::components::{KeyResult, SearchEvent, SearchInput};
use crate::ui::view::{Shortcut, View, ViewAction, ViewContext};
use crate::ui::views::JobListView;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

pub const POPULAR_SEARCHES: &[&str] = &[
  "Frontend Developer",
  "Product Manager",
  "Data Scientist",
  "UX Designer",
];

const HEADLINE_STATS: &[(&str, &str)] = &[
  ("50K+", "Active Jobs"),
  ("10K+", "Companies"),
  ("1M+", "Job Seekers"),
];

const BROWSE_ALL: &str = "Browse all jobs";

/// Landing screen: pitch, popular searches and headline numbers
pub struct HomeView {
  ctx: ViewContext,
  search: SearchInput,
  list_state: ListState,
}

impl HomeView {
  pub fn new(ctx: ViewContext) -> Self {
    let mut list_state = ListState::default();
    list_state.select(Some(0));
    Self {
      ctx,
      search: SearchInput::new(),
      list_state,
    }
  }

  fn entries() -> impl Iterator<Item = &'static str> {
    POPULAR_SEARCHES.iter().copied().chain(std::iter::once(BROWSE_ALL))
  }

  fn open_jobs(&self, search: &str) -> ViewAction {
    ViewAction::Push(Box::new(JobListView::new(self.ctx.clone(), search)))
  }

  fn render_hero(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
    let lines = vec![
      Line::from(Span::styled(
        "⚡ AI-Powered Job Matching",
        Style::default().fg(palette.highlight),
      )),
      Line::default(),
      Line::from(vec![
        Span::styled("Find Your Next", Style::default().fg(palette.text).bold()),
        Span::styled(" Dream Job", Style::default().fg(palette.accent).bold()),
      ]),
      Line::default(),
      Line::from(Span::styled(
        "Connect with top companies and discover opportunities that match your skills, \
         experience, and career goals with our intelligent job matching system.",
        Style::default().fg(palette.muted),
      )),
    ];

    let hero = Paragraph::new(lines)
      .alignment(Alignment::Center)
      .wrap(Wrap { trim: true });
    frame.render_widget(hero, area);
  }

  fn render_searches(&mut self, frame: &mut Frame, area: Rect, palette: &Palette) {
    let items: Vec<ListItem> = Self::entries()
      .map(|entry| {
        let style = if entry == BROWSE_ALL {
          Style::default().fg(palette.accent)
        } else {
          Style::default().fg(palette.text)
        };
        ListItem::new(Span::styled(entry, style))
      })
      .collect();

    let list = List::new(items)
      .block(
        Block::default()
          .title(" Popular searches ")
          .borders(Borders::ALL)
          .border_style(Style::default().fg(palette.border)),
      )
      .highlight_style(
        Style::default()
          .bg(palette.selection)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }

  fn render_stats(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
    let columns = Layout::default()
      .direction(Direction::Horizontal)
      .constraints([Constraint::Ratio(1, 3); 3])
      .split(area);

    for ((number, label), column) in HEADLINE_STATS.iter().zip(columns.iter()) {
      let lines = vec![
        Line::from(Span::styled(
          *number,
          Style::default().fg(palette.highlight).bold(),
        )),
        Line::from(Span::styled(*label, Style::default().fg(palette.muted))),
      ];
      frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        *column,
      );
    }
  }
}

impl View for HomeView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match self.search.handle_key(key) {
      KeyResult::Event(SearchEvent::Submitted(query)) => return self.open_jobs(&query),
      KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Enter => {
        let selected = self
          .list_state
          .selected()
          .and_then(|idx| Self::entries().nth(idx));
        match selected {
          Some(BROWSE_ALL) => return self.open_jobs(""),
          Some(term) => return self.open_jobs(term),
          None => {}
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, palette: &Palette) {
    let width = area.width.min(90);
    let area = Rect::new(area.x + (area.width - width) / 2, area.y, width, area.height);

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1), // Spacing
        Constraint::Length(6), // Hero
        Constraint::Length(1), // Search hint
        Constraint::Length(7), // Popular searches
        Constraint::Length(1), // Spacing
        Constraint::Length(2), // Stats
        Constraint::Min(0),
      ])
      .split(area);

    self.render_hero(frame, chunks[1], palette);

    let hint = Line::from(vec![
      Span::styled("Press ", Style::default().fg(palette.muted)),
      Span::styled("/", Style::default().fg(palette.accent).bold()),
      Span::styled(
        " to search by job title, keywords, or company",
        Style::default().fg(palette.muted),
      ),
    ]);
    frame.render_widget(Paragraph::new(hint).alignment(Alignment::Center), chunks[2]);

    self.render_searches(frame, chunks[3], palette);
    self.render_stats(frame, chunks[5], palette);

    self.search.render_overlay(frame, chunks[3], palette);
  }

  fn breadcrumb_label(&self) -> String {
    "Home".to_string()
  }

  fn captures_input(&self) -> bool {
    self.search.is_active()
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new(":", "command"),
      Shortcut::new("/", "search"),
      Shortcut::new("enter", "open"),
      Shortcut::new("q", "quit"),
    ]
  }
}
