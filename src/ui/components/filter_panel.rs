use super::KeyResult;
use crate::service::types::{ExperienceLevel, JobQuery, JobType};
use crate::theme::Palette;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Events emitted by the filter panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
  /// Filters confirmed; the listing should reload from page 1
  Applied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
  JobType,
  Experience,
  Remote,
}

const ROWS: [Row; 3] = [Row::JobType, Row::Experience, Row::Remote];

/// Structured job filters, edited in an overlay opened with `f`.
///
/// Edits apply to a draft; Enter commits it, Escape throws it away.
#[derive(Debug, Clone, Default)]
pub struct FilterPanel {
  active: bool,
  row: usize,
  applied: Filters,
  draft: Filters,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Filters {
  job_type: Option<JobType>,
  experience: Option<ExperienceLevel>,
  remote: bool,
}

/// Step through `None` ("All") followed by every option, wrapping around
fn cycle<T: Copy + PartialEq>(current: Option<T>, options: &[T], forward: bool) -> Option<T> {
  let slots = options.len() + 1;
  let idx = match current {
    None => 0,
    Some(value) => options.iter().position(|o| *o == value).map_or(0, |i| i + 1),
  };
  let next = if forward {
    (idx + 1) % slots
  } else {
    (idx + slots - 1) % slots
  };
  next.checked_sub(1).map(|i| options[i])
}

impl FilterPanel {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  /// Copy the committed filters onto `query`, leaving search and paging alone
  pub fn apply_to(&self, query: &mut JobQuery) {
    query.job_type = self.applied.job_type;
    query.experience = self.applied.experience;
    query.remote = self.applied.remote;
  }

  /// Number of committed filters, for the list title
  pub fn active_count(&self) -> usize {
    let f = &self.applied;
    usize::from(f.job_type.is_some()) + usize::from(f.experience.is_some()) + usize::from(f.remote)
  }

  fn step(&mut self, forward: bool) {
    match ROWS[self.row] {
      Row::JobType => self.draft.job_type = cycle(self.draft.job_type, &JobType::ALL, forward),
      Row::Experience => {
        self.draft.experience = cycle(self.draft.experience, &ExperienceLevel::ALL, forward)
      }
      Row::Remote => self.draft.remote = !self.draft.remote,
    }
  }

  /// Handle a key event
  /// Call this regardless of active state - it handles activation too
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<FilterEvent> {
    if !self.active {
      if key.code == KeyCode::Char('f') {
        self.active = true;
        self.draft = self.applied;
        self.row = 0;
        return KeyResult::Handled;
      }
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Esc => self.active = false,
      KeyCode::Enter => {
        self.active = false;
        self.applied = self.draft;
        return KeyResult::Event(FilterEvent::Applied);
      }
      KeyCode::Up | KeyCode::Char('k') => self.row = (self.row + ROWS.len() - 1) % ROWS.len(),
      KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => self.row = (self.row + 1) % ROWS.len(),
      KeyCode::Left | KeyCode::Char('h') => self.step(false),
      KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => self.step(true),
      KeyCode::Char('c') => self.draft = Filters::default(),
      _ => {}
    }
    KeyResult::Handled
  }

  /// Render the filter overlay if active
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
    if !self.active {
      return;
    }

    let width = 72.min(area.width.saturating_sub(2));
    let overlay_area = Rect::new(area.x + 1, area.y + 1, width, 7).intersection(area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(palette.highlight))
      .title(" Filters ")
      .title_bottom(Line::from(" ←/→ change  ↑/↓ field  c clear  Enter apply ").right_aligned());

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let job_types: Vec<&str> = JobType::ALL.iter().map(|t| t.label()).collect();
    let levels: Vec<&str> = ExperienceLevel::ALL.iter().map(|l| l.label()).collect();

    let lines = vec![
      self.tabs_line(
        "Job Type",
        &job_types,
        self.draft.job_type.map(JobType::label),
        0,
        palette,
      ),
      self.tabs_line(
        "Experience",
        &levels,
        self.draft.experience.map(ExperienceLevel::label),
        1,
        palette,
      ),
      self.tabs_line(
        "Remote",
        &["Remote only"],
        self.draft.remote.then_some("Remote only"),
        2,
        palette,
      ),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
  }

  /// One filter row as tabs: "All" followed by each option
  fn tabs_line<'a>(
    &self,
    label: &'a str,
    options: &[&'a str],
    selected: Option<&str>,
    row: usize,
    palette: &Palette,
  ) -> Line<'a> {
    let label_style = if self.row == row {
      Style::default().fg(palette.highlight).bold()
    } else {
      Style::default().fg(palette.muted)
    };
    let tab = |active: bool| {
      if active {
        Style::default().fg(Color::Black).bg(palette.accent)
      } else {
        Style::default().fg(palette.text)
      }
    };

    let mut spans = vec![
      Span::styled(format!("{:<11}", label), label_style),
      Span::styled(" All ", tab(selected.is_none())),
    ];
    for option in options {
      spans.push(Span::styled("│", Style::default().fg(palette.muted)));
      spans.push(Span::styled(
        format!(" {} ", option),
        tab(selected == Some(*option)),
      ));
    }
    Line::from(spans)
  }
}
