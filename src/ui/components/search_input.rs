use super::input::{InputResult, TextInput};
use super::KeyResult;
use crate::theme::Palette;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Events emitted by search input that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
  /// Search submitted with this text (possibly empty, meaning "no search")
  Submitted(String),
}

/// Search box opened with `/`. Escape restores the previous search.
#[derive(Debug, Clone, Default)]
pub struct SearchInput {
  input: TextInput,
  active: bool,
  /// Last submitted text
  applied: String,
}

impl SearchInput {
  pub fn new() -> Self {
    Self::default()
  }

  /// Search box that starts out with `query` applied
  pub fn with_query(query: &str) -> Self {
    Self {
      input: TextInput::with_value(query),
      active: false,
      applied: query.to_string(),
    }
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  /// The search currently in effect
  pub fn query(&self) -> &str {
    &self.applied
  }

  pub fn activate(&mut self) {
    self.active = true;
    self.input.set_value(&self.applied);
  }

  /// Handle a key event
  /// Call this regardless of active state - it handles activation too
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<SearchEvent> {
    if !self.active {
      if key.code == KeyCode::Char('/') {
        self.activate();
        return KeyResult::Handled;
      }
      return KeyResult::NotHandled;
    }

    match self.input.handle_key(key) {
      InputResult::Submitted(text) => {
        self.active = false;
        self.applied = text.trim().to_string();
        KeyResult::Event(SearchEvent::Submitted(self.applied.clone()))
      }
      InputResult::Cancelled => {
        self.active = false;
        self.input.set_value(&self.applied);
        KeyResult::Handled
      }
      InputResult::Consumed | InputResult::NotHandled => KeyResult::Handled,
    }
  }

  /// Render the search overlay if active
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
    if !self.active {
      return;
    }

    let width = (area.width * 60 / 100).clamp(30, 60).min(area.width);
    let overlay_area = Rect::new(area.x + 1, area.y + 1, width, 3).intersection(area);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(palette.highlight))
      .title(" Search jobs ");

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let input_line = Line::from(vec![
      Span::styled("/", Style::default().fg(palette.highlight)),
      Span::raw(self.input.value()),
      Span::styled("_", Style::default().fg(palette.highlight)),
    ]);
    frame.render_widget(Paragraph::new(input_line), inner);
  }
}
