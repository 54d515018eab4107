pub mod components;
pub mod renderfns;
pub mod view;
pub mod views;

use crate::app::App;
use ratatui::prelude::*;
use ratatui::widgets::{Block, ListState};

/// Keep a list selection inside `len` items, selecting the first row when
/// nothing is selected yet
pub fn ensure_valid_selection(state: &mut ListState, len: usize) {
  if len == 0 {
    state.select(None);
    return;
  }
  match state.selected() {
    Some(idx) if idx < len => {}
    Some(_) => state.select(Some(len - 1)),
    None => state.select(Some(0)),
  }
}

/// Rendered buffer as plain text, one line per row
#[cfg(test)]
pub fn buffer_text(buffer: &ratatui::buffer::Buffer) -> String {
  let width = usize::from(buffer.area.width.max(1));
  buffer
    .content()
    .chunks(width)
    .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
    .collect::<Vec<_>>()
    .join("\n")
}

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
  let palette = app.palette();

  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Main content
      Constraint::Length(1), // Footer
    ])
    .split(frame.area());

  frame.render_widget(
    Block::default().style(Style::default().fg(palette.text)),
    frame.area(),
  );

  let shortcuts = app.shortcuts();
  renderfns::draw_header(
    frame,
    chunks[0],
    app.title(),
    &app.initials(),
    &shortcuts,
    &palette,
  );

  if let Some(view) = app.current_view_mut() {
    view.render(frame, chunks[1], &palette);
  }

  let breadcrumb = app.breadcrumb();
  renderfns::draw_footer(frame, chunks[2], &breadcrumb, app.notice(), &palette);

  // Command palette draws over everything
  app.command_input().render_overlay(frame, chunks[1], &palette);
}
