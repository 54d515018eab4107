use crate::theme::Palette;
use crate::ui::view::Shortcut;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the header bar with brand, profile initials, and shortcuts
pub fn draw_header(
  frame: &mut Frame,
  area: Rect,
  title: &str,
  initials: &str,
  shortcuts: &[Shortcut],
  palette: &Palette,
) {
  let avatar = if initials.is_empty() { "··" } else { initials };

  let mut spans = vec![
    Span::styled(format!(" {} ", title), Style::default().fg(palette.accent).bold()),
    Span::styled("│", Style::default().fg(palette.muted)),
    Span::styled(
      format!(" {} ", avatar),
      Style::default().fg(palette.highlight).bold(),
    ),
    Span::raw(" "),
  ];

  // Keys and brackets highlighted, descriptions dimmed
  for shortcut in shortcuts {
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
      format!("<{}>", shortcut.key),
      Style::default().fg(palette.accent),
    ));
    spans.push(Span::styled(
      format!(" {}", shortcut.label),
      Style::default().fg(palette.muted),
    ));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(palette.bar));
  frame.render_widget(paragraph, area);
}
