use ratatui::prelude::Color;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Terminal color for an application's status badge
pub fn status_color(color: &str) -> Color {
  match color {
    "blue" => Color::Blue,
    "orange" => Color::LightRed,
    "green" => Color::Green,
    "red" => Color::Red,
    _ => Color::Gray,
  }
}

/// Color and label for a job's profile match percentage
pub fn match_quality(compatibility: u8) -> (Color, &'static str) {
  match compatibility {
    70.. => (Color::Green, "Excellent Match"),
    40..=69 => (Color::Yellow, "Good Match"),
    _ => (Color::Red, "Fair Match"),
  }
}
