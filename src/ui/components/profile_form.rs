use super::input::{InputResult, TextInput};
use super::KeyResult;
use crate::forms::{ProfileForm, FIELDS};
use crate::service::types::{Profile, ProfilePatch};
use crate::theme::Palette;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

/// Events emitted by the profile editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileFormEvent {
  Save(ProfilePatch),
  Cancelled,
}

/// Modal editor for the profile. One field is focused at a time and
/// edits go through a `TextInput` that is written back on every key.
#[derive(Debug, Clone, Default)]
pub struct ProfileEditor {
  form: ProfileForm,
  input: TextInput,
  focused: usize,
  active: bool,
  /// Set after a rejected save so errors show on every field
  attempted: bool,
  /// Why the last save failed
  error: Option<String>,
}

impl ProfileEditor {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  pub fn open(&mut self, profile: &Profile) {
    self.form = ProfileForm::from_profile(profile);
    self.focused = 0;
    self.attempted = false;
    self.error = None;
    self.active = true;
    self.load_focused();
  }

  pub fn close(&mut self) {
    self.active = false;
  }

  /// Keep the editor open and show why saving failed
  pub fn fail(&mut self, message: String) {
    self.error = Some(message);
  }

  #[cfg(test)]
  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  #[cfg(test)]
  pub fn form(&self) -> &ProfileForm {
    &self.form
  }

  fn load_focused(&mut self) {
    let key = FIELDS[self.focused].key;
    self.input.set_value(self.form.value(key));
  }

  fn focus(&mut self, index: usize) {
    self.focused = index % FIELDS.len();
    self.load_focused();
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<ProfileFormEvent> {
    if !self.active {
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Tab | KeyCode::Down => {
        self.focus(self.focused + 1);
        return KeyResult::Handled;
      }
      KeyCode::BackTab | KeyCode::Up => {
        self.focus(self.focused + FIELDS.len() - 1);
        return KeyResult::Handled;
      }
      _ => {}
    }

    match self.input.handle_key(key) {
      InputResult::Consumed => {
        self.form.set(FIELDS[self.focused].key, self.input.value());
        KeyResult::Handled
      }
      InputResult::Submitted(_) => {
        if self.form.is_valid() {
          self.error = None;
          KeyResult::Event(ProfileFormEvent::Save(self.form.to_patch()))
        } else {
          self.attempted = true;
          KeyResult::Handled
        }
      }
      InputResult::Cancelled => {
        self.active = false;
        KeyResult::Event(ProfileFormEvent::Cancelled)
      }
      InputResult::NotHandled => KeyResult::Handled,
    }
  }

  pub fn render_overlay(&self, frame: &mut Frame, area: Rect, palette: &Palette, saving: bool) {
    if !self.active {
      return;
    }

    let width = 70.min(area.width.saturating_sub(4));
    let height = (FIELDS.len() as u16 * 2 + 4).min(area.height.saturating_sub(2));
    let overlay_area = Rect::new(
      area.x + (area.width.saturating_sub(width)) / 2,
      area.y + (area.height.saturating_sub(height)) / 2,
      width,
      height,
    );
    frame.render_widget(Clear, overlay_area);

    let footer = if saving {
      Line::from(" Saving... ")
    } else if let Some(error) = &self.error {
      Line::from(Span::styled(
        format!(" {} ", error),
        Style::default().fg(Color::Red),
      ))
    } else if self.form.is_valid() {
      Line::from(" Tab next  Enter save  Esc cancel ")
    } else {
      Line::from(" Tab next  Esc cancel  (fix errors to save) ")
    };

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(palette.highlight))
      .title(" Edit Profile ")
      .title_bottom(footer.right_aligned());
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let mut lines = Vec::new();
    for (idx, field) in FIELDS.iter().enumerate() {
      let focused = idx == self.focused;
      let label_style = if focused {
        Style::default().fg(palette.highlight).bold()
      } else {
        Style::default().fg(palette.muted)
      };
      let marker = if field.required { "*" } else { " " };

      let mut spans = vec![
        Span::styled(format!("{:<12}{} ", field.label, marker), label_style),
        Span::styled(
          self.form.value(field.key).to_string(),
          Style::default().fg(palette.text),
        ),
      ];
      if focused {
        spans.push(Span::styled("_", Style::default().fg(palette.highlight)));
      }
      lines.push(Line::from(spans));

      let show_error = focused || self.attempted;
      let error = show_error.then(|| self.form.field_error(field.key)).flatten();
      lines.push(match error {
        Some(message) => Line::from(Span::styled(
          format!("{:14}{}", "", message),
          Style::default().fg(Color::Red),
        )),
        None => Line::default(),
      });
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::service::data;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
  }

  #[test]
  fn test_edits_write_back_to_focused_field() {
    let mut editor = ProfileEditor::new();
    editor.open(&data::profile());
    editor.handle_key(ctrl('u'));
    for c in "Ada".chars() {
      editor.handle_key(key(KeyCode::Char(c)));
    }

    assert_eq!(editor.form().value("name"), "Ada");
  }

  #[test]
  fn test_invalid_form_does_not_save() {
    let mut editor = ProfileEditor::new();
    editor.open(&data::profile());
    editor.handle_key(key(KeyCode::Tab));
    editor.handle_key(key(KeyCode::Tab));
    editor.handle_key(ctrl('u'));
    for c in "nope".chars() {
      editor.handle_key(key(KeyCode::Char(c)));
    }

    assert_eq!(editor.handle_key(key(KeyCode::Enter)), KeyResult::Handled);
    assert_eq!(
      editor.form().field_error("email").as_deref(),
      Some("Please enter a valid email address")
    );
  }

  #[test]
  fn test_valid_form_saves_patch() {
    let profile = data::profile();
    let mut editor = ProfileEditor::new();
    editor.open(&profile);

    match editor.handle_key(key(KeyCode::Enter)) {
      KeyResult::Event(ProfileFormEvent::Save(patch)) => {
        assert_eq!(patch.merge_into(&profile), profile);
      }
      other => panic!("expected save, got {:?}", other),
    }
  }

  #[test]
  fn test_failure_clears_on_reopen() {
    let profile = data::profile();
    let mut editor = ProfileEditor::new();
    editor.open(&profile);
    editor.fail("Failed to update profile".to_string());
    assert_eq!(editor.error(), Some("Failed to update profile"));

    editor.open(&profile);
    assert_eq!(editor.error(), None);
  }

  #[test]
  fn test_escape_cancels() {
    let mut editor = ProfileEditor::new();
    editor.open(&data::profile());
    assert_eq!(
      editor.handle_key(key(KeyCode::Esc)),
      KeyResult::Event(ProfileFormEvent::Cancelled)
    );
    assert!(!editor.is_active());
  }
}
