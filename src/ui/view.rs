use crate::api::Resources;
use crate::event::Event;
use crate::storage::KeyValueStore;
use crate::theme::Palette;
use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use std::sync::Arc;
use tokio::sync::mpsc;

/// A keyboard shortcut hint for display in the header
#[derive(Debug, Clone)]
pub struct Shortcut {
  pub key: &'static str,
  pub label: &'static str,
}

impl Shortcut {
  pub const fn new(key: &'static str, label: &'static str) -> Self {
    Self { key, label }
  }
}

/// Handles shared by every view
#[derive(Clone)]
pub struct ViewContext {
  pub resources: Resources,
  pub store: Arc<dyn KeyValueStore>,
  events: mpsc::UnboundedSender<Event>,
}

impl ViewContext {
  pub fn new(
    resources: Resources,
    store: Arc<dyn KeyValueStore>,
    events: mpsc::UnboundedSender<Event>,
  ) -> Self {
    Self {
      resources,
      store,
      events,
    }
  }

  /// Show a transient message in the footer
  pub fn notify(&self, message: impl Into<String>) {
    // Closed only while shutting down
    let _ = self.events.send(Event::Notice(message.into()));
  }
}

/// Actions that a view can request in response to user input
pub enum ViewAction {
  /// No action needed
  None,
  /// Push a new view onto the stack
  Push(Box<dyn View>),
  /// Pop current view from stack (go back)
  Pop,
}

/// Trait for view behavior
///
/// Views handle their own input modes (search, edit, etc.) and return
/// actions for the App to execute. This creates a clean delegation chain:
/// App → View → Components
///
/// Views start their loads on a resource handle and read its state when
/// rendering; one-shot outcomes go through a Query<T> polled in tick().
pub trait View {
  /// Handle a key event, returning an action for App to execute
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction;

  /// Render the view to the frame
  fn render(&mut self, frame: &mut Frame, area: Rect, palette: &Palette);

  /// Get the breadcrumb label for this view
  fn breadcrumb_label(&self) -> String;

  /// Called on each tick to allow views to poll async queries
  fn tick(&mut self) {}

  /// True while an overlay or text field owns the keyboard, so global
  /// bindings (`:`, `q`) are passed through to the view instead
  fn captures_input(&self) -> bool {
    false
  }

  /// Get keyboard shortcuts to display in the header
  /// Override this to provide view-specific shortcuts
  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![Shortcut::new(":", "command"), Shortcut::new("q", "back")]
  }
}
