//! Light/dark palette, remembered across runs.

use ratatui::style::Color;
use std::sync::Arc;
use tracing::info;

use crate::storage::{keys, Initial, KeyValueStore, Persisted};

/// Colors the views draw with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
  pub text: Color,
  pub muted: Color,
  pub accent: Color,
  pub highlight: Color,
  pub border: Color,
  pub bar: Color,
  pub selection: Color,
}

const LIGHT: Palette = Palette {
  text: Color::Black,
  muted: Color::DarkGray,
  accent: Color::Blue,
  highlight: Color::Magenta,
  border: Color::Blue,
  bar: Color::Gray,
  selection: Color::Gray,
};

const DARK: Palette = Palette {
  text: Color::White,
  muted: Color::DarkGray,
  accent: Color::Cyan,
  highlight: Color::Yellow,
  border: Color::Blue,
  bar: Color::Black,
  selection: Color::DarkGray,
};

#[derive(Debug)]
pub struct Theme {
  dark: Persisted<bool>,
}

impl Theme {
  pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
    Self {
      dark: Persisted::load(store, keys::DARK_MODE, Initial::Value(false)),
    }
  }

  pub fn is_dark(&self) -> bool {
    *self.dark.get()
  }

  pub fn toggle(&mut self) {
    self.dark.update(|dark| !dark);
    info!(dark = self.is_dark(), "Theme toggled");
  }

  pub fn palette(&self) -> Palette {
    if self.is_dark() {
      DARK
    } else {
      LIGHT
    }
  }

  pub fn name(&self) -> &'static str {
    if self.is_dark() {
      "dark"
    } else {
      "light"
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::storage::MemoryStore;

  #[test]
  fn test_defaults_to_light() {
    let theme = Theme::load(Arc::new(MemoryStore::new()));
    assert!(!theme.is_dark());
    assert_eq!(theme.palette(), LIGHT);
  }

  #[test]
  fn test_toggle_is_remembered() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut theme = Theme::load(store.clone());
    theme.toggle();

    assert_eq!(store.get(keys::DARK_MODE).unwrap().as_deref(), Some("true"));
    assert!(Theme::load(store).is_dark());
  }

  #[test]
  fn test_garbage_flag_falls_back_to_light() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    store.set(keys::DARK_MODE, "maybe").unwrap();
    assert_eq!(Theme::load(store).name(), "light");
  }
}
