//! Job assistant chat transcript, kept in local storage.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::service::types::ChatReply;
use crate::storage::{keys, Initial, KeyValueStore, Persisted};

pub const WELCOME_MESSAGE: &str = "Hi! I'm your AI job assistant. I can help you find jobs, \
improve your profile, or answer questions about your job search. How can I help you today?";

/// Shown in place of a reply when the assistant call fails
pub const APOLOGY: &str =
  "Sorry, I'm having trouble responding right now. Please try again later.";

/// Canned prompts offered under the transcript
pub const QUICK_ACTIONS: &[&str] = &[
  "Find frontend jobs",
  "Improve my profile",
  "Interview tips",
  "Salary research",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
  User,
  Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
  pub id: String,
  pub text: String,
  pub sender: Sender,
  pub timestamp: String,
}

fn welcome() -> Vec<ChatMessage> {
  vec![ChatMessage {
    id: "1".to_string(),
    text: WELCOME_MESSAGE.to_string(),
    sender: Sender::Bot,
    timestamp: Utc::now().to_rfc3339(),
  }]
}

/// Ordered conversation with the assistant.
///
/// Never empty: a missing, unreadable or empty stored transcript starts over
/// from the welcome message.
#[derive(Debug)]
pub struct ChatTranscript {
  messages: Persisted<Vec<ChatMessage>>,
}

impl ChatTranscript {
  pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
    let mut messages: Persisted<Vec<ChatMessage>> =
      Persisted::load(store, keys::CHAT_MESSAGES, Initial::lazy(welcome));
    if messages.get().is_empty() {
      warn!("Stored chat transcript was empty, starting over");
      messages.set(welcome());
    }
    Self { messages }
  }

  pub fn messages(&self) -> &[ChatMessage] {
    self.messages.get()
  }

  pub fn push_user(&mut self, text: &str) {
    self.push(text.to_string(), Sender::User, Utc::now().to_rfc3339());
  }

  pub fn push_reply(&mut self, reply: &ChatReply) {
    self.push(reply.message.clone(), Sender::Bot, reply.timestamp.clone());
  }

  pub fn push_apology(&mut self) {
    self.push(APOLOGY.to_string(), Sender::Bot, Utc::now().to_rfc3339());
  }

  /// Forget everything but a fresh welcome message.
  pub fn clear(&mut self) {
    self.messages.set(welcome());
  }

  fn push(&mut self, text: String, sender: Sender, timestamp: String) {
    let id = self.next_id();
    self.messages.update(|messages| {
      let mut next = messages.clone();
      next.push(ChatMessage {
        id,
        text,
        sender,
        timestamp,
      });
      next
    });
  }

  /// Millisecond clock, bumped past the last id so ids stay unique
  fn next_id(&self) -> String {
    let now = Utc::now().timestamp_millis();
    let last = self
      .messages()
      .iter()
      .filter_map(|m| m.id.parse::<i64>().ok())
      .max()
      .unwrap_or(0);
    now.max(last + 1).to_string()
  }
}
