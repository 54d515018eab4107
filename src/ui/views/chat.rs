use crate::api::ProfileResource;
use crate::assistant::{ChatTranscript, Sender, QUICK_ACTIONS};
use crate::query::Query;
use crate::service::types::ChatReply;
use crate::text::get_initials;
use crate::theme::Palette;
use crate::ui::components::{InputResult, TextInput};
use crate::ui::view::{Shortcut, View, ViewAction, ViewContext};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use tracing::warn;

/// Conversation with the job assistant
pub struct ChatView {
  ctx: ViewContext,
  profile: ProfileResource,
  transcript: ChatTranscript,
  input: TextInput,
  focused: bool,
  reply: Query<ChatReply>,
  /// Lines scrolled up from the newest message
  scroll_back: u16,
}

impl ChatView {
  pub fn new(ctx: ViewContext) -> Self {
    let profile = ctx.resources.profile();
    if profile.profile().is_none() {
      let loader = profile.clone();
      tokio::spawn(async move {
        // Only needed for the avatar, failures are logged by the resource
        let _ = loader.fetch_profile().await;
      });
    }

    Self {
      transcript: ChatTranscript::load(ctx.store.clone()),
      profile,
      ctx,
      input: TextInput::new(),
      focused: true,
      reply: Query::new(),
      scroll_back: 0,
    }
  }

  fn send(&mut self, text: &str) {
    let text = text.trim();
    if text.is_empty() || self.reply.is_loading() {
      return;
    }

    self.transcript.push_user(text);
    self.scroll_back = 0;

    let service = self.ctx.resources.service().clone();
    let message = text.to_string();
    self.reply.run(async move {
      service
        .send_chat_message(&message)
        .await
        .map(|reply| reply.data)
    });
  }

  fn settle_reply(&mut self) {
    if !self.reply.poll() {
      return;
    }
    match self.reply.take() {
      Some(Ok(reply)) => self.transcript.push_reply(&reply),
      Some(Err(e)) => {
        warn!("Assistant reply failed: {}", e);
        self.transcript.push_apology();
      }
      None => {}
    }
  }

  fn user_badge(&self) -> String {
    self
      .profile
      .profile()
      .map(|p| get_initials(&p.name, 2))
      .filter(|initials| !initials.is_empty())
      .unwrap_or_else(|| "You".to_string())
  }

  fn transcript_lines(&self, palette: &Palette) -> Vec<Line<'static>> {
    let user = self.user_badge();
    let mut lines = Vec::new();

    for message in self.transcript.messages() {
      let (badge, style) = match message.sender {
        Sender::Bot => ("AI".to_string(), Style::default().fg(palette.accent).bold()),
        Sender::User => (user.clone(), Style::default().fg(palette.highlight).bold()),
      };
      lines.push(Line::from(vec![
        Span::styled(format!("{:>3} ", badge), style),
        Span::styled(message.text.clone(), Style::default().fg(palette.text)),
      ]));
      lines.push(Line::default());
    }

    if self.reply.is_loading() {
      lines.push(Line::from(Span::styled(
        " AI is typing...",
        Style::default().fg(palette.muted).italic(),
      )));
    }
    lines
  }

  fn render_transcript(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
    let block = Block::default()
      .title(" Job Assistant ")
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(palette.border));
    let inner = block.inner(area);

    let lines = self.transcript_lines(palette);
    // Stick to the newest message unless scrolled back
    let total = wrapped_height(&lines, inner.width);
    let bottom = total.saturating_sub(inner.height);
    let offset = bottom.saturating_sub(self.scroll_back);

    let paragraph = Paragraph::new(lines)
      .wrap(Wrap { trim: false })
      .block(block)
      .scroll((offset, 0));
    frame.render_widget(paragraph, area);
  }

  fn render_quick_actions(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
    let mut spans = vec![Span::styled(" Quick: ", Style::default().fg(palette.muted))];
    for (idx, action) in QUICK_ACTIONS.iter().enumerate() {
      spans.push(Span::styled(
        format!("<{}>", idx + 1),
        Style::default().fg(palette.accent),
      ));
      spans.push(Span::styled(
        format!(" {}   ", action),
        Style::default().fg(palette.text),
      ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
  }

  fn render_input(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
    let border = if self.focused {
      palette.highlight
    } else {
      palette.muted
    };
    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(border))
      .title(if self.focused {
        " Message (Enter send, Esc leave) "
      } else {
        " Message (i to type) "
      });

    let mut spans = vec![Span::styled("> ", Style::default().fg(palette.highlight))];
    if self.input.is_empty() && !self.focused {
      spans.push(Span::styled(
        "Type your message...",
        Style::default().fg(palette.muted),
      ));
    } else {
      spans.push(Span::raw(self.input.value().to_string()));
    }
    if self.focused {
      spans.push(Span::styled("_", Style::default().fg(palette.highlight)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
  }
}

/// Rows `lines` take up when wrapped at `width`, close enough for scrolling
fn wrapped_height(lines: &[Line], width: u16) -> u16 {
  let width = usize::from(width.max(1));
  let rows: usize = lines
    .iter()
    .map(|line| line.width().div_ceil(width).max(1))
    .sum();
  u16::try_from(rows).unwrap_or(u16::MAX)
}

impl View for ChatView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    if self.focused {
      match self.input.handle_key(key) {
        InputResult::Submitted(text) => {
          self.input.clear();
          self.send(&text);
        }
        InputResult::Cancelled => self.focused = false,
        InputResult::Consumed | InputResult::NotHandled => {}
      }
      return ViewAction::None;
    }

    match key.code {
      KeyCode::Char('i') | KeyCode::Enter => self.focused = true,
      KeyCode::Char(c @ '1'..='4') => {
        let idx = (c as usize) - ('1' as usize);
        if let Some(action) = QUICK_ACTIONS.get(idx) {
          self.send(action);
        }
      }
      KeyCode::Char('c') => {
        self.transcript.clear();
        self.scroll_back = 0;
        self.ctx.notify("Chat history cleared");
      }
      KeyCode::Char('k') | KeyCode::Up => self.scroll_back = self.scroll_back.saturating_add(1),
      KeyCode::Char('j') | KeyCode::Down => self.scroll_back = self.scroll_back.saturating_sub(1),
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, palette: &Palette) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Min(3),    // Transcript
        Constraint::Length(1), // Quick actions
        Constraint::Length(3), // Input
      ])
      .split(area);

    self.render_transcript(frame, chunks[0], palette);
    self.render_quick_actions(frame, chunks[1], palette);
    self.render_input(frame, chunks[2], palette);
  }

  fn breadcrumb_label(&self) -> String {
    "Assistant".to_string()
  }

  fn tick(&mut self) {
    self.settle_reply();
  }

  fn captures_input(&self) -> bool {
    self.focused
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    if self.focused {
      return vec![Shortcut::new("enter", "send"), Shortcut::new("esc", "leave input")];
    }
    vec![
      Shortcut::new(":", "command"),
      Shortcut::new("i", "type"),
      Shortcut::new("1-4", "quick action"),
      Shortcut::new("c", "clear"),
      Shortcut::new("q", "back"),
    ]
  }
}
