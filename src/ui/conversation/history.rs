//! Conversation transcript display component

use crate::events::{Message, Sender};
use crate::ui::conversation::message_view::{render_message, ViewOptions};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
        StatefulWidget, Widget,
    },
};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Scroll position, counted in lines up from the newest message
#[derive(Debug, Clone, Default)]
pub struct TranscriptState {
    scroll_back: usize,
    max_scroll_back: usize,
}

impl TranscriptState {
    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_back = (self.scroll_back + lines).min(self.max_scroll_back);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_back = self.scroll_back.saturating_sub(lines);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_back = 0;
    }

    pub fn scroll_back(&self) -> usize {
        self.scroll_back
    }
}

/// The scrolling conversation pane
pub struct Transcript<'a> {
    messages: &'a [Message],
    pending: usize,
    tick: usize,
    options: ViewOptions,
}

impl<'a> Transcript<'a> {
    pub fn new(messages: &'a [Message]) -> Self {
        Self {
            messages,
            pending: 0,
            tick: 0,
            options: ViewOptions::default(),
        }
    }

    /// Show the thinking indicator while requests are in flight
    pub fn pending(mut self, pending: usize, tick: usize) -> Self {
        self.pending = pending;
        self.tick = tick;
        self
    }

    pub fn options(mut self, options: ViewOptions) -> Self {
        self.options = options;
        self
    }
}

/// Every message rendered in conversation order, with a blank line between.
///
/// A bot reply whose prompt is not the message right above it gets a marker
/// naming that prompt.
pub fn transcript_lines(messages: &[Message], width: u16, options: ViewOptions) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for (index, message) in messages.iter().enumerate() {
        let answering = match (message.sender, message.reply_to) {
            (Sender::Bot, Some(request_id)) => {
                let directly_above = index
                    .checked_sub(1)
                    .and_then(|i| messages.get(i))
                    .is_some_and(|prev| prev.is_user() && prev.id == request_id);
                if directly_above {
                    None
                } else {
                    messages
                        .iter()
                        .find(|m| m.is_user() && m.id == request_id)
                        .map(|m| m.text.as_str())
                }
            }
            _ => None,
        };

        lines.extend(render_message(message, width, options, answering));
        lines.push(Line::default());
    }

    lines
}

fn welcome_lines() -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            "Welcome to Solace 🌿",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            "Share what's on your mind below and press Enter.",
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            "Type /help for commands.",
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

impl StatefulWidget for Transcript<'_> {
    type State = TranscriptState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut TranscriptState) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("💬 Conversation");

        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if self.messages.is_empty() && self.pending == 0 {
            state.max_scroll_back = 0;
            state.scroll_back = 0;
            Paragraph::new(welcome_lines())
                .alignment(Alignment::Center)
                .render(inner, buf);
            return;
        }

        // Leave the last column for the scrollbar
        let text_width = inner.width.saturating_sub(1);
        let mut lines = transcript_lines(self.messages, text_width, self.options);

        if self.pending > 0 {
            let spinner = SPINNER[self.tick % SPINNER.len()];
            let mut label = format!("{spinner} Solace is thinking…");
            if self.pending > 1 {
                label.push_str(&format!(" ({} replies pending)", self.pending));
            }
            lines.push(Line::from(Span::styled(label, Style::default().fg(Color::Yellow))));
        }

        // Bottom-anchored: the newest line sits on the last row unless scrolled back
        let height = inner.height as usize;
        let total = lines.len();
        state.max_scroll_back = total.saturating_sub(height);
        state.scroll_back = state.scroll_back.min(state.max_scroll_back);
        let top = state.max_scroll_back - state.scroll_back;

        let text_area = Rect {
            width: text_width,
            ..inner
        };
        Paragraph::new(lines)
            .scroll((top.min(u16::MAX as usize) as u16, 0))
            .render(text_area, buf);

        if state.max_scroll_back > 0 {
            let mut scrollbar_state = ScrollbarState::new(state.max_scroll_back).position(top);
            Scrollbar::default()
                .orientation(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"))
                .render(inner, buf, &mut scrollbar_state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RequestId;

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        let mut out = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                out.push_str(buf.get(x, y).symbol());
            }
            out.push('\n');
        }
        out
    }

    fn draw(messages: &[Message], pending: usize, state: &mut TranscriptState) -> Buffer {
        let area = Rect::new(0, 0, 50, 12);
        let mut buf = Buffer::empty(area);
        Transcript::new(messages)
            .pending(pending, 0)
            .render(area, &mut buf, state);
        buf
    }

    fn exchange() -> Vec<Message> {
        let question = Message::user("I feel anxious");
        let answer = Message::bot("Try deep breathing.", question.id);
        vec![question, answer]
    }

    #[test]
    fn empty_transcript_shows_welcome() {
        let buf = draw(&[], 0, &mut TranscriptState::default());
        assert!(buffer_text(&buf).contains("Welcome to Solace"));
    }

    #[test]
    fn messages_and_indicator_are_drawn() {
        let messages = exchange();
        let buf = draw(&messages[..1], 1, &mut TranscriptState::default());
        let text = buffer_text(&buf);
        assert!(text.contains("I feel anxious"));
        assert!(text.contains("Solace is thinking"));

        let buf = draw(&messages, 0, &mut TranscriptState::default());
        let text = buffer_text(&buf);
        assert!(text.contains("Try deep breathing."));
        assert!(!text.contains("thinking"));
    }

    #[test]
    fn same_conversation_renders_identically() {
        let messages = exchange();
        let first = draw(&messages, 0, &mut TranscriptState::default());
        let second = draw(&messages, 0, &mut TranscriptState::default());
        assert_eq!(first, second);
    }

    #[test]
    fn marker_only_for_replies_separated_from_prompt() {
        let first = Message::user("first question");
        let second = Message::user("second question");
        let messages = vec![
            first.clone(),
            second.clone(),
            Message::bot("answer two", second.id),
            Message::bot("answer one", first.id),
        ];

        let lines = transcript_lines(&messages, 60, ViewOptions::default());
        let markers: Vec<String> = lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .filter(|t| t.starts_with("↪"))
            .collect();
        assert_eq!(markers, vec!["↪ re: “first question”"]);
    }

    #[test]
    fn scrolling_is_clamped_and_shows_older_lines() {
        let mut messages = Vec::new();
        for i in 0..10 {
            let question = Message::user(format!("question {i}"));
            let answer = Message::bot(format!("answer {i}"), question.id);
            messages.push(question);
            messages.push(answer);
        }
        let mut state = TranscriptState::default();

        let text = buffer_text(&draw(&messages, 0, &mut state));
        assert!(text.contains("answer 9"));
        assert!(!text.contains("question 0"));

        state.scroll_up(1_000);
        let text = buffer_text(&draw(&messages, 0, &mut state));
        assert!(text.contains("question 0"));
        assert!(!text.contains("answer 9"));
        assert!(state.scroll_back() > 0);

        state.scroll_to_bottom();
        let text = buffer_text(&draw(&messages, 0, &mut state));
        assert!(text.contains("answer 9"));
    }

    #[test]
    fn wide_character_messages_are_drawn_in_full() {
        let messages = vec![Message::user("好".repeat(30))];
        let area = Rect::new(0, 0, 40, 12);
        let mut buf = Buffer::empty(area);
        Transcript::new(&messages).render(area, &mut buf, &mut TranscriptState::default());

        let mut drawn = 0;
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                if buf.get(x, y).symbol() == "好" {
                    drawn += 1;
                }
            }
        }
        assert_eq!(drawn, 30);
    }

    #[test]
    fn stray_reply_without_prompt_has_no_marker() {
        let messages = vec![Message::bot("orphan", RequestId::new())];
        let lines = transcript_lines(&messages, 40, ViewOptions::default());
        assert_eq!(lines.len(), 3);
    }
}
