use crate::ui::conversation::commands::{complete_command, parse_slash_command, SlashCommand};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

pub const PLACEHOLDER: &str = "Type your message here...";

/// Result returned when the user interacts with the composer
#[derive(Debug, PartialEq, Eq)]
pub enum ComposerResult {
    /// Enter pressed on ordinary text; the draft is left for the session to take
    Submit,
    /// Enter pressed on a slash command; the draft has been cleared
    Command(SlashCommand),
    None,
}

/// Cursor state for a single-line text input.
///
/// The text itself is the session's draft, passed in on every call, so the
/// session can clear it on submit. The cursor counts characters, not bytes.
#[derive(Debug, Clone, Default)]
pub struct ConversationComposer {
    cursor: usize,
}

impl ConversationComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Handle key input
    pub fn handle_key(&mut self, draft: &mut String, key: KeyEvent) -> ComposerResult {
        if key.kind != KeyEventKind::Press {
            return ComposerResult::None;
        }
        self.clamp(draft);

        match key.code {
            KeyCode::Enter => {
                if let Some(command) = parse_slash_command(draft) {
                    draft.clear();
                    self.cursor = 0;
                    return ComposerResult::Command(command);
                }
                return ComposerResult::Submit;
            }
            KeyCode::Tab => {
                if let Some(command) = complete_command(draft) {
                    *draft = format!("/{}", command.command());
                    self.cursor = draft.chars().count();
                }
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                draft.clear();
                self.cursor = 0;
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.insert_str(draft, &c.to_string());
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = byte_offset(draft, self.cursor);
                    draft.remove(at);
                }
            }
            KeyCode::Delete => {
                if self.cursor < draft.chars().count() {
                    let at = byte_offset(draft, self.cursor);
                    draft.remove(at);
                }
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(draft.chars().count());
            }
            KeyCode::Home => {
                self.cursor = 0;
            }
            KeyCode::End => {
                self.cursor = draft.chars().count();
            }
            _ => {}
        }

        ComposerResult::None
    }

    /// Insert pasted text at the cursor. Line breaks become spaces.
    pub fn paste(&mut self, draft: &mut String, text: &str) {
        self.clamp(draft);
        let flattened: String = text
            .chars()
            .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
            .collect();
        self.insert_str(draft, &flattened);
    }

    fn insert_str(&mut self, draft: &mut String, text: &str) {
        let at = byte_offset(draft, self.cursor);
        draft.insert_str(at, text);
        self.cursor += text.chars().count();
    }

    /// Keep the cursor inside the draft after someone else changed it
    fn clamp(&mut self, draft: &str) {
        self.cursor = self.cursor.min(draft.chars().count());
    }

    /// Widget for the current draft
    pub fn view<'a>(&self, draft: &'a str, focused: bool) -> ComposerView<'a> {
        ComposerView {
            draft,
            cursor: self.cursor.min(draft.chars().count()),
            focused,
        }
    }
}

fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Rendered input box
pub struct ComposerView<'a> {
    draft: &'a str,
    cursor: usize,
    focused: bool,
}

impl Widget for ComposerView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("✉ Message")
            .style(if self.focused {
                Style::default().fg(Color::Blue)
            } else {
                Style::default().fg(Color::Gray)
            });

        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if self.draft.is_empty() {
            let mut spans = Vec::new();
            if self.focused {
                spans.push(Span::styled("▌", Style::default().fg(Color::Blue)));
            }
            spans.push(Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)));
            buf.set_line(inner.x, inner.y, &Line::from(spans), inner.width);
            return;
        }

        // Scroll horizontally so the cursor stays visible
        let width = inner.width as usize;
        let start = (self.cursor + 1).saturating_sub(width);
        let chars: Vec<char> = self.draft.chars().collect();
        let before: String = chars[start..self.cursor].iter().collect();
        let after: String = chars[self.cursor..].iter().collect();

        let mut spans = vec![Span::styled(before, Style::default().fg(Color::White))];
        if self.focused {
            spans.push(Span::styled("▌", Style::default().fg(Color::Blue)));
        }
        spans.push(Span::styled(after, Style::default().fg(Color::White)));

        buf.set_line(inner.x, inner.y, &Line::from(spans), inner.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(composer: &mut ConversationComposer, draft: &mut String, text: &str) {
        for c in text.chars() {
            composer.handle_key(draft, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_and_editing() {
        let mut composer = ConversationComposer::new();
        let mut draft = String::new();

        type_text(&mut composer, &mut draft, "I feel ok");
        composer.handle_key(&mut draft, key(KeyCode::Backspace));
        composer.handle_key(&mut draft, key(KeyCode::Backspace));
        type_text(&mut composer, &mut draft, "anxious");
        assert_eq!(draft, "I feel anxious");

        composer.handle_key(&mut draft, key(KeyCode::Home));
        composer.handle_key(&mut draft, key(KeyCode::Delete));
        type_text(&mut composer, &mut draft, "We");
        assert_eq!(draft, "We feel anxious");
        assert_eq!(composer.cursor(), 2);
    }

    #[test]
    fn multibyte_text_edits_by_character() {
        let mut composer = ConversationComposer::new();
        let mut draft = String::new();

        type_text(&mut composer, &mut draft, "café ☕");
        composer.handle_key(&mut draft, key(KeyCode::Left));
        composer.handle_key(&mut draft, key(KeyCode::Backspace));
        assert_eq!(draft, "café☕");
        composer.handle_key(&mut draft, key(KeyCode::End));
        composer.handle_key(&mut draft, key(KeyCode::Backspace));
        assert_eq!(draft, "café");
    }

    #[test]
    fn enter_submits_plain_text_and_leaves_draft() {
        let mut composer = ConversationComposer::new();
        let mut draft = String::from("hello");

        assert_eq!(
            composer.handle_key(&mut draft, key(KeyCode::Enter)),
            ComposerResult::Submit
        );
        assert_eq!(draft, "hello");
    }

    #[test]
    fn enter_on_command_clears_draft() {
        let mut composer = ConversationComposer::new();
        let mut draft = String::new();
        type_text(&mut composer, &mut draft, "/he");
        composer.handle_key(&mut draft, key(KeyCode::Tab));
        assert_eq!(draft, "/help");

        assert_eq!(
            composer.handle_key(&mut draft, key(KeyCode::Enter)),
            ComposerResult::Command(SlashCommand::Help)
        );
        assert!(draft.is_empty());
        assert_eq!(composer.cursor(), 0);
    }

    #[test]
    fn cursor_follows_external_clear() {
        let mut composer = ConversationComposer::new();
        let mut draft = String::new();
        type_text(&mut composer, &mut draft, "sent already");

        draft.clear();
        type_text(&mut composer, &mut draft, "x");
        assert_eq!(draft, "x");
        assert_eq!(composer.cursor(), 1);
    }

    #[test]
    fn paste_flattens_newlines() {
        let mut composer = ConversationComposer::new();
        let mut draft = String::new();
        type_text(&mut composer, &mut draft, "a");
        composer.paste(&mut draft, "b\nc\r\nd");
        assert_eq!(draft, "ab c  d");
    }

    #[test]
    fn release_events_are_ignored() {
        let mut composer = ConversationComposer::new();
        let mut draft = String::new();
        let mut release = key(KeyCode::Char('x'));
        release.kind = KeyEventKind::Release;
        composer.handle_key(&mut draft, release);
        assert!(draft.is_empty());
    }

    #[test]
    fn placeholder_shows_when_empty() {
        let composer = ConversationComposer::new();
        let area = Rect::new(0, 0, 40, 3);
        let mut buf = Buffer::empty(area);
        composer.view("", false).render(area, &mut buf);

        let row: String = (0..area.width).map(|x| buf.get(x, 1).symbol().to_string()).collect();
        assert!(row.contains(PLACEHOLDER));
    }
}
