//! Pure rendering of one message into terminal lines.

use crate::events::{Message, Sender};
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display preferences that do not depend on the message itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    pub show_timestamps: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            show_timestamps: true,
        }
    }
}

const SNIPPET_COLUMNS: usize = 32;

/// Render a message for a transcript `width` columns wide.
///
/// User messages sit on the right, bot messages on the left. `answering` is
/// the text of the prompt a bot reply belongs to, passed only when that
/// prompt is not the message directly above it.
pub fn render_message(
    message: &Message,
    width: u16,
    options: ViewOptions,
    answering: Option<&str>,
) -> Vec<Line<'static>> {
    let (alignment, body_style) = match message.sender {
        Sender::User => (Alignment::Right, Style::default().fg(Color::Blue)),
        Sender::Bot => (Alignment::Left, Style::default().fg(Color::Green)),
    };
    let meta_style = Style::default().fg(Color::DarkGray);

    let mut lines = vec![header(message, options).alignment(alignment)];

    if let (Sender::Bot, Some(prompt)) = (message.sender, answering) {
        let marker = format!("↪ re: “{}”", snippet(&sanitize(prompt)));
        lines.push(
            Line::from(Span::styled(marker, meta_style.add_modifier(Modifier::ITALIC)))
                .alignment(alignment),
        );
    }

    // Bubbles take at most three quarters of the row
    let bubble = (width as usize * 3 / 4).max(1);
    for text in wrap_text(&sanitize(&message.text), bubble) {
        lines.push(Line::from(Span::styled(text, body_style)).alignment(alignment));
    }

    lines
}

fn header(message: &Message, options: ViewOptions) -> Line<'static> {
    let style = Style::default().fg(Color::DarkGray);
    let time = options.show_timestamps.then(|| {
        message
            .created_at
            .with_timezone(&chrono::Local)
            .format("%H:%M")
            .to_string()
    });

    let label = match (message.sender, time) {
        (Sender::User, Some(time)) => format!("{time} You 👤"),
        (Sender::User, None) => "You 👤".to_string(),
        (Sender::Bot, Some(time)) => format!("🤖 Solace {time}"),
        (Sender::Bot, None) => "🤖 Solace".to_string(),
    };
    Line::from(Span::styled(
        label,
        style.add_modifier(Modifier::BOLD),
    ))
}

/// Plain text only: tabs become spaces, other control characters are dropped.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\n' => Some('\n'),
            '\t' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

fn snippet(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.width() <= SNIPPET_COLUMNS {
        return flat;
    }

    // One column is kept for the ellipsis
    let mut cut = String::new();
    let mut used = 0;
    for c in flat.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > SNIPPET_COLUMNS - 1 {
            break;
        }
        cut.push(c);
        used += w;
    }
    format!("{cut}…")
}

/// Wrap text to fit within `width` terminal columns, keeping explicit line
/// breaks and splitting words longer than a full line. Wide characters (CJK,
/// most emoji) count as two columns.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let mut word = word;

            while word.width() > width {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let (head, rest) = split_at_column(word, width);
                lines.push(head.to_string());
                word = rest;
            }
            if word.is_empty() {
                continue;
            }

            let word_len = word.width();
            let needed = if current_len == 0 { word_len } else { current_len + 1 + word_len };
            if needed > width {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(word);
            current_len += word_len;
        }

        lines.push(current);
    }

    lines
}

/// Longest prefix that fits in `width` columns; always at least one char.
fn split_at_column(word: &str, width: usize) -> (&str, &str) {
    let mut used = 0;
    for (index, c) in word.char_indices() {
        let w = c.width().unwrap_or(0);
        if used + w > width && index > 0 {
            return word.split_at(index);
        }
        used += w;
    }
    (word, "")
}
