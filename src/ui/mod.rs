//! Screen layout for both top-level session states.

pub mod conversation;
pub mod unavailable;

use crate::prompts::DISCLAIMER;
use crate::session::{ChatSession, Session};
use conversation::{ConversationComposer, Transcript, TranscriptState, ViewOptions};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, StatefulWidget, Widget},
};
use unavailable::UnavailablePanel;

pub const TITLE: &str = "🧠 Solace · GPT-3.5 powered Mental Health Advisor";

/// UI state that lives alongside the session but is not part of it
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub composer: ConversationComposer,
    pub transcript: TranscriptState,
    /// One-line message above the composer (help, info)
    pub notice: Option<String>,
    /// Animation counter for the thinking indicator
    pub tick: usize,
    pub options: ViewOptions,
}

impl ViewState {
    pub fn new(options: ViewOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }
}

/// Draw the whole screen for the current session state
pub fn render_session<B>(session: &Session<B>, view: &mut ViewState, area: Rect, buf: &mut Buffer) {
    match session {
        Session::Ready(chat) => render_chat(chat, view, area, buf),
        Session::Unavailable { reason } => UnavailablePanel::new(reason).render(area, buf),
    }
}

fn render_chat<B>(chat: &ChatSession<B>, view: &mut ViewState, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(5),    // Transcript
            Constraint::Length(1), // Notice
            Constraint::Length(3), // Composer
            Constraint::Length(1), // Disclaimer
        ])
        .split(area);

    Paragraph::new(Line::from(Span::styled(
        TITLE,
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .style(Style::default().fg(Color::White).bg(Color::Blue))
    .render(chunks[0], buf);

    Transcript::new(chat.messages())
        .pending(chat.pending_count(), view.tick)
        .options(view.options)
        .render(chunks[1], buf, &mut view.transcript);

    let notice = match &view.notice {
        Some(text) => Span::styled(text.clone(), Style::default().fg(Color::Yellow)),
        None => Span::styled(
            "Enter to send · /help for commands · Esc to quit",
            Style::default().fg(Color::DarkGray),
        ),
    };
    Paragraph::new(Line::from(notice)).render(chunks[2], buf);

    view.composer
        .view(chat.draft(), true)
        .render(chunks[3], buf);

    Paragraph::new(Line::from(Span::styled(
        format!("ⓘ {DISCLAIMER}"),
        Style::default().fg(Color::DarkGray),
    )))
    .render(chunks[4], buf);
}
