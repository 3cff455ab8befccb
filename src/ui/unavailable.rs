use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

/// Static panel shown instead of the chat when startup configuration failed
pub struct UnavailablePanel<'a> {
    reason: &'a str,
}

impl<'a> UnavailablePanel<'a> {
    pub fn new(reason: &'a str) -> Self {
        Self { reason }
    }
}

impl Widget for UnavailablePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(9),
                Constraint::Min(0),
            ])
            .split(area);
        let horizontal = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(15),
                Constraint::Percentage(70),
                Constraint::Percentage(15),
            ])
            .split(vertical[1]);
        let panel = horizontal[1];

        Clear.render(panel, buf);

        let lines = vec![
            Line::from(Span::styled(
                "⚠ Error",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(self.reason.to_string()),
            Line::default(),
            Line::from(Span::styled(
                "Press any key to exit.",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            )
            .render(panel, buf);
    }
}
