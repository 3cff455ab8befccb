//! Terminal application: setup, event loop, key handling.

use crate::config::Config;
use crate::events::Completion;
use crate::llm::CompletionBackend;
use crate::session::Session;
use crate::ui::conversation::{get_help_text, ComposerResult, SlashCommand, ViewOptions};
use crate::ui::{self, ViewState};
use anyhow::Result;
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, Event, EventStream, KeyCode, KeyEvent,
    KeyEventKind, KeyModifiers,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::io;
use std::time::Duration;
use tracing::{debug, info};

const TICK: Duration = Duration::from_millis(120);
const PAGE: usize = 5;

/// Application state: the session plus everything the screen needs
pub struct App<B> {
    session: Session<B>,
    view: ViewState,
    model: String,
    should_quit: bool,
}

impl<B: CompletionBackend + 'static> App<B> {
    pub fn new(session: Session<B>, config: &Config) -> Self {
        Self {
            session,
            view: ViewState::new(ViewOptions {
                show_timestamps: config.ui.show_timestamps,
            }),
            model: config.model.clone(),
            should_quit: false,
        }
    }

    pub fn session(&self) -> &Session<B> {
        &self.session
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let area = frame.size();
        ui::render_session(&self.session, &mut self.view, area, frame.buffer_mut());
    }

    /// React to one terminal event
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Paste(text) => {
                if let Session::Ready(chat) = &mut self.session {
                    self.view.composer.paste(chat.draft_mut(), &text);
                }
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let chat = match &mut self.session {
            Session::Ready(chat) => chat,
            Session::Unavailable { .. } => {
                self.should_quit = true;
                return;
            }
        };

        let ctrl_c = key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            _ if ctrl_c => self.should_quit = true,
            KeyCode::Esc => self.should_quit = true,
            KeyCode::PageUp => self.view.transcript.scroll_up(PAGE),
            KeyCode::PageDown => self.view.transcript.scroll_down(PAGE),
            _ => {
                match self.view.composer.handle_key(chat.draft_mut(), key) {
                    ComposerResult::Submit => {
                        if chat.submit_draft().is_some() {
                            self.view.notice = None;
                            self.view.transcript.scroll_to_bottom();
                        }
                    }
                    ComposerResult::Command(command) => {
                        let pending = chat.pending_count();
                        self.run_command(command, pending);
                    }
                    ComposerResult::None => {}
                }
            }
        }
    }

    fn run_command(&mut self, command: SlashCommand, pending: usize) {
        debug!(command = command.command(), "slash command");
        match command {
            SlashCommand::Help => self.view.notice = Some(get_help_text()),
            SlashCommand::Info => {
                self.view.notice = Some(format!(
                    "Model {} · {} repl{} pending",
                    self.model,
                    pending,
                    if pending == 1 { "y" } else { "ies" }
                ))
            }
            SlashCommand::Bye => self.should_quit = true,
        }
    }

    /// Store a reply that arrived from a completion task
    pub fn apply_completion(&mut self, completion: Completion) {
        if let Session::Ready(chat) = &mut self.session {
            chat.apply(completion);
            chat.drain_completions();
        }
    }

    pub fn on_tick(&mut self) {
        self.view.tick = self.view.tick.wrapping_add(1);
    }

    /// Resolves with the next reply; never resolves when the chat is unavailable
    async fn next_completion(&mut self) -> Completion {
        match &mut self.session {
            Session::Ready(chat) => match chat.next_completion().await {
                Some(completion) => completion,
                None => std::future::pending().await,
            },
            Session::Unavailable { .. } => std::future::pending().await,
        }
    }

    /// Drive the UI until the user quits
    pub async fn run<W: io::Write>(&mut self, terminal: &mut Terminal<CrosstermBackend<W>>) -> Result<()> {
        let mut events = EventStream::new();
        let mut tick = tokio::time::interval(TICK);

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.should_quit {
                break;
            }

            tokio::select! {
                event = events.next() => match event {
                    Some(Ok(event)) => self.handle_event(event),
                    Some(Err(err)) => return Err(err.into()),
                    None => break,
                },
                completion = self.next_completion() => self.apply_completion(completion),
                _ = tick.tick() => self.on_tick(),
            }
        }

        Ok(())
    }
}

/// Set up the terminal, run the chat, and restore the terminal afterwards
pub async fn run_tui(session: Session, config: &Config) -> Result<()> {
    info!(ready = session.is_ready(), model = %config.model, "starting chat");
    let mut app = App::new(session, config);

    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    io::stdout().execute(EnableBracketedPaste)?;

    let result = match Terminal::new(CrosstermBackend::new(io::stdout())) {
        Ok(mut terminal) => app.run(&mut terminal).await,
        Err(err) => Err(err.into()),
    };

    // Restore terminal
    let _ = io::stdout().execute(DisableBracketedPaste);
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;

    info!("chat closed");
    result
}
