//! Conversation UI components for the chat interface

pub mod commands;
pub mod composer;
pub mod history;
pub mod message_view;

pub use commands::{get_help_text, parse_slash_command, SlashCommand};
pub use composer::{ComposerResult, ConversationComposer};
pub use history::{Transcript, TranscriptState};
pub use message_view::{render_message, ViewOptions};
