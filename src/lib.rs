//! Solace: a terminal chat that forwards each message to a hosted
//! chat-completion service and shows the exchange as a conversation.

pub mod app;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod llm;
pub mod logging;
pub mod prompts;
pub mod session;
pub mod ui;

pub use config::Config;
pub use error::{CompletionError, ConfigError};
pub use events::{Completion, Message, RequestId, Sender};
pub use llm::{CompletionBackend, LlmClient, LlmMessage, LlmRequest, MockBackend, OpenAiBackend};
pub use session::{ChatSession, Session};
