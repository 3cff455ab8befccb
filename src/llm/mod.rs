//! Completion client: one user message in, one reply string out.

mod mock;
mod openai;

pub use mock::{MockBackend, Scripted};
pub use openai::{OpenAiBackend, parse_completion};

use crate::config::Config;
use crate::error::{CompletionError, ConfigError};
use crate::prompts::{ERROR_FALLBACK, NO_RESPONSE_FALLBACK, SYSTEM_PROMPT};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Message in the prompt sent to the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LlmMessage {
    pub role: String,
    pub content: String,
}

impl LlmMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat completion request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LlmRequest {
    pub model: String,
    pub messages: Vec<LlmMessage>,
    pub max_tokens: u32,
}

/// Transport seam between the client and a completion service.
///
/// Implementations return the first choice's text, or a categorised error.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: &LlmRequest) -> Result<String, CompletionError>;
}

/// Builds the fixed two-turn prompt and absorbs every failure into a fallback
/// reply, so callers always get a string back.
pub struct LlmClient<B = OpenAiBackend> {
    backend: B,
    model: String,
    max_tokens: u32,
}

impl LlmClient<OpenAiBackend> {
    /// Client for the configured OpenAI-compatible endpoint.
    ///
    /// Fails when no credential is configured or the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let backend = OpenAiBackend::new(config)?;
        Ok(Self::with_backend(backend, config))
    }
}

impl<B: CompletionBackend> LlmClient<B> {
    pub fn with_backend(backend: B, config: &Config) -> Self {
        Self {
            backend,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// System instruction plus the raw user text. Earlier turns are never sent.
    pub fn build_request(&self, user_text: &str) -> LlmRequest {
        LlmRequest {
            model: self.model.clone(),
            messages: vec![LlmMessage::system(SYSTEM_PROMPT), LlmMessage::user(user_text)],
            max_tokens: self.max_tokens,
        }
    }

    /// Single call with the failure category intact
    pub async fn try_respond(&self, user_text: &str) -> Result<String, CompletionError> {
        let request = self.build_request(user_text);
        debug!(model = %request.model, chars = user_text.len(), "sending completion request");

        let text = self.backend.complete(&request).await?;
        if text.is_empty() {
            return Err(CompletionError::EmptyContent);
        }
        Ok(text)
    }

    /// Reply text for the user, never an error
    pub async fn respond(&self, user_text: &str) -> String {
        match self.try_respond(user_text).await {
            Ok(text) => text,
            Err(err) => {
                if err.is_empty_content() {
                    info!(category = err.category(), "completion returned no text");
                } else {
                    warn!(category = err.category(), error = %err, "completion failed");
                }
                fallback_for(&err).to_string()
            }
        }
    }
}

/// User-facing text for a failed completion
pub fn fallback_for(err: &CompletionError) -> &'static str {
    match err {
        CompletionError::EmptyContent => NO_RESPONSE_FALLBACK,
        _ => ERROR_FALLBACK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(backend: MockBackend) -> LlmClient<MockBackend> {
        LlmClient::with_backend(backend, &Config::default())
    }

    #[test]
    fn request_has_system_then_user_turn_only() {
        let client = client(MockBackend::new());
        let request = client.build_request("I feel anxious");

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["max_tokens"], 150);
        assert_eq!(json["messages"].as_array().unwrap().len(), 2);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], SYSTEM_PROMPT);
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "I feel anxious");
    }

    #[test]
    fn user_text_is_sent_raw() {
        let client = client(MockBackend::new());
        let request = client.build_request("  padded  ");
        assert_eq!(request.messages[1].content, "  padded  ");
    }

    #[tokio::test]
    async fn success_returns_choice_text() {
        let client = client(MockBackend::new().reply("Try deep breathing."));
        assert_eq!(client.respond("I feel anxious").await, "Try deep breathing.");
        assert_eq!(client.backend().request_count(), 1);
    }

    #[tokio::test]
    async fn failures_map_to_error_fallback() {
        let client = client(
            MockBackend::new()
                .fail(CompletionError::transport("connection reset"))
                .fail(CompletionError::Status {
                    status: 429,
                    body: "rate limited".into(),
                })
                .fail(CompletionError::malformed("no choices")),
        );

        for _ in 0..3 {
            assert_eq!(client.respond("hello").await, ERROR_FALLBACK);
        }
    }

    #[tokio::test]
    async fn empty_content_maps_to_no_response_fallback() {
        let client = client(MockBackend::new().empty().reply(""));

        assert_eq!(client.respond("hello").await, NO_RESPONSE_FALLBACK);
        assert!(client.try_respond("hello").await.unwrap_err().is_empty_content());
    }

    #[tokio::test]
    async fn configured_model_and_limit_are_used() {
        let config = Config {
            model: "gpt-4o-mini".into(),
            max_tokens: 42,
            ..Config::default()
        };
        let client = LlmClient::with_backend(MockBackend::new().reply("ok"), &config);
        client.respond("hi").await;

        let sent = client.backend().requests();
        assert_eq!(sent[0].model, "gpt-4o-mini");
        assert_eq!(sent[0].max_tokens, 42);
    }
}
