use super::{CompletionBackend, LlmRequest};
use crate::config::Config;
use crate::error::{CompletionError, ConfigError};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Minimal subset of the chat completions response we care about
#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP backend for OpenAI-compatible `/v1/chat/completions` endpoints
pub struct OpenAiBackend {
    client: reqwest::Client,
    api_key: String,
    url: String,
}

impl OpenAiBackend {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let api_key = config.api_key()?.to_string();

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder.build().map_err(ConfigError::HttpClient)?;

        Ok(Self {
            client,
            api_key,
            url: format!("{}{}", config.base_url.trim_end_matches('/'), COMPLETIONS_PATH),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, request: &LlmRequest) -> Result<String, CompletionError> {
        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(%status, "completion service returned an error status");
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_completion(&body)
    }
}

/// Extract the first choice's text from a response body.
///
/// A missing `choices` list or message is malformed; a present message with
/// null or empty content is [`CompletionError::EmptyContent`].
pub fn parse_completion(body: &str) -> Result<String, CompletionError> {
    let response: ApiResponse =
        serde_json::from_str(body).map_err(|e| CompletionError::malformed(e.to_string()))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| CompletionError::malformed("response has no choices"))?;

    match choice.message.content {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(CompletionError::EmptyContent),
    }
}
