use super::{CompletionBackend, LlmRequest};
use crate::error::CompletionError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// One canned backend outcome
pub struct Scripted {
    pub delay: Duration,
    pub outcome: Result<String, CompletionError>,
}

/// Backend that replays scripted outcomes in call order and records every
/// request it receives. Calls past the end of the script fail as transport
/// errors.
#[derive(Default)]
pub struct MockBackend {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(self, step: Scripted) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(step);
        }
        self
    }

    pub fn reply(self, text: impl Into<String>) -> Self {
        self.then(Scripted {
            delay: Duration::ZERO,
            outcome: Ok(text.into()),
        })
    }

    pub fn delayed_reply(self, delay: Duration, text: impl Into<String>) -> Self {
        self.then(Scripted {
            delay,
            outcome: Ok(text.into()),
        })
    }

    pub fn fail(self, err: CompletionError) -> Self {
        self.then(Scripted {
            delay: Duration::ZERO,
            outcome: Err(err),
        })
    }

    pub fn empty(self) -> Self {
        self.fail(CompletionError::EmptyContent)
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CompletionBackend for MockBackend {
    async fn complete(&self, request: &LlmRequest) -> Result<String, CompletionError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let step = self.script.lock().ok().and_then(|mut script| script.pop_front());
        let Some(step) = step else {
            return Err(CompletionError::transport("mock backend script exhausted"));
        };

        if !step.delay.is_zero() {
            tokio::time::sleep(step.delay).await;
        }
        step.outcome
    }
}
