use crate::config::Config;
use crate::events::{Completion, Message, RequestId};
use crate::llm::{CompletionBackend, LlmClient, OpenAiBackend};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Top-level state, decided once at startup and fixed for the session
pub enum Session<B = OpenAiBackend> {
    /// Credential present, chat available
    Ready(ChatSession<B>),
    /// Credential missing; only the error panel is shown
    Unavailable { reason: String },
}

impl Session<OpenAiBackend> {
    pub fn start(config: &Config) -> Self {
        match LlmClient::new(config) {
            Ok(client) => Session::Ready(ChatSession::new(Arc::new(client))),
            Err(err) => {
                warn!(error = %err, "chat unavailable");
                Session::Unavailable {
                    reason: err.to_string(),
                }
            }
        }
    }
}

impl<B> Session<B> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Session::Ready(_))
    }
}

/// Conversation store and submission controller for one session.
///
/// Owned by the event loop. Completion calls run on spawned tasks and report
/// back through a channel, so state is only mutated by the owner.
pub struct ChatSession<B = OpenAiBackend> {
    client: Arc<LlmClient<B>>,
    messages: Vec<Message>,
    pending: HashSet<RequestId>,
    draft: String,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
}

impl<B: CompletionBackend + 'static> ChatSession<B> {
    pub fn new(client: Arc<LlmClient<B>>) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            client,
            messages: Vec::new(),
            pending: HashSet::new(),
            draft: String::new(),
            completion_tx,
            completion_rx,
        }
    }

    /// Submit user text.
    ///
    /// Blank text is ignored. Otherwise the user message is appended and the
    /// draft cleared before this returns; the reply arrives later as a
    /// [`Completion`]. Overlapping submissions are allowed.
    pub fn submit(&mut self, text: &str) -> Option<RequestId> {
        if text.trim().is_empty() {
            return None;
        }

        let message = Message::user(text);
        let request_id = message.id;
        self.messages.push(message);
        self.draft.clear();
        self.pending.insert(request_id);
        debug!(%request_id, pending = self.pending.len(), "submitted message");

        let client = Arc::clone(&self.client);
        let tx = self.completion_tx.clone();
        let text = text.to_string();
        tokio::spawn(async move {
            let reply = client.respond(&text).await;
            // Receiver gone means the session ended; nothing left to update.
            let _ = tx.send(Completion {
                request_id,
                text: reply,
            });
        });

        Some(request_id)
    }

    /// Submit whatever is in the draft
    pub fn submit_draft(&mut self) -> Option<RequestId> {
        let text = std::mem::take(&mut self.draft);
        let submitted = self.submit(&text);
        if submitted.is_none() {
            self.draft = text;
        }
        submitted
    }

    /// Append the bot reply for a settled request
    pub fn apply(&mut self, completion: Completion) {
        if !self.pending.remove(&completion.request_id) {
            warn!(request_id = %completion.request_id, "completion for unknown request");
        }
        debug!(
            request_id = %completion.request_id,
            pending = self.pending.len(),
            "received reply"
        );
        self.messages
            .push(Message::bot(completion.text, completion.request_id));
    }

    /// Apply every completion that has already arrived. Returns how many.
    pub fn drain_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completion_rx.try_recv() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    /// Wait for the next completion without applying it
    pub async fn next_completion(&mut self) -> Option<Completion> {
        self.completion_rx.recv().await
    }

    pub fn client(&self) -> &LlmClient<B> {
        &self.client
    }
}

impl<B> ChatSession<B> {
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Pending input, edited in place by the composer
    pub fn draft_mut(&mut self) -> &mut String {
        &mut self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// The user message a request id refers to
    pub fn prompt_for(&self, request_id: RequestId) -> Option<&Message> {
        self.messages
            .iter()
            .find(|m| m.is_user() && m.id == request_id)
    }
}
