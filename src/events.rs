use chrono::{DateTime, Utc};
use std::fmt;
use strum::{AsRefStr, Display};
use uuid::Uuid;

/// Identifies one submission and the bot reply it eventually produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// Individual conversation entry. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: RequestId,
    pub text: String,
    pub sender: Sender,
    /// For bot messages, the submission this answers
    pub reply_to: Option<RequestId>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// A user message; its id is also the id of the request it starts
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: RequestId::new(),
            text: text.into(),
            sender: Sender::User,
            reply_to: None,
            created_at: Utc::now(),
        }
    }

    pub fn bot(text: impl Into<String>, reply_to: RequestId) -> Self {
        Self {
            id: RequestId::new(),
            text: text.into(),
            sender: Sender::Bot,
            reply_to: Some(reply_to),
            created_at: Utc::now(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// A settled completion call, delivered back to the session owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub request_id: RequestId,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bot_message_points_at_its_request() {
        let question = Message::user("I feel anxious");
        let answer = Message::bot("Try deep breathing.", question.id);

        assert!(question.is_user());
        assert_eq!(question.reply_to, None);
        assert_eq!(answer.sender, Sender::Bot);
        assert_eq!(answer.reply_to, Some(question.id));
        assert_ne!(answer.id, question.id);
    }

    #[test]
    fn sender_names() {
        assert_eq!(Sender::User.to_string(), "user");
        assert_eq!(Sender::Bot.as_ref(), "bot");
    }
}
