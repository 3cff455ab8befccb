/// System turn sent ahead of every user message.
pub const SYSTEM_PROMPT: &str = "You are a helpful mental health support chatbot. \
Provide empathetic, supportive responses and suggest coping strategies. \
If the user seems to be in crisis, recommend professional help.";

/// Bot reply when the service answered but produced no text.
pub const NO_RESPONSE_FALLBACK: &str =
    "I'm sorry, I couldn't generate a response. Please try again.";

/// Bot reply for any failure talking to the service.
pub const ERROR_FALLBACK: &str = "I'm sorry, I encountered an error. Please try again later.";

pub const DISCLAIMER: &str = "This chatbot is for informational purposes only and does not \
replace professional medical advice.";
