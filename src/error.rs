use thiserror::Error;

/// Failure categories for a single completion call.
///
/// The chat surface collapses all of these into a fallback bot message, but
/// they stay distinct here so logs and tests can tell them apart.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("response carried no content")]
    EmptyContent,
}

impl CompletionError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    /// Short label used as a structured log field.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Status { .. } => "status",
            Self::Malformed(_) => "malformed",
            Self::EmptyContent => "empty_content",
        }
    }

    pub fn is_empty_content(&self) -> bool {
        matches!(self, Self::EmptyContent)
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Malformed(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OpenAI API key is not set. Please check your environment variables.")]
    MissingCredential,

    #[error("failed to set up the HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("could not locate home directory")]
    NoHomeDir,

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
