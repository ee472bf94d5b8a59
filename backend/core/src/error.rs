use thiserror::Error;

/// Everything that can abort a conversation run.
///
/// None of these are retried by the orchestration loop.
#[derive(Debug, Error)]
pub enum ConversationError {
    /// Network failure, timeout, or a non-2xx status from the completion endpoint.
    #[error("transport error: {0}")]
    Transport(String),

    /// The endpoint answered, but not with a usable chat completion.
    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("invalid arguments for {function}: {message}")]
    ArgumentParse { function: String, message: String },

    #[error("unsupported function: {0}")]
    UnsupportedFunction(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ConversationError {
    pub fn argument_parse(function: impl Into<String>, message: impl ToString) -> Self {
        Self::ArgumentParse {
            function: function.into(),
            message: message.to_string(),
        }
    }

    /// Short machine-friendly label, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Protocol(_) => "protocol",
            Self::ArgumentParse { .. } => "argument_parse",
            Self::UnsupportedFunction(_) => "unsupported_function",
            Self::Config(_) => "config",
        }
    }
}
